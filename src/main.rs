use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teamarr::cache::StreamMatchCache;
use teamarr::config::Config;
use teamarr::database::repositories::{
    AuditRepository, GroupRepository, LeagueMappingRepository, ManagedChannelRepository,
    StreamMatchCacheRepository,
};
use teamarr::database::Database;
use teamarr::matching::{StreamMatcher, StreamMatcherConfig};
use teamarr::providers::cricbuzz::CricbuzzProvider;
use teamarr::providers::espn::EspnProvider;
use teamarr::providers::thesportsdb::TheSportsDbProvider;
use teamarr::providers::{ProviderRegistry, SportsDataProvider, SportsDataService};
use teamarr::scheduler::generation::GenerationDriver;
use teamarr::{DispatcharrGateway, Scheduler};

#[derive(Parser)]
#[command(name = "teamarr")]
#[command(version)]
#[command(about = "Match-and-lifecycle pipeline for sports IPTV EPGs")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (overrides RUST_LOG)
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Run a single generation and exit, instead of starting the scheduler
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("teamarr={}", cli.log_level);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting teamarr v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_from_file(&cli.config).context("failed to load configuration")?;
    info!(config = %cli.config, "configuration loaded");

    let database = Database::connect(&config.database).await?;
    let connection = database.connection().clone();

    let league_mappings = LeagueMappingRepository::new(connection.clone());
    let leagues = league_mappings.all().await?;
    info!(count = leagues.len(), "league mappings loaded");

    let leagues_for = |provider: &str| -> Vec<String> {
        leagues
            .iter()
            .filter(|l| l.provider == provider)
            .map(|l| l.provider_league_id.clone())
            .collect()
    };

    let mut providers: Vec<Arc<dyn SportsDataProvider>> = Vec::new();
    if let Some(base_url) = &config.providers.espn.base_url {
        providers.push(Arc::new(EspnProvider::new(
            base_url.clone(),
            config.providers.espn.priority,
            leagues_for("espn"),
        )));
    }
    if let Some(base_url) = &config.providers.thesportsdb.base_url {
        providers.push(Arc::new(TheSportsDbProvider::new(
            base_url.clone(),
            config.providers.thesportsdb.api_key.clone().unwrap_or_default(),
            config.providers.thesportsdb.priority,
            leagues_for("thesportsdb"),
            config.providers.thesportsdb.requests_per_minute,
        )));
    }
    if let Some(base_url) = &config.providers.cricbuzz.base_url {
        providers.push(Arc::new(CricbuzzProvider::new(base_url.clone(), config.providers.cricbuzz.priority)));
    }
    info!(count = providers.len(), "sports data providers registered");

    let sports = Arc::new(SportsDataService::new(ProviderRegistry::new(providers)));

    let cache_repo = StreamMatchCacheRepository::new(connection.clone());
    let cache = Arc::new(StreamMatchCache::new(
        cache_repo,
        config.matching.purge_after_generations,
        config.matching.purge_failed_after_generations,
    ));

    let matcher = StreamMatcher::new(
        sports,
        cache.clone(),
        StreamMatcherConfig {
            fuzzy_threshold: config.matching.fuzzy_threshold,
        },
    );

    let gateway: Arc<dyn teamarr::ChannelGateway> = Arc::new(DispatcharrGateway::new(&config.dispatcharr));

    let groups = GroupRepository::new(connection.clone());
    let channels = ManagedChannelRepository::new(connection.clone());
    let audit = AuditRepository::new(connection.clone());

    let driver = GenerationDriver::new(database, groups, channels, audit, matcher, gateway, cache, &config);

    if cli.once {
        info!("running a single generation (--once)");
        let summaries = driver.run().await?;
        info!(groups = summaries.len(), "generation complete, exiting");
        return Ok(());
    }

    let scheduler = Scheduler::new(driver, None, &config.scheduler);
    scheduler.run().await
}

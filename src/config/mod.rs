//! Layered configuration: a TOML file overridden by `TEAMARR_`-prefixed
//! environment variables. Grounded on `config/mod.rs` in the teacher.

pub mod defaults;
pub mod duration_serde;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub channel_numbering: ChannelNumberingConfig,
    pub dispatcharr: DispatcharrConfig,
}

impl Config {
    /// Load from a TOML file at `path`, then apply `TEAMARR_`-prefixed
    /// environment overrides (e.g. `TEAMARR_DATABASE.URL`).
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("TEAMARR_").split("__"))
            .extract()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub sqlite: SqliteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteConfig {
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout: String,
    #[serde(default = "default_journal_mode")]
    pub journal_mode: String,
    #[serde(default = "default_synchronous")]
    pub synchronous: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            busy_timeout: default_busy_timeout(),
            journal_mode: default_journal_mode(),
            synchronous: default_synchronous(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(with = "duration_serde::duration", default = "default_tick_duration")]
    pub tick_interval: Duration,
    #[serde(default = "default_backup_cron")]
    pub backup_cron: String,
    #[serde(default = "default_reset_cron")]
    pub reset_cron: String,
    #[serde(
        with = "duration_serde::duration",
        default = "default_cache_refresh_duration"
    )]
    pub cache_refresh_staleness: Duration,
}

fn default_tick_duration() -> Duration {
    humantime::parse_duration(&default_scheduler_tick()).unwrap()
}

fn default_cache_refresh_duration() -> Duration {
    humantime::parse_duration(&default_cache_refresh_staleness()).unwrap()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: default_tick_duration(),
            backup_cron: default_backup_cron(),
            reset_cron: default_reset_cron(),
            cache_refresh_staleness: default_cache_refresh_duration(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub espn: ProviderEndpointConfig,
    #[serde(default)]
    pub thesportsdb: TsdbProviderConfig,
    #[serde(default)]
    pub cricbuzz: ProviderEndpointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderEndpointConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    #[serde(default)]
    pub priority: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsdbProviderConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_tsdb_requests_per_minute")]
    pub requests_per_minute: u32,
}

impl Default for TsdbProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            priority: 0,
            requests_per_minute: default_tsdb_requests_per_minute(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Estimated sport duration, used to decide whether a "yesterday"
    /// candidate event might still be ongoing. Keyed by sport name.
    #[serde(default = "default_sport_durations")]
    pub sport_duration_minutes: HashMap<String, u32>,
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    #[serde(default = "default_purge_after_generations")]
    pub purge_after_generations: i64,
    #[serde(default = "default_purge_failed_after_generations")]
    pub purge_failed_after_generations: i64,
}

fn default_sport_durations() -> HashMap<String, u32> {
    let mut m = HashMap::new();
    m.insert("football".to_string(), 210);
    m.insert("basketball".to_string(), 150);
    m.insert("baseball".to_string(), 200);
    m.insert("hockey".to_string(), 150);
    m.insert("soccer".to_string(), 130);
    m.insert("mma".to_string(), 300);
    m
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            sport_duration_minutes: default_sport_durations(),
            fuzzy_threshold: default_fuzzy_threshold(),
            purge_after_generations: default_purge_after_generations(),
            purge_failed_after_generations: default_purge_failed_after_generations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelNumberingConfig {
    #[serde(default = "default_channel_range_start")]
    pub range_start: u32,
    pub range_end: Option<u32>,
    #[serde(default = "default_numbering_mode")]
    pub default_mode: String,
}

impl Default for ChannelNumberingConfig {
    fn default() -> Self {
        Self {
            range_start: default_channel_range_start(),
            range_end: None,
            default_mode: default_numbering_mode(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcharrConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
}

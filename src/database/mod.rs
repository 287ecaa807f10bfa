//! SQLite connection management via SeaORM. Grounded on `database/mod.rs`
//! in the teacher, trimmed to the single SQLite backend spec.md §5/§6
//! require (WAL, 30s busy timeout, foreign keys on).

pub mod entities;
pub mod repositories;

use sea_orm::{ConnectOptions, Database as SeaOrmDatabase, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::errors::TeamarrResult;
use crate::utils::CircuitBreaker;

#[derive(Clone)]
pub struct Database {
    connection: Arc<DatabaseConnection>,
    circuit_breaker: Arc<CircuitBreaker>,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> TeamarrResult<Self> {
        let mut options = ConnectOptions::new(Self::with_pragmas(config));
        options
            .max_connections(config.max_connections.unwrap_or(5))
            .min_connections(1)
            .connect_timeout(Duration::from_secs(5))
            .sqlx_logging(false);

        info!("connecting to sqlite database");
        let connection = Arc::new(SeaOrmDatabase::connect(options).await?);
        debug!("database connection established");

        Ok(Self {
            connection,
            circuit_breaker: CircuitBreaker::new(Default::default()),
        })
    }

    /// Build a connection string carrying the WAL/busy-timeout/foreign-key
    /// pragmas spec.md §5 requires, rather than issuing them as separate
    /// statements after connect (sqlite query params apply per-connection
    /// in the pool, which plain `PRAGMA` statements after the fact do not).
    fn with_pragmas(config: &DatabaseConfig) -> String {
        let busy_timeout_ms = humantime::parse_duration(&config.sqlite.busy_timeout)
            .map(|d| d.as_millis())
            .unwrap_or(30_000);

        format!(
            "{}?journal_mode={}&synchronous={}&busy_timeout={}&foreign_keys=true",
            config.url, config.sqlite.journal_mode, config.sqlite.synchronous, busy_timeout_ms
        )
    }

    pub fn connection(&self) -> &Arc<DatabaseConnection> {
        &self.connection
    }

    pub fn circuit_breaker(&self) -> &Arc<CircuitBreaker> {
        &self.circuit_breaker
    }

    /// Atomically bump and return the cross-group generation counter,
    /// using `BEGIN EXCLUSIVE` so concurrent processes never observe the
    /// same value twice (spec.md §5, grounded on
    /// `increment_generation_counter` in `stream_match_cache.py`).
    pub async fn increment_generation_counter(&self) -> TeamarrResult<i64> {
        use sea_orm::{ConnectionTrait, Statement, TransactionTrait};

        let txn = self
            .connection
            .begin_with_config(
                Some(sea_orm::IsolationLevel::Serializable),
                Some(sea_orm::AccessMode::ReadWrite),
            )
            .await?;

        txn.execute(Statement::from_string(
            txn.get_database_backend(),
            "BEGIN EXCLUSIVE".to_owned(),
        ))
        .await
        .ok();

        txn.execute_unprepared(
            "INSERT INTO settings(key, value) VALUES ('generation_counter', '0')
             ON CONFLICT(key) DO UPDATE SET value = CAST(CAST(value AS INTEGER) + 1 AS TEXT)",
        )
        .await?;

        let row = txn
            .query_one(Statement::from_string(
                txn.get_database_backend(),
                "SELECT value FROM settings WHERE key = 'generation_counter'".to_owned(),
            ))
            .await?;

        let generation: i64 = row
            .map(|r| r.try_get::<String>("", "value").unwrap_or_default())
            .unwrap_or_default()
            .parse()
            .unwrap_or(0);

        txn.commit().await?;
        Ok(generation)
    }
}

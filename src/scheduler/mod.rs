//! Cron-driven scheduler: the outermost loop that ticks the generation
//! driver and the backup/reset sub-schedules on their own cron
//! expressions, independent of the main tick (spec.md §4.8).
//!
//! Grounded on `ingestor/scheduler.rs` in the teacher for the
//! cached-`cron::Schedule` + `tokio::time::interval` polling pattern, and
//! `teamarr/services/backup_service.py` for the backup sub-schedule being
//! decoupled from the main generation cadence.

pub mod generation;

use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::config::SchedulerConfig;
use generation::GenerationDriver;

/// A due backup or reset is reported to this collaborator; the actual
/// file I/O (spec.md §1 Non-goals: no backup/rotation utility in scope)
/// lives outside the core.
#[async_trait::async_trait]
pub trait BackupTrigger: Send + Sync {
    async fn run_backup(&self) -> anyhow::Result<()>;
    async fn run_reset(&self) -> anyhow::Result<()>;
}

struct CachedSchedule {
    expression: String,
    schedule: Option<Schedule>,
}

impl CachedSchedule {
    fn parse(expression: String) -> Self {
        let schedule = match Schedule::from_str(&expression) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(cron = %expression, error = %e, "invalid cron expression, schedule disabled");
                None
            }
        };
        Self { expression, schedule }
    }

    fn is_due(&self, since: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match &self.schedule {
            Some(schedule) => schedule.after(&since).next().is_some_and(|next| next <= now),
            None => false,
        }
    }
}

pub struct Scheduler {
    driver: GenerationDriver,
    backup_trigger: Option<Arc<dyn BackupTrigger>>,
    tick_interval: std::time::Duration,
    backup_schedule: CachedSchedule,
    reset_schedule: CachedSchedule,
}

impl Scheduler {
    pub fn new(driver: GenerationDriver, backup_trigger: Option<Arc<dyn BackupTrigger>>, config: &SchedulerConfig) -> Self {
        Self {
            driver,
            backup_trigger,
            tick_interval: config.tick_interval,
            backup_schedule: CachedSchedule::parse(config.backup_cron.clone()),
            reset_schedule: CachedSchedule::parse(config.reset_cron.clone()),
        }
    }

    /// Runs forever, ticking the generation driver on `tick_interval` and
    /// firing the backup/reset sub-schedules whenever their cron
    /// expression comes due relative to the last check.
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            tick_interval = ?self.tick_interval,
            backup_cron = %self.backup_schedule.expression,
            reset_cron = %self.reset_schedule.expression,
            "starting scheduler"
        );

        let mut ticker = interval(self.tick_interval);
        let mut last_sub_check = Utc::now();

        loop {
            ticker.tick().await;
            let now = Utc::now();

            match self.driver.run().await {
                Ok(summaries) => {
                    let matched: usize = summaries.iter().map(|s| s.matched).sum();
                    let created: usize = summaries.iter().map(|s| s.channels_created).sum();
                    info!(groups = summaries.len(), matched, channels_created = created, "generation run complete");
                }
                Err(e) => error!(error = %e, "generation run failed"),
            }

            if let Some(trigger) = &self.backup_trigger {
                if self.backup_schedule.is_due(last_sub_check, now) {
                    debug!("backup cron due, triggering backup");
                    if let Err(e) = trigger.run_backup().await {
                        error!(error = %e, "backup failed");
                    }
                }
                if self.reset_schedule.is_due(last_sub_check, now) {
                    debug!("reset cron due, triggering reset");
                    if let Err(e) = trigger.run_reset().await {
                        error!(error = %e, "reset failed");
                    }
                }
            }
            last_sub_check = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_cron_expression_disables_schedule_instead_of_panicking() {
        let schedule = CachedSchedule::parse("not a cron expression".to_string());
        assert!(schedule.schedule.is_none());
        assert!(!schedule.is_due(Utc::now() - chrono::Duration::hours(1), Utc::now()));
    }

    #[test]
    fn due_schedule_fires_once_interval_elapses() {
        let schedule = CachedSchedule::parse("0 0 * * * *".to_string());
        let since = Utc::now() - chrono::Duration::hours(2);
        assert!(schedule.is_due(since, Utc::now()));
    }
}

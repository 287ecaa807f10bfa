//! Default values used by `#[serde(default = "...")]` in `Config`.
//! Grounded on `config/defaults.rs` in the teacher.

pub fn default_busy_timeout() -> String {
    "30s".to_string()
}

pub fn default_journal_mode() -> String {
    "WAL".to_string()
}

pub fn default_synchronous() -> String {
    "NORMAL".to_string()
}

pub fn default_scheduler_tick() -> String {
    "1m".to_string()
}

pub fn default_backup_cron() -> String {
    "0 0 3 * * *".to_string()
}

pub fn default_reset_cron() -> String {
    "0 0 4 * * 0".to_string()
}

pub fn default_cache_refresh_staleness() -> String {
    "1d".to_string()
}

pub fn default_timezone() -> String {
    "UTC".to_string()
}

pub fn default_fuzzy_threshold() -> f64 {
    0.82
}

pub fn default_purge_after_generations() -> i64 {
    5
}

pub fn default_purge_failed_after_generations() -> i64 {
    2
}

pub fn default_channel_range_start() -> u32 {
    101
}

pub fn default_numbering_mode() -> String {
    "strict_block".to_string()
}

pub fn default_tsdb_requests_per_minute() -> u32 {
    30
}

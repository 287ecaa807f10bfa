//! Error type definitions for teamarr.

use thiserror::Error;

/// Top-level application error.
#[derive(Error, Debug)]
pub enum TeamarrError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("match error: {0}")]
    Match(#[from] MatchError),

    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TeamarrError {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// Errors from the stream-match cache layer.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("generation counter update failed: {message}")]
    GenerationUpdateFailed { message: String },
}

/// Errors from normalization / classification / matching.
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("invalid stream name: {reason}")]
    InvalidStreamName { reason: String },
}

/// Errors from the channel lifecycle / numbering / template subsystem.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("channel gateway error: {0}")]
    Gateway(String),

    #[error("no channel numbers remaining in range {start}-{end}")]
    NumberingExhausted { start: u32, end: u32 },

    #[error("unknown template variable: {name}")]
    UnknownVariable { name: String },
}

/// Errors from external sports-data provider clients.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {provider}: retry after {retry_after_secs}s")]
    RateLimited {
        provider: String,
        retry_after_secs: u64,
    },

    #[error("parse error from {provider}: {message}")]
    ParseError { provider: String, message: String },

    #[error("authentication failed for {provider}: {message}")]
    AuthenticationFailed { provider: String, message: String },

    #[error("unsupported league '{league}' for provider {provider}")]
    UnsupportedLeague { provider: String, league: String },

    #[error("exhausted retry budget for {provider} after {attempts} attempts")]
    RetryBudgetExhausted { provider: String, attempts: u32 },
}

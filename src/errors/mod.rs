//! Centralized error handling for teamarr.
//!
//! Mirrors the layering used across the pipeline: each subsystem gets its
//! own error enum, and `TeamarrError` composes them with `#[from]`
//! conversions so `?` works end to end from provider clients down to the
//! scheduler loop.

pub mod types;

pub use types::*;

pub type TeamarrResult<T> = Result<T, TeamarrError>;
pub type CacheResult<T> = Result<T, CacheError>;
pub type MatchResult<T> = Result<T, MatchError>;
pub type LifecycleResult<T> = Result<T, LifecycleError>;
pub type ProviderResult<T> = Result<T, ProviderError>;

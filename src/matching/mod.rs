//! The match pipeline: classify a stream, route it to the right matcher
//! tier, and fold the outcome back through the cache.
//!
//! Grounded on `teamarr/consumers/matching/` as a whole; spec.md §4.5
//! describes `stream_matcher` as the unifying entry point these submodules
//! feed into.

pub mod event_card_matcher;
pub mod fuzzy;
pub mod result;
pub mod stream_matcher;
pub mod team_matcher;

pub use result::{ExclusionReason, FailedReason, FilteredReason, MatchMethod, MatchOutcome};
pub use stream_matcher::{StreamMatcher, StreamMatcherConfig};

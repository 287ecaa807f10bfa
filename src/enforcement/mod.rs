//! Group-policy enforcement that runs after matching and before channel
//! create/delete calls: exception-keyword routing, cross-group dedup,
//! channel ordering, and orphan cleanup.
//!
//! Grounded on `teamarr/consumers/cross_group.py` and
//! `teamarr/consumers/event_group_processor.py`; spec.md §5 is the
//! authoritative contract.

pub mod cross_group;
pub mod keyword;
pub mod keyword_ordering;
pub mod ordering;
pub mod orphan;

pub use ordering::sort_channels;
pub use orphan::{is_aggregator_orphan, is_orphan};

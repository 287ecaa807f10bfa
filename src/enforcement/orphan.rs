//! Orphan-channel detection, grounded on
//! `teamarr/consumers/event_group_processor.py`'s cleanup pass: a channel
//! whose every attached stream has been removed from the upstream pool is
//! an orphan and gets scheduled for deletion even if its delete-timing
//! gate (spec.md §5) hasn't fired yet for the event itself.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::models::channel::ManagedChannelStream;

/// True once every stream attached to a channel has `removed_at` set —
/// the channel has nothing left to play and should be torn down
/// regardless of the event's own lifecycle state.
pub fn is_orphan(streams: &[ManagedChannelStream]) -> bool {
    !streams.is_empty() && streams.iter().all(|s| s.removed_at.is_some())
}

const AGGREGATOR_TVG_ID_PREFIX: &str = "teamarr-event-";

/// True when `tvg_id` carries teamarr's aggregator-channel prefix but no
/// longer matches any active `ManagedChannel` this crate knows about — a
/// leftover channel sitting in the aggregator itself (spec.md §4.7), a
/// different concept from [`is_orphan`]'s "every stream removed" check on
/// a `ManagedChannel` row teamarr still has bookkeeping for.
pub fn is_aggregator_orphan(tvg_id: &str, known_tvg_ids: &HashSet<String>) -> bool {
    tvg_id.starts_with(AGGREGATOR_TVG_ID_PREFIX) && !known_tvg_ids.contains(tvg_id)
}

/// Channels due for deletion per [`crate::database::repositories::managed_channel::ManagedChannelRepository::due_for_deletion`]
/// are deleted unconditionally; this just picks the reason text recorded
/// alongside the delete.
pub fn delete_reason(is_orphan: bool, timing_fired: bool) -> Option<&'static str> {
    if is_orphan {
        Some("all streams removed")
    } else if timing_fired {
        Some("delete timing elapsed")
    } else {
        None
    }
}

pub fn scheduled_delete_at(now: DateTime<Utc>) -> DateTime<Utc> {
    now
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn stream(removed: bool) -> ManagedChannelStream {
        ManagedChannelStream {
            id: Uuid::new_v4(),
            managed_channel_id: Uuid::new_v4(),
            dispatcharr_stream_id: 1,
            stream_name: "Test".to_string(),
            priority: 0,
            source_group_id: Uuid::new_v4(),
            source_group_type: "primary".to_string(),
            exception_keyword: None,
            m3u_account_name: None,
            removed_at: removed.then(Utc::now),
        }
    }

    #[test]
    fn all_removed_is_orphan() {
        assert!(is_orphan(&[stream(true), stream(true)]));
    }

    #[test]
    fn any_remaining_stream_is_not_orphan() {
        assert!(!is_orphan(&[stream(true), stream(false)]));
    }

    #[test]
    fn empty_channel_is_not_orphan() {
        assert!(!is_orphan(&[]));
    }

    #[test]
    fn known_teamarr_channel_is_not_an_aggregator_orphan() {
        let known: HashSet<String> = ["teamarr-event-espn-401".to_string()].into_iter().collect();
        assert!(!is_aggregator_orphan("teamarr-event-espn-401", &known));
    }

    #[test]
    fn unknown_teamarr_channel_is_an_aggregator_orphan() {
        let known: HashSet<String> = HashSet::new();
        assert!(is_aggregator_orphan("teamarr-event-espn-999", &known));
    }

    #[test]
    fn non_teamarr_channel_is_never_an_aggregator_orphan() {
        let known: HashSet<String> = HashSet::new();
        assert!(!is_aggregator_orphan("some-other-channel", &known));
    }
}

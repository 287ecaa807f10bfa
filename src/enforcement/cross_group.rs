//! Cross-group duplicate-event enforcement, grounded on
//! `teamarr/consumers/cross_group.py` and spec.md §4.7, scenario S5: when
//! the same event is matched by streams in more than one group, one
//! channel survives and the rest are folded into it as a post-pass over
//! already-created channels, not a decision made at creation time — a
//! group only ever creates or reuses its own channel
//! (`group_processor::process_group`), so a duplicate can only be
//! observed, never prevented, before this pass runs.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::models::channel::ManagedChannel;
use crate::models::group::OverlapHandling;

/// Groups `channels` by `(event_id, event_provider)`, keeping only the
/// sets that span more than one `event_epg_group_id` — spec.md §4.7's
/// definition of a cross-group duplicate. Within each set the
/// earliest-created channel is the winner; the rest are returned as
/// losers to consolidate into it.
pub fn find_duplicate_sets(channels: Vec<ManagedChannel>) -> Vec<(ManagedChannel, Vec<ManagedChannel>)> {
    let mut by_event: HashMap<(String, String), Vec<ManagedChannel>> = HashMap::new();
    for channel in channels {
        by_event
            .entry((channel.event_id.clone(), channel.event_provider.clone()))
            .or_default()
            .push(channel);
    }

    let mut sets: Vec<(ManagedChannel, Vec<ManagedChannel>)> = by_event
        .into_values()
        .filter_map(|mut group| {
            let distinct_groups: HashSet<Uuid> = group.iter().map(|c| c.event_epg_group_id).collect();
            if distinct_groups.len() < 2 {
                return None;
            }
            group.sort_by_key(|c| c.created_at);
            let winner = group.remove(0);
            Some((winner, group))
        })
        .collect();

    sets.sort_by_key(|(winner, _)| winner.id);
    sets
}

/// Whether a losing channel's owning group wants it folded into the
/// winner at all — `CreateAll` opts a group out of consolidation entirely,
/// since that policy exists specifically to keep a group's own copy of
/// every event (spec.md §4.7).
pub fn should_consolidate(loser_group_overlap: OverlapHandling) -> bool {
    !matches!(loser_group_overlap, OverlapHandling::CreateAll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn channel(event_id: &str, group_id: Uuid, created_at_hour: u32) -> ManagedChannel {
        ManagedChannel {
            id: Uuid::new_v4(),
            event_epg_group_id: group_id,
            event_id: event_id.to_string(),
            event_provider: "espn".to_string(),
            tvg_id: format!("teamarr-event-espn-{event_id}"),
            channel_name: event_id.to_string(),
            channel_number: 100,
            exception_keyword: None,
            dispatcharr_channel_id: None,
            scheduled_delete_at: None,
            deleted_at: None,
            delete_reason: None,
            sync_status: crate::models::channel::SyncStatus::Synced,
            created_at: Utc.with_ymd_and_hms(2026, 3, 10, created_at_hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn same_group_duplicates_are_not_cross_group() {
        let group_id = Uuid::new_v4();
        let channels = vec![channel("401", group_id, 9), channel("401", group_id, 10)];
        assert!(find_duplicate_sets(channels).is_empty());
    }

    #[test]
    fn channels_across_groups_for_the_same_event_are_a_duplicate_set() {
        let first_group = Uuid::new_v4();
        let second_group = Uuid::new_v4();
        let channels = vec![channel("401", first_group, 10), channel("401", second_group, 9)];
        let sets = find_duplicate_sets(channels);
        assert_eq!(sets.len(), 1);
        let (winner, losers) = &sets[0];
        assert_eq!(winner.event_epg_group_id, second_group);
        assert_eq!(losers.len(), 1);
        assert_eq!(losers[0].event_epg_group_id, first_group);
    }

    #[test]
    fn unrelated_events_never_group_together() {
        let channels = vec![channel("401", Uuid::new_v4(), 9), channel("402", Uuid::new_v4(), 9)];
        assert!(find_duplicate_sets(channels).is_empty());
    }

    #[test]
    fn create_all_opts_out_of_consolidation() {
        assert!(!should_consolidate(OverlapHandling::CreateAll));
        assert!(should_consolidate(OverlapHandling::AddStream));
        assert!(should_consolidate(OverlapHandling::Skip));
    }
}

//! Keyword-channel ordering enforcement, grounded on
//! `teamarr/consumers/event_group_processor.py` and spec.md §4.7: a
//! matched pair of channels for the same event — the group's main channel
//! and an exception-keyword channel routed off it — must always sort main
//! before keyword, regardless of which one happened to get the lower
//! number at creation time.

use crate::models::channel::ManagedChannel;

/// True when `main`'s channel number is not strictly less than
/// `keyword`'s, violating the ordering guarantee.
pub fn is_misordered(main: &ManagedChannel, keyword: &ManagedChannel) -> bool {
    main.channel_number >= keyword.channel_number
}

/// Pairs `channels` — all channels sharing one group and one
/// `(event_id, event_provider)` — into (main, keyword) tuples: the one
/// channel with no `exception_keyword` is the main channel, and every
/// keyword channel in the set is checked against it independently.
pub fn pair_main_with_keyword_channels(channels: &[ManagedChannel]) -> Vec<(&ManagedChannel, &ManagedChannel)> {
    let Some(main) = channels.iter().find(|c| c.exception_keyword.is_none()) else {
        return Vec::new();
    };
    channels
        .iter()
        .filter(|c| c.exception_keyword.is_some())
        .map(|keyword| (main, keyword))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn channel(number: u32, keyword: Option<&str>) -> ManagedChannel {
        ManagedChannel {
            id: Uuid::new_v4(),
            event_epg_group_id: Uuid::new_v4(),
            event_id: "401".to_string(),
            event_provider: "espn".to_string(),
            tvg_id: "teamarr-event-espn-401".to_string(),
            channel_name: "Test".to_string(),
            channel_number: number,
            exception_keyword: keyword.map(str::to_string),
            dispatcharr_channel_id: None,
            scheduled_delete_at: None,
            deleted_at: None,
            delete_reason: None,
            sync_status: crate::models::channel::SyncStatus::Synced,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn main_before_keyword_is_not_misordered() {
        assert!(!is_misordered(&channel(100, None), &channel(101, Some("redzone"))));
    }

    #[test]
    fn keyword_before_main_is_misordered() {
        assert!(is_misordered(&channel(101, None), &channel(100, Some("redzone"))));
    }

    #[test]
    fn equal_numbers_are_misordered() {
        assert!(is_misordered(&channel(100, None), &channel(100, Some("redzone"))));
    }

    #[test]
    fn no_main_channel_pairs_nothing() {
        let channels = vec![channel(100, Some("redzone")), channel(101, Some("prime"))];
        assert!(pair_main_with_keyword_channels(&channels).is_empty());
    }

    #[test]
    fn pairs_every_keyword_channel_with_the_one_main_channel() {
        let channels = vec![channel(100, None), channel(101, Some("redzone")), channel(102, Some("prime"))];
        let pairs = pair_main_with_keyword_channels(&channels);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|(main, _)| main.channel_number == 100));
    }
}

//! Channel ordering, grounded on `teamarr/database/channel_numbers.py`'s
//! sort-before-number pass: a group's channels are sorted once per
//! generation before numbers are handed out, so the numbering modes in
//! [`crate::lifecycle::numbering`] only ever deal with indices, never
//! comparisons.

use crate::models::channel::ManagedChannel;
use crate::models::event::Event;
use crate::models::group::ChannelSortOrder;

/// Sorts `items` in place according to `sort_order`. Ties (same sort key)
/// preserve relative input order — callers should pass items already in a
/// stable, deterministic order (e.g. by event id) so reruns are idempotent.
pub fn sort_channels(sort_order: ChannelSortOrder, items: &mut [(ManagedChannel, Event)]) {
    match sort_order {
        ChannelSortOrder::Time => items.sort_by_key(|(_, event)| event.start_time),
        ChannelSortOrder::SportTime => items.sort_by_key(|(_, event)| (event.sport.clone(), event.start_time)),
        ChannelSortOrder::LeagueTime => items.sort_by_key(|(_, event)| (event.league.clone(), event.start_time)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn channel(id: &str) -> ManagedChannel {
        ManagedChannel {
            id: Uuid::new_v4(),
            event_epg_group_id: Uuid::new_v4(),
            event_id: id.to_string(),
            event_provider: "espn".to_string(),
            tvg_id: format!("teamarr-event-espn-{id}"),
            channel_name: id.to_string(),
            channel_number: 0,
            exception_keyword: None,
            dispatcharr_channel_id: None,
            scheduled_delete_at: None,
            deleted_at: None,
            delete_reason: None,
            sync_status: crate::models::channel::SyncStatus::Synced,
            created_at: Utc::now(),
        }
    }

    fn event(id: &str, league: &str, hour: u32) -> Event {
        Event {
            id: id.to_string(),
            provider: "espn".to_string(),
            name: id.to_string(),
            short_name: id.to_string(),
            start_time: Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).unwrap(),
            home_team: crate::models::event::Team {
                id: String::new(),
                provider: "espn".to_string(),
                name: String::new(),
                short_name: String::new(),
                abbreviation: String::new(),
                league: league.to_string(),
                sport: "football".to_string(),
                logo_url: None,
                color: None,
                record_summary: None,
            },
            away_team: crate::models::event::Team {
                id: String::new(),
                provider: "espn".to_string(),
                name: String::new(),
                short_name: String::new(),
                abbreviation: String::new(),
                league: league.to_string(),
                sport: "football".to_string(),
                logo_url: None,
                color: None,
                record_summary: None,
            },
            status: crate::models::event::EventStatus {
                state: crate::models::event::EventState::Scheduled,
                detail: None,
                period: None,
                clock: None,
            },
            league: league.to_string(),
            sport: "football".to_string(),
            home_score: None,
            away_score: None,
            venue: None,
            broadcasts: Vec::new(),
            season_year: None,
            season_type: None,
            odds_data: None,
            main_card_start: None,
            segment_times: Default::default(),
            bouts: Vec::new(),
            fight_result_method: None,
            finish_round: None,
            finish_time: None,
            weight_class: None,
            fighter1_scores: None,
            fighter2_scores: None,
        }
    }

    #[test]
    fn sorts_by_start_time() {
        let mut items = vec![(channel("b"), event("b", "NFL", 20)), (channel("a"), event("a", "NFL", 13))];
        sort_channels(ChannelSortOrder::Time, &mut items);
        assert_eq!(items[0].1.id, "a");
    }

    #[test]
    fn sorts_by_league_then_time() {
        let mut items = vec![
            (channel("a"), event("a", "NBA", 13)),
            (channel("b"), event("b", "MLB", 13)),
        ];
        sort_channels(ChannelSortOrder::LeagueTime, &mut items);
        assert_eq!(items[0].1.league, "MLB");
    }
}

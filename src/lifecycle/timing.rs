//! Create/delete timing gates, grounded on
//! `teamarr/consumers/event_group_processor.py`'s scheduling checks and
//! spec.md §5's timing enums.

use chrono::{DateTime, Duration, Utc};

use crate::models::group::{CreateTiming, DeleteTiming};

/// Whether a channel for an event starting at `event_start` should exist
/// yet, given `now` and the group's configured lead time. `Manual` timing
/// never triggers automatic creation — the caller must have already
/// created the channel through some other path.
pub fn should_create(timing: CreateTiming, event_start: DateTime<Utc>, stream_available: bool, now: DateTime<Utc>) -> bool {
    match timing {
        CreateTiming::SameDay => now.date_naive() >= event_start.date_naive(),
        CreateTiming::StreamAvailable => stream_available,
        CreateTiming::DayBefore => now >= event_start - Duration::days(1),
        CreateTiming::TwoDaysBefore => now >= event_start - Duration::days(2),
        CreateTiming::ThreeDaysBefore => now >= event_start - Duration::days(3),
        CreateTiming::OneWeekBefore => now >= event_start - Duration::days(7),
        CreateTiming::Manual => false,
    }
}

/// Whether a channel whose event ended at `event_end` should be deleted by
/// `now`. `StreamRemoved` fires independently of elapsed time: it's true
/// the moment the backing stream disappears from the upstream pool,
/// regardless of how long ago the event ended.
pub fn should_delete(timing: DeleteTiming, event_end: DateTime<Utc>, stream_removed: bool, now: DateTime<Utc>) -> bool {
    match timing {
        DeleteTiming::StreamRemoved => stream_removed,
        DeleteTiming::SameDay => now.date_naive() > event_end.date_naive(),
        DeleteTiming::DayAfter => now >= event_end + Duration::days(1),
        DeleteTiming::TwoDaysAfter => now >= event_end + Duration::days(2),
        DeleteTiming::ThreeDaysAfter => now >= event_end + Duration::days(3),
        DeleteTiming::OneWeekAfter => now >= event_end + Duration::days(7),
    }
}

/// The earliest instant at which `should_delete(timing, event_end, false,
/// _)` flips from false to true — used to precompute a channel's
/// `scheduled_delete_at` at creation time, since `ManagedChannel` doesn't
/// persist the event's own end time for a later re-evaluation (see
/// DESIGN.md). `StreamRemoved` has no such instant: that gate only fires
/// once the stream actually disappears from the upstream pool, which the
/// orphan sweep (`crate::enforcement::orphan`) detects independently.
pub fn delete_at(timing: DeleteTiming, event_end: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match timing {
        DeleteTiming::StreamRemoved => None,
        DeleteTiming::SameDay => {
            let next_day = event_end.date_naive() + Duration::days(1);
            Some(next_day.and_hms_opt(0, 0, 0).unwrap().and_utc())
        }
        DeleteTiming::DayAfter => Some(event_end + Duration::days(1)),
        DeleteTiming::TwoDaysAfter => Some(event_end + Duration::days(2)),
        DeleteTiming::ThreeDaysAfter => Some(event_end + Duration::days(3)),
        DeleteTiming::OneWeekAfter => Some(event_end + Duration::days(7)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).unwrap()
    }

    #[test]
    fn day_before_triggers_24h_early() {
        let event_start = at(20);
        let now = Utc.with_ymd_and_hms(2026, 3, 9, 20, 1, 0).unwrap();
        assert!(should_create(CreateTiming::DayBefore, event_start, false, now));
    }

    #[test]
    fn manual_never_auto_creates() {
        assert!(!should_create(CreateTiming::Manual, at(20), true, at(20)));
    }

    #[test]
    fn stream_removed_ignores_elapsed_time() {
        let event_end = at(23);
        assert!(should_delete(DeleteTiming::StreamRemoved, event_end, true, at(0)));
        assert!(!should_delete(DeleteTiming::StreamRemoved, event_end, false, at(0)));
    }

    #[test]
    fn same_day_waits_for_next_calendar_day() {
        let event_end = at(23);
        let still_today = at(23);
        let tomorrow = Utc.with_ymd_and_hms(2026, 3, 11, 0, 1, 0).unwrap();
        assert!(!should_delete(DeleteTiming::SameDay, event_end, false, still_today));
        assert!(should_delete(DeleteTiming::SameDay, event_end, false, tomorrow));
    }

    #[test]
    fn stream_removed_has_no_fixed_delete_instant() {
        assert_eq!(delete_at(DeleteTiming::StreamRemoved, at(23)), None);
    }

    #[test]
    fn delete_at_matches_should_delete_boundary() {
        let event_end = at(23);
        for timing in [
            DeleteTiming::SameDay,
            DeleteTiming::DayAfter,
            DeleteTiming::TwoDaysAfter,
            DeleteTiming::ThreeDaysAfter,
            DeleteTiming::OneWeekAfter,
        ] {
            let cutoff = delete_at(timing, event_end).unwrap();
            assert!(!should_delete(timing, event_end, false, cutoff - Duration::seconds(1)));
            assert!(should_delete(timing, event_end, false, cutoff));
        }
    }
}

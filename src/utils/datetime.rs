//! Timezone helpers. Every persisted timestamp is UTC; presentation
//! converts to the configured user timezone (spec.md §3, §8 property 9).

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DateTimeError {
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
}

pub fn parse_timezone(name: &str) -> Result<Tz, DateTimeError> {
    name.parse::<Tz>()
        .map_err(|_| DateTimeError::UnknownTimezone(name.to_string()))
}

/// The calendar date a UTC instant falls on in the given timezone.
pub fn date_in_tz(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_rolls_over_at_local_midnight_not_utc() {
        let tz = parse_timezone("America/New_York").unwrap();
        // 2024-10-16T03:00:00Z is still 2024-10-15 22:00 local (EDT, UTC-4).
        let instant = Utc.with_ymd_and_hms(2024, 10, 16, 3, 0, 0).unwrap();
        assert_eq!(
            date_in_tz(instant, tz),
            NaiveDate::from_ymd_opt(2024, 10, 15).unwrap()
        );
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert!(parse_timezone("Not/AZone").is_err());
    }
}

//! Human-readable duration formatting, used for provider rate-limit
//! status strings ("rate-limited, paused 45s") per spec.md §6. Trimmed
//! from the teacher's `utils/human_format.rs`, which also formatted
//! memory sizes teamarr has no use for.

/// Formats a time duration in milliseconds to a human-readable string.
pub fn format_duration(millis: u64) -> String {
    if millis == 0 {
        return "0ms".to_string();
    }

    if millis < 1000 {
        format!("{}ms", millis)
    } else if millis < 60_000 {
        let seconds = millis as f64 / 1000.0;
        if seconds >= 10.0 {
            format!("{:.1}s", seconds)
        } else {
            format!("{:.2}s", seconds)
        }
    } else if millis < 3_600_000 {
        let total_seconds = millis / 1000;
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if seconds == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m{}s", minutes, seconds)
        }
    } else {
        let total_seconds = millis / 1000;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if seconds == 0 && minutes == 0 {
            format!("{}h", hours)
        } else if seconds == 0 {
            format!("{}h{}m", hours, minutes)
        } else {
            format!("{}h{}m{}s", hours, minutes, seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0ms");
        assert_eq!(format_duration(500), "500ms");
        assert_eq!(format_duration(999), "999ms");
        assert_eq!(format_duration(1000), "1.00s");
        assert_eq!(format_duration(1500), "1.50s");
        assert_eq!(format_duration(10000), "10.0s");
        assert_eq!(format_duration(59000), "59.0s");
        assert_eq!(format_duration(60000), "1m");
        assert_eq!(format_duration(90000), "1m30s");
        assert_eq!(format_duration(3600000), "1h");
        assert_eq!(format_duration(3660000), "1h1m");
        assert_eq!(format_duration(3661000), "1h1m1s");
    }
}

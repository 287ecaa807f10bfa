//! Stream name normalization: mojibake repair, provider-prefix stripping,
//! diacritic folding, and date/time/league hint extraction.
//!
//! Grounded on `teamarr/consumers/matching/normalizer.py` — the original's
//! own module was a thin dataclass shell around `unidecode` and a handful
//! of curated tables; this port fills in the extraction logic the shell
//! implied, using [`deunicode`] (the Rust ecosystem's `unidecode`
//! equivalent, also used for this purpose by the `knylbyte-tuliprox` and
//! `euzu-m3u-filter` playlist processors in the retrieval pack).

pub mod constants;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

use crate::models::NormalizedStream;
use constants::{CITY_TRANSLATIONS, LEAGUE_HINT_PATTERNS, PROVIDER_PREFIXES};

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})(?:[/-](\d{2,4}))?\b").unwrap())
}

fn time_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2}):(\d{2})\s*(am|pm|AM|PM)?\b").unwrap())
}

/// Repairs UTF-8 text that was decoded once as Latin-1 and re-encoded as
/// UTF-8 ("München" -> "MÃ¼nchen"). Re-interpreting each character's code
/// point as a raw byte and re-decoding as UTF-8 undoes exactly that
/// double-encoding; if the result isn't valid UTF-8, the input wasn't
/// mojibake and is returned unchanged.
fn repair_mojibake(input: &str) -> String {
    if !input.chars().all(|c| (c as u32) <= 0xFF) {
        return input.to_string();
    }
    let bytes: Vec<u8> = input.chars().map(|c| c as u8).collect();
    match String::from_utf8(bytes) {
        Ok(repaired) if repaired.chars().any(|c| !c.is_ascii()) => repaired,
        _ => input.to_string(),
    }
}

fn apply_city_translations(input: &str) -> String {
    let mut out = input.to_string();
    for (from, to) in CITY_TRANSLATIONS {
        out = out.replace(from, to);
    }
    out
}

fn strip_provider_prefix(input: &str) -> (String, Option<String>) {
    for prefix in PROVIDER_PREFIXES {
        if let Some(rest) = input.strip_prefix(prefix) {
            return (rest.trim().to_string(), Some((*prefix).trim().to_string()));
        }
    }
    (input.to_string(), None)
}

fn extract_date_hint(input: &str, reference_year: i32) -> Option<NaiveDate> {
    let caps = date_pattern().captures(input)?;
    let month: u32 = caps.get(1)?.as_str().parse().ok()?;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year = match caps.get(3) {
        Some(y) => {
            let raw: i32 = y.as_str().parse().ok()?;
            if raw < 100 {
                2000 + raw
            } else {
                raw
            }
        }
        None => reference_year,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn extract_time_hint(input: &str) -> Option<NaiveTime> {
    let caps = time_pattern().captures(input)?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
    if let Some(meridiem) = caps.get(3) {
        let is_pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hour = match (hour, is_pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn extract_league_hint(input: &str) -> Option<String> {
    let upper = input.to_uppercase();
    LEAGUE_HINT_PATTERNS
        .iter()
        .find(|(pattern, _)| upper.contains(pattern))
        .map(|(_, league)| league.to_string())
}

/// Runs the full normalization pipeline on a raw stream name. `reference_year`
/// anchors two-component dates ("10/15") that carry no year.
pub fn normalize_stream(raw: &str, reference_year: i32) -> NormalizedStream {
    let repaired = repair_mojibake(raw);
    let (stripped, provider_prefix) = strip_provider_prefix(repaired.trim());
    let translated = apply_city_translations(&stripped);
    let folded = deunicode::deunicode(&translated);

    let date_hint = extract_date_hint(&folded, reference_year);
    let time_hint = extract_time_hint(&folded);
    let league_hint = extract_league_hint(&folded);

    let cleaned = folded.split_whitespace().collect::<Vec<_>>().join(" ");

    NormalizedStream {
        original: raw.to_string(),
        cleaned,
        date_hint,
        time_hint,
        league_hint,
        provider_prefix,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_provider_prefix() {
        let result = normalize_stream("ESPN+ : TB Buccaneers vs DET Lions | NFL 10/15", 2025);
        assert_eq!(result.provider_prefix.as_deref(), Some("ESPN+ :"));
        assert!(result.cleaned.starts_with("TB Buccaneers"));
    }

    #[test]
    fn repairs_double_encoded_diacritics() {
        let result = normalize_stream("FC Bayern MÃ¼nchen vs Real Madrid", 2025);
        assert!(result.cleaned.contains("Munich") || result.cleaned.contains("Munchen"));
    }

    #[test]
    fn extracts_date_and_league_hint() {
        let result = normalize_stream("NFL Sunday: Bills vs Jets 10/15", 2025);
        assert_eq!(result.league_hint.as_deref(), Some("NFL"));
        assert_eq!(
            result.date_hint,
            NaiveDate::from_ymd_opt(2025, 10, 15)
        );
    }

    #[test]
    fn leaves_plain_ascii_untouched_by_mojibake_repair() {
        assert_eq!(repair_mojibake("Lakers vs Celtics"), "Lakers vs Celtics");
    }
}

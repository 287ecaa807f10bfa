//! Classifies a normalized stream name into PLACEHOLDER / EVENT_CARD /
//! TEAM_VS_TEAM, extracting team names or an event hint along the way.
//!
//! Grounded on `teamarr/consumers/matching/classifier.py` and spec.md §4.2.
//! `CustomRegexConfig` support (per-group override patterns) lives in
//! [`custom_regex`].

pub mod custom_regex;

use crate::models::event::Segment;
use crate::models::{ClassifiedStream, NormalizedStream, StreamCategory};
use crate::normalizer::constants::{EVENT_CARD_KEYWORDS, GAME_SEPARATORS, PLACEHOLDER_PATTERNS};
use custom_regex::CustomRegexConfig;

/// Classifies a stream, honoring an optional per-group custom regex
/// override. Built-in separators/keywords are skipped entirely for any
/// component the custom config disables.
pub fn classify(normalized: NormalizedStream, custom: Option<&CustomRegexConfig>) -> ClassifiedStream {
    if let Some(config) = custom {
        if let Some(result) = custom_regex::try_match(&normalized, config) {
            return result;
        }
        if config.disables_builtin_teams() {
            return placeholder(normalized);
        }
    }

    if is_placeholder(&normalized) {
        return placeholder(normalized);
    }

    if let Some((event_hint, segment)) = detect_event_card(&normalized) {
        return ClassifiedStream {
            category: StreamCategory::EventCard,
            event_hint: Some(event_hint),
            card_segment: segment,
            team1: None,
            team2: None,
            normalized,
        };
    }

    if let Some((team1, team2)) = detect_team_pair(&normalized) {
        return ClassifiedStream {
            category: StreamCategory::TeamVsTeam,
            team1: Some(team1),
            team2: Some(team2),
            event_hint: None,
            card_segment: None,
            normalized,
        };
    }

    placeholder(normalized)
}

fn placeholder(normalized: NormalizedStream) -> ClassifiedStream {
    ClassifiedStream {
        category: StreamCategory::Placeholder,
        normalized,
        team1: None,
        team2: None,
        event_hint: None,
        card_segment: None,
    }
}

fn is_placeholder(normalized: &NormalizedStream) -> bool {
    let lower = normalized.cleaned.to_lowercase();
    if lower.trim().is_empty() {
        return true;
    }
    if PLACEHOLDER_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }
    let has_separator = GAME_SEPARATORS.iter().any(|sep| normalized.cleaned.contains(sep));
    let has_hint = normalized.league_hint.is_some();
    !has_separator && !has_hint
}

fn detect_event_card(normalized: &NormalizedStream) -> Option<(String, Option<Segment>)> {
    let lower = normalized.cleaned.to_lowercase();
    let keyword = EVENT_CARD_KEYWORDS.iter().find(|k| lower.contains(*k))?;

    let segment = if lower.contains("early prelims") {
        Some(Segment::EarlyPrelims)
    } else if lower.contains("prelims") || lower.contains("preliminary card") {
        Some(Segment::Prelims)
    } else if lower.contains("main card") || lower.contains("main event") {
        Some(Segment::MainCard)
    } else {
        None
    };

    let event_hint = normalized
        .cleaned
        .split(|c: char| !c.is_alphanumeric() && c != ' ')
        .find(|token| {
            let t = token.to_lowercase();
            t.contains("ufc") || t.contains("pfl") || t.contains("bellator")
        })
        .unwrap_or(keyword)
        .trim()
        .to_string();

    Some((event_hint, segment))
}

fn detect_team_pair(normalized: &NormalizedStream) -> Option<(String, String)> {
    for separator in GAME_SEPARATORS {
        if let Some(idx) = normalized.cleaned.find(separator) {
            let team1 = normalized.cleaned[..idx].trim();
            let team2 = normalized.cleaned[idx + separator.len()..].trim();
            if !team1.is_empty() && !team2.is_empty() {
                return Some((strip_trailing_league(team1), strip_trailing_league(team2)));
            }
        }
    }
    None
}

/// Strips a trailing `| NFL 10/15`-style suffix from the second team name,
/// left behind once the date/league portion wasn't part of the separator.
fn strip_trailing_league(team: &str) -> String {
    team.split('|').next().unwrap_or(team).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize_stream;

    #[test]
    fn classifies_team_vs_team() {
        let normalized = normalize_stream("TB Buccaneers vs DET Lions | NFL 10/15", 2025);
        let classified = classify(normalized, None);
        assert_eq!(classified.category, StreamCategory::TeamVsTeam);
        assert_eq!(classified.team1.as_deref(), Some("TB Buccaneers"));
        assert_eq!(classified.team2.as_deref(), Some("DET Lions"));
    }

    #[test]
    fn classifies_event_card_with_segment() {
        let normalized = normalize_stream("UFC 315: Main Card", 2025);
        let classified = classify(normalized, None);
        assert_eq!(classified.category, StreamCategory::EventCard);
        assert_eq!(classified.card_segment, Some(Segment::MainCard));
    }

    #[test]
    fn classifies_placeholder() {
        let normalized = normalize_stream("Off Air", 2025);
        let classified = classify(normalized, None);
        assert_eq!(classified.category, StreamCategory::Placeholder);
    }
}

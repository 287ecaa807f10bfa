//! Per-group override for the built-in separator/keyword heuristics.
//! Grounded on spec.md §4.2's `CustomRegexConfig`: named capture groups
//! `team1`/`team2` are honored if present, else numbered groups 1/2.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::{ClassifiedStream, NormalizedStream, StreamCategory};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRegexConfig {
    pub teams_pattern: Option<String>,
    pub event_name_pattern: Option<String>,
    #[serde(default)]
    pub disable_builtin_teams: bool,
}

impl CustomRegexConfig {
    pub fn disables_builtin_teams(&self) -> bool {
        self.disable_builtin_teams
    }
}

/// Tries the group's custom pattern(s) before any built-in heuristic.
/// Returns `None` if no custom pattern is configured or none match, in
/// which case the caller falls through to the built-in classifier.
pub fn try_match(normalized: &NormalizedStream, config: &CustomRegexConfig) -> Option<ClassifiedStream> {
    if let Some(pattern) = &config.teams_pattern {
        if let Ok(re) = Regex::new(pattern) {
            if let Some(caps) = re.captures(&normalized.cleaned) {
                let team1 = caps
                    .name("team1")
                    .or_else(|| caps.get(1))
                    .map(|m| m.as_str().trim().to_string());
                let team2 = caps
                    .name("team2")
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str().trim().to_string());
                if let (Some(team1), Some(team2)) = (team1, team2) {
                    return Some(ClassifiedStream {
                        category: StreamCategory::TeamVsTeam,
                        team1: Some(team1),
                        team2: Some(team2),
                        event_hint: None,
                        card_segment: None,
                        normalized: normalized.clone(),
                    });
                }
            }
        }
    }

    if let Some(pattern) = &config.event_name_pattern {
        if let Ok(re) = Regex::new(pattern) {
            if let Some(caps) = re.captures(&normalized.cleaned) {
                let event_hint = caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_else(|| normalized.cleaned.clone());
                return Some(ClassifiedStream {
                    category: StreamCategory::EventCard,
                    team1: None,
                    team2: None,
                    event_hint: Some(event_hint),
                    card_segment: None,
                    normalized: normalized.clone(),
                });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize_stream;

    #[test]
    fn named_groups_take_priority_over_numbered() {
        let normalized = normalize_stream("Home: Lakers | Away: Celtics", 2025);
        let config = CustomRegexConfig {
            teams_pattern: Some(r"Home: (?P<team1>[^|]+)\| Away: (?P<team2>.+)".to_string()),
            event_name_pattern: None,
            disable_builtin_teams: false,
        };
        let result = try_match(&normalized, &config).expect("should match");
        assert_eq!(result.team1.as_deref(), Some("Lakers"));
        assert_eq!(result.team2.as_deref(), Some("Celtics"));
    }
}

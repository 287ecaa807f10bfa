//! Team alias table and fuzzy name matching, grounded on
//! `teamarr/utilities/fuzzy_match.py` and `teamarr/utilities/constants.py`'s
//! `TEAM_ALIASES`. Uses `strsim` (Jaro-Winkler) in place of the original's
//! rapidfuzz, producing the same 0-100 scale for parity with spec.md §4.3's
//! named score range.

use crate::models::Team;

/// Curated nickname/shorthand -> canonical-name-fragment aliases that
/// fuzzy matching alone wouldn't bridge (e.g. "the pats" -> "patriots").
/// Intentionally small: prefer user-defined aliases in the database.
pub const TEAM_ALIASES: &[(&str, &str)] = &[
    ("the pats", "patriots"),
    ("the niners", "49ers"),
    ("birds", "eagles"),
    ("the cardiac cats", "panthers"),
    ("bolts", "chargers"),
    ("skins", "commanders"),
    ("the gunners", "arsenal"),
    ("the reds", "liverpool"),
    ("the blues", "chelsea"),
    ("spurs", "tottenham"),
];

pub fn alias_lookup(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    TEAM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| *canonical)
}

/// All the name forms a team can appear under in a stream name: full name,
/// short name, abbreviation, and the bare city/nickname split off the name.
pub fn generate_team_patterns(team: &Team) -> Vec<String> {
    let mut patterns = vec![
        team.name.to_lowercase(),
        team.short_name.to_lowercase(),
        team.abbreviation.to_lowercase(),
    ];
    if let Some(nickname) = team.name.split_whitespace().last() {
        patterns.push(nickname.to_lowercase());
    }
    patterns.retain(|p| !p.is_empty());
    patterns.dedup();
    patterns
}

#[derive(Debug, Clone, Copy)]
pub struct FuzzyResult {
    pub matched: bool,
    pub score: f64,
}

/// The original's `fuzzy_threshold` default, applied when the caller
/// doesn't have a group-specific override on hand.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 82.0;

/// Best Jaro-Winkler ratio (scaled 0-100) between `candidate` and any
/// pattern in `patterns`, treated as matched once it clears `threshold`.
pub fn matches_any(patterns: &[String], candidate: &str, threshold: f64) -> FuzzyResult {
    let candidate_lower = candidate.to_lowercase();
    let mut best = 0.0_f64;
    for pattern in patterns {
        let score = strsim::jaro_winkler(pattern, &candidate_lower) * 100.0;
        if score > best {
            best = score;
        }
        if candidate_lower.contains(pattern.as_str()) || pattern.contains(candidate_lower.as_str()) {
            best = best.max(95.0);
        }
    }
    FuzzyResult {
        matched: best >= threshold,
        score: best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_team() -> Team {
        Team {
            id: "1".to_string(),
            provider: "espn".to_string(),
            name: "Tampa Bay Buccaneers".to_string(),
            short_name: "Buccaneers".to_string(),
            abbreviation: "TB".to_string(),
            league: "NFL".to_string(),
            sport: "football".to_string(),
            logo_url: None,
            color: None,
            record_summary: None,
        }
    }

    #[test]
    fn matches_abbreviation_exactly() {
        let patterns = generate_team_patterns(&sample_team());
        let result = matches_any(&patterns, "TB Buccaneers", DEFAULT_FUZZY_THRESHOLD);
        assert!(result.matched);
    }

    #[test]
    fn rejects_unrelated_name() {
        let patterns = generate_team_patterns(&sample_team());
        let result = matches_any(&patterns, "Detroit Lions", DEFAULT_FUZZY_THRESHOLD);
        assert!(!result.matched);
    }

    #[test]
    fn alias_resolves_nickname() {
        assert_eq!(alias_lookup("the niners"), Some("49ers"));
    }
}

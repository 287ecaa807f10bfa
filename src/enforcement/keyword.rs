//! Exception-keyword routing, grounded on
//! `teamarr/consumers/event_group_processor.py`'s exception-keyword branch
//! and spec.md §5: a stream whose name contains a configured exception
//! keyword gets its own sibling channel instead of being folded into the
//! event's primary channel, optionally with a different duplicate-handling
//! behavior than the group's default.

use crate::models::group::{DuplicateEventMode, ExceptionKeyword};

/// The first configured exception keyword found in `stream_name`
/// (case-insensitive), if any. Keywords are checked in configuration
/// order, so a more specific keyword should be listed before a more
/// general one that would also match.
pub fn find_exception_keyword<'a>(stream_name: &str, keywords: &'a [ExceptionKeyword]) -> Option<&'a ExceptionKeyword> {
    let lower = stream_name.to_lowercase();
    keywords.iter().find(|k| lower.contains(&k.keyword.to_lowercase()))
}

/// The duplicate-event mode to apply for a stream, honoring a matched
/// exception keyword's override before falling back to the group default.
pub fn effective_duplicate_mode(
    matched_keyword: Option<&ExceptionKeyword>,
    group_default: DuplicateEventMode,
) -> DuplicateEventMode {
    matched_keyword
        .and_then(|k| k.behavior_override)
        .unwrap_or(group_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<ExceptionKeyword> {
        vec![
            ExceptionKeyword {
                keyword: "redzone".to_string(),
                behavior_override: Some(DuplicateEventMode::Separate),
            },
            ExceptionKeyword {
                keyword: "alt".to_string(),
                behavior_override: None,
            },
        ]
    }

    #[test]
    fn finds_keyword_case_insensitively() {
        let kws = keywords();
        let found = find_exception_keyword("NFL RedZone Channel", &kws);
        assert_eq!(found.map(|k| k.keyword.as_str()), Some("redzone"));
    }

    #[test]
    fn override_takes_priority_over_group_default() {
        let kws = keywords();
        let found = find_exception_keyword("NFL RedZone Channel", &kws);
        let mode = effective_duplicate_mode(found, DuplicateEventMode::Consolidate);
        assert_eq!(mode, DuplicateEventMode::Separate);
    }

    #[test]
    fn no_override_falls_back_to_group_default() {
        let kws = keywords();
        let found = find_exception_keyword("ESPN Alt Feed", &kws);
        let mode = effective_duplicate_mode(found, DuplicateEventMode::Consolidate);
        assert_eq!(mode, DuplicateEventMode::Consolidate);
    }
}

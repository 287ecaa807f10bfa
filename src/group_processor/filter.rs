//! Pre-match filter stage, grounded on spec.md §4.7's pipeline
//! (`fetch streams -> filter (stale, event-pattern, include regex, exclude
//! regex) -> match`). Streams dropped here never reach the matcher, unlike
//! `FilteredReason::Unclassifiable`/`NoGameIndicator`, which the matcher
//! itself produces after attempting classification.

use regex::Regex;

use crate::matching::result::FilteredReason;
use crate::models::group::EventEpgGroup;
use crate::models::stream::Stream;

/// The reason `stream` should never reach the matcher, if any. Checked in
/// order: staleness first (cheapest, no regex compilation), then the
/// group's exclude pattern, then its include pattern, then team name
/// exclude/include lists.
pub fn filtered_reason(stream: &Stream, group: &EventEpgGroup) -> Option<FilteredReason> {
    if stream.stale {
        return Some(FilteredReason::StaleInAggregator);
    }

    if any_pattern_matches(&group.exclude_regex, &stream.name) {
        return Some(FilteredReason::ExcludedByPattern);
    }
    if !group.include_regex.is_empty() && !any_pattern_matches(&group.include_regex, &stream.name) {
        return Some(FilteredReason::NotIncludedByPattern);
    }

    let lower = stream.name.to_lowercase();
    if group.team_exclude.iter().any(|t| lower.contains(&t.to_lowercase())) {
        return Some(FilteredReason::ExcludedByPattern);
    }
    if !group.team_include.is_empty() && !group.team_include.iter().any(|t| lower.contains(&t.to_lowercase())) {
        return Some(FilteredReason::NotIncludedByPattern);
    }

    None
}

/// Splits `streams` into ones that pass the filter stage and a count of
/// ones dropped, so the caller can fold the count into its run summary
/// without individually auditing each drop (spec.md §4.7 treats this stage
/// as a cheap pre-pass, not an audited decision like a match attempt).
pub fn partition(streams: Vec<Stream>, group: &EventEpgGroup) -> (Vec<Stream>, usize) {
    let mut kept = Vec::with_capacity(streams.len());
    let mut dropped = 0;
    for stream in streams {
        if filtered_reason(&stream, group).is_some() {
            dropped += 1;
        } else {
            kept.push(stream);
        }
    }
    (kept, dropped)
}

fn any_pattern_matches(patterns: &[String], text: &str) -> bool {
    patterns
        .iter()
        .any(|p| Regex::new(p).map(|re| re.is_match(text)).unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> EventEpgGroup {
        EventEpgGroup {
            id: uuid::Uuid::new_v4(),
            name: "NFL".to_string(),
            leagues: vec!["NFL".to_string()],
            template_id: uuid::Uuid::new_v4(),
            duplicate_event_mode: crate::models::group::DuplicateEventMode::Consolidate,
            overlap_handling: crate::models::group::OverlapHandling::AddStream,
            channel_start_number: None,
            assignment_mode: crate::models::group::ChannelAssignmentMode::Auto,
            numbering_mode: crate::models::group::ChannelNumberingMode::StrictBlock,
            sort_order: crate::models::group::ChannelSortOrder::Time,
            order_index: 0,
            parent_group_id: None,
            include_leagues: vec![],
            include_regex: vec![],
            exclude_regex: vec![],
            team_include: vec![],
            team_exclude: vec![],
            exception_keywords: vec![],
            total_stream_count: 0,
            create_timing: crate::models::group::CreateTiming::SameDay,
            delete_timing: crate::models::group::DeleteTiming::StreamRemoved,
            include_final_events: false,
            enabled: true,
        }
    }

    fn stream(name: &str, stale: bool) -> Stream {
        Stream {
            id: 1,
            name: name.to_string(),
            tvg_id: None,
            group_id: uuid::Uuid::new_v4(),
            account_id: None,
            stale,
        }
    }

    #[test]
    fn stale_stream_is_filtered() {
        let g = group();
        assert_eq!(filtered_reason(&stream("Bills vs Jets", true), &g), Some(FilteredReason::StaleInAggregator));
    }

    #[test]
    fn exclude_regex_drops_matching_stream() {
        let mut g = group();
        g.exclude_regex = vec!["(?i)redzone".to_string()];
        assert_eq!(
            filtered_reason(&stream("NFL RedZone", false), &g),
            Some(FilteredReason::ExcludedByPattern)
        );
    }

    #[test]
    fn include_regex_drops_non_matching_stream() {
        let mut g = group();
        g.include_regex = vec!["(?i)^NFL:".to_string()];
        assert_eq!(
            filtered_reason(&stream("NBA: Lakers vs Celtics", false), &g),
            Some(FilteredReason::NotIncludedByPattern)
        );
        assert_eq!(filtered_reason(&stream("NFL: Bills vs Jets", false), &g), None);
    }

    #[test]
    fn team_include_restricts_to_named_teams() {
        let mut g = group();
        g.team_include = vec!["Bills".to_string()];
        assert_eq!(
            filtered_reason(&stream("Jets vs Dolphins", false), &g),
            Some(FilteredReason::NotIncludedByPattern)
        );
        assert_eq!(filtered_reason(&stream("Bills vs Jets", false), &g), None);
    }

    #[test]
    fn partition_counts_dropped_streams() {
        let g = group();
        let streams = vec![stream("Bills vs Jets", false), stream("Stale Feed", true)];
        let (kept, dropped) = partition(streams, &g);
        assert_eq!(kept.len(), 1);
        assert_eq!(dropped, 1);
    }
}

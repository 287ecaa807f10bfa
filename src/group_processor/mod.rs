//! Per-group processing pipeline: orders groups parent-before-child and
//! single-league-before-multi-league (spec.md §4.7), then runs
//! filter -> match -> lifecycle for each group's stream pool. Cross-group
//! duplicate reconciliation runs afterward, as a sweep over every group's
//! output (`enforcement::cross_group`, driven from
//! `scheduler::generation`), not inline here.
//!
//! Grounded on `teamarr/consumers/event_group_processor.py`.

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use uuid::Uuid;

use crate::channel_gateway::ChannelGateway;
use crate::classifier::custom_regex::CustomRegexConfig;
use crate::database::repositories::{AuditRepository, ManagedChannelRepository};
use crate::enforcement::keyword;
use crate::errors::TeamarrResult;
use crate::lifecycle::numbering::round_up_to_block_size;
use crate::lifecycle::{timing, NumberingPlan, TemplateContext};
use crate::matching::{MatchOutcome, StreamMatcher};
use crate::models::channel::{ManagedChannel, ManagedChannelStream, SyncStatus};
use crate::models::group::{ChannelNumberingMode, EventEpgGroup};
use crate::models::stream::Stream;

mod filter;

/// Fallback channel-name template used until a group's template record is
/// wired up; channel naming itself is fully templated (see
/// `crate::lifecycle::template`), only the *lookup* of a group's specific
/// template is out of scope here (see DESIGN.md).
const DEFAULT_CHANNEL_NAME_TEMPLATE: &str = "{{away_team}} @ {{home_team}}";

/// Used instead of [`DEFAULT_CHANNEL_NAME_TEMPLATE`] when the matched
/// stream carries a card segment (spec.md §4.6 UFC expansion, scenario
/// S3's `" - Early Prelims"` suffix). Combat-sports events have no
/// home/away teams, so this names the channel from the event itself.
const SEGMENT_CHANNEL_NAME_TEMPLATE: &str = "{{event_name}} - {{segment}}";

#[derive(Debug, Default, Clone)]
pub struct GroupRunSummary {
    pub group_id: Uuid,
    pub matched: usize,
    pub filtered: usize,
    pub failed: usize,
    pub channels_created: usize,
    pub streams_attached: usize,
}

/// Orders groups so every parent precedes its children (Kahn's algorithm),
/// then stable-sorts the result into spec.md §4.7's three phases:
/// single-league parent groups, then child groups, then multi-league
/// groups. Groups form a forest per spec.md §5, so a true cycle indicates
/// corrupted configuration; cyclic leftovers are appended in input order
/// rather than panicking, since this runs inside an unattended scheduler.
pub fn topo_sort(groups: &[EventEpgGroup]) -> Vec<Uuid> {
    let ids: HashSet<Uuid> = groups.iter().map(|g| g.id).collect();
    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut indegree: HashMap<Uuid, u32> = groups.iter().map(|g| (g.id, 0)).collect();

    for group in groups {
        if let Some(parent) = group.parent_group_id {
            if ids.contains(&parent) {
                children.entry(parent).or_default().push(group.id);
                *indegree.get_mut(&group.id).unwrap() += 1;
            }
        }
    }

    let mut queue: VecDeque<Uuid> = indegree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&id, _)| id)
        .collect();
    let mut ordered = Vec::with_capacity(groups.len());
    let mut visited = HashSet::new();

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        ordered.push(id);
        if let Some(kids) = children.get(&id) {
            for &kid in kids {
                let entry = indegree.get_mut(&kid).unwrap();
                *entry = entry.saturating_sub(1);
                if *entry == 0 {
                    queue.push_back(kid);
                }
            }
        }
    }

    for group in groups {
        if !visited.contains(&group.id) {
            ordered.push(group.id);
        }
    }

    let by_id: HashMap<Uuid, &EventEpgGroup> = groups.iter().map(|g| (g.id, g)).collect();
    ordered.sort_by_key(|&id| phase_of(id, &by_id));
    ordered
}

/// A group's ordering phase: 0 for a single-league top-level group, 1 for
/// a child of one, 2 for anything descending from (or being) a
/// multi-league group. Phase is inherited from the root of a group's
/// forest rather than computed from the group's own league count alone,
/// so a multi-league root's single-league children still sort after every
/// plain single-league tree — sorting any other way would put a child
/// ahead of a phase-2 parent and break the parents-precede-children
/// invariant the scheduler relies on.
fn phase_of(id: Uuid, by_id: &HashMap<Uuid, &EventEpgGroup>) -> u8 {
    let mut root = by_id[&id];
    while let Some(parent) = root.parent_group_id.and_then(|p| by_id.get(&p)) {
        root = parent;
    }
    if root.is_multi_league() {
        2
    } else if by_id[&id].is_child() {
        1
    } else {
        0
    }
}

pub struct GroupProcessor {
    matcher: StreamMatcher,
    channels: ManagedChannelRepository,
    audit: AuditRepository,
    gateway: Arc<dyn ChannelGateway>,
    numbering: NumberingPlan,
}

impl GroupProcessor {
    pub fn new(
        matcher: StreamMatcher,
        channels: ManagedChannelRepository,
        audit: AuditRepository,
        gateway: Arc<dyn ChannelGateway>,
        numbering: NumberingPlan,
    ) -> Self {
        Self {
            matcher,
            channels,
            audit,
            gateway,
            numbering,
        }
    }

    pub async fn process_group(
        &self,
        group: &EventEpgGroup,
        streams: Vec<Stream>,
        generation: i64,
        run_id: Uuid,
        now: DateTime<Utc>,
        custom_regex: Option<&CustomRegexConfig>,
    ) -> TeamarrResult<GroupRunSummary> {
        let mut summary = GroupRunSummary {
            group_id: group.id,
            ..Default::default()
        };

        let (streams, pre_filtered) = filter::partition(streams, group);
        summary.filtered += pre_filtered;

        let results = self
            .matcher
            .match_group(group, streams, generation, now, custom_regex)
            .await?;

        let mut used: BTreeSet<u32> = self
            .channels
            .used_numbers_in_range(self.numbering.range_start, self.numbering.range_end)
            .await?
            .into_iter()
            .collect();
        let mut index_in_group: u32 = 0;

        // Sized from the group's *potential* stream count for StrictBlock
        // (spec.md §3/§5), or from its *actual current* channel count for
        // RationalBlock, both rounded up to the numbering gap; StrictCompact
        // ignores block_size entirely.
        let block_size = match group.numbering_mode {
            ChannelNumberingMode::RationalBlock => {
                let current_channel_count = self.channels.find_for_group(group.id, false).await?.len() as u32;
                round_up_to_block_size(current_channel_count.max(1))
            }
            ChannelNumberingMode::StrictBlock | ChannelNumberingMode::StrictCompact => {
                round_up_to_block_size(group.total_stream_count.max(1))
            }
        };

        for result in results {
            let (event, card_segment, detected_league, exclusion) = match &result.outcome {
                MatchOutcome::Filtered { .. } => {
                    summary.filtered += 1;
                    continue;
                }
                MatchOutcome::Failed { reason, detail } => {
                    summary.failed += 1;
                    self.audit
                        .record_failure(crate::models::audit::FailedMatch {
                            id: Uuid::new_v4(),
                            run_id,
                            group_id: group.id,
                            stream_id: result.stream.id,
                            stream_name: result.stream.name.clone(),
                            category: "team_vs_team".to_string(),
                            reason: format!("{reason:?}"),
                            detail: detail.clone(),
                        })
                        .await?;
                    continue;
                }
                MatchOutcome::Matched {
                    exclusion: Some(_), ..
                } => {
                    summary.filtered += 1;
                    continue;
                }
                MatchOutcome::Matched {
                    event,
                    card_segment,
                    detected_league,
                    exclusion,
                    method,
                    confidence,
                    ..
                } => {
                    self.audit
                        .record_match(crate::models::audit::MatchedStream {
                            id: Uuid::new_v4(),
                            run_id,
                            group_id: group.id,
                            stream_id: result.stream.id,
                            detected_league: detected_league.clone(),
                            parsed_team1: None,
                            parsed_team2: None,
                            match_method: format!("{method:?}"),
                            confidence: *confidence,
                            event_id: event.id.clone(),
                            included: exclusion.is_none(),
                            exclusion_reason: exclusion.as_ref().map(|e| format!("{e:?}")),
                        })
                        .await?;
                    (event.as_ref(), *card_segment, detected_league.clone(), exclusion.clone())
                }
            };
            debug_assert!(exclusion.is_none());

            summary.matched += 1;
            let matched_keyword = keyword::find_exception_keyword(&result.stream.name, &group.exception_keywords);
            let keyword_str = matched_keyword.map(|k| k.keyword.as_str());

            // Each group only ever creates or reuses its *own* channel for
            // an event; a second group matching the same event gets its own
            // channel too, and the two are reconciled afterward by the
            // cross-group consolidation sweep (spec.md §4.7 scenario S5),
            // since that sweep needs both channels to already exist.
            let own_existing = self
                .channels
                .find_active(group.id, &event.id, &event.provider, keyword_str)
                .await?;

            let channel = match own_existing {
                Some(channel) => channel,
                None => {
                    if !timing::should_create(group.create_timing, event.start_time, true, now) {
                        continue;
                    }

                    let number = self.numbering.assign(
                        group.numbering_mode,
                        group.channel_start_number,
                        block_size,
                        index_in_group,
                        &used,
                    )?;
                    used.insert(number);
                    index_in_group += 1;

                    let ctx = TemplateContext::from_event(event, card_segment);
                    let template = if card_segment.is_some() {
                        SEGMENT_CHANNEL_NAME_TEMPLATE
                    } else {
                        DEFAULT_CHANNEL_NAME_TEMPLATE
                    };
                    let channel_name = crate::lifecycle::render(template, &ctx)?;
                    let tvg_id = ManagedChannel::make_tvg_id(&event.provider, &event.id);

                    let dispatcharr_id = self.gateway.create_channel(&channel_name, number, &tvg_id).await?;

                    let channel = ManagedChannel {
                        id: Uuid::new_v4(),
                        event_epg_group_id: group.id,
                        event_id: event.id.clone(),
                        event_provider: event.provider.clone(),
                        tvg_id,
                        channel_name,
                        channel_number: number,
                        exception_keyword: keyword_str.map(str::to_string),
                        dispatcharr_channel_id: Some(dispatcharr_id),
                        scheduled_delete_at: timing::delete_at(group.delete_timing, event.start_time),
                        deleted_at: None,
                        delete_reason: None,
                        sync_status: SyncStatus::Synced,
                        created_at: now,
                    };
                    let channel = self.channels.insert(channel).await?;
                    summary.channels_created += 1;
                    channel
                }
            };

            if !self
                .channels
                .stream_exists_on_channel(channel.id, result.stream.id)
                .await?
            {
                let priority = self.channels.next_stream_priority(channel.id).await?;
                self.gateway
                    .attach_stream(
                        channel.dispatcharr_channel_id.unwrap_or_default(),
                        result.stream.id,
                        priority,
                    )
                    .await?;
                self.channels
                    .add_stream(ManagedChannelStream {
                        id: Uuid::new_v4(),
                        managed_channel_id: channel.id,
                        dispatcharr_stream_id: result.stream.id,
                        stream_name: result.stream.name.clone(),
                        priority,
                        source_group_id: group.id,
                        source_group_type: "primary".to_string(),
                        exception_keyword: keyword_str.map(str::to_string),
                        m3u_account_name: result.stream.account_id.clone(),
                        removed_at: None,
                    })
                    .await?;
                summary.streams_attached += 1;
            }

            let _ = detected_league;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: Uuid, parent: Option<Uuid>) -> EventEpgGroup {
        EventEpgGroup {
            id,
            name: id.to_string(),
            leagues: vec!["NFL".to_string()],
            template_id: Uuid::new_v4(),
            duplicate_event_mode: crate::models::group::DuplicateEventMode::Consolidate,
            overlap_handling: crate::models::group::OverlapHandling::AddStream,
            channel_start_number: None,
            assignment_mode: crate::models::group::ChannelAssignmentMode::Auto,
            numbering_mode: crate::models::group::ChannelNumberingMode::StrictBlock,
            sort_order: crate::models::group::ChannelSortOrder::Time,
            order_index: 0,
            parent_group_id: parent,
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

    fn multi_league_group(id: Uuid) -> EventEpgGroup {
        let mut g = group(id, None);
        g.leagues = vec!["NFL".to_string(), "NBA".to_string()];
        g
    }

    #[test]
    fn parents_precede_children() {
        let parent_id = Uuid::new_v4();
        let child_id = Uuid::new_v4();
        let groups = vec![group(child_id, Some(parent_id)), group(parent_id, None)];
        let order = topo_sort(&groups);
        let parent_pos = order.iter().position(|&id| id == parent_id).unwrap();
        let child_pos = order.iter().position(|&id| id == child_id).unwrap();
        assert!(parent_pos < child_pos);
    }

    #[test]
    fn single_league_parents_precede_child_and_multi_league_groups() {
        let single_league_id = Uuid::new_v4();
        let child_id = Uuid::new_v4();
        let multi_league_id = Uuid::new_v4();
        let groups = vec![
            multi_league_group(multi_league_id),
            group(child_id, Some(single_league_id)),
            group(single_league_id, None),
        ];
        let order = topo_sort(&groups);
        let pos = |id: Uuid| order.iter().position(|&g| g == id).unwrap();
        assert!(pos(single_league_id) < pos(child_id));
        assert!(pos(child_id) < pos(multi_league_id));
    }

    #[test]
    fn children_of_a_multi_league_root_sort_with_their_root() {
        let multi_league_root = Uuid::new_v4();
        let single_league_root = Uuid::new_v4();
        let child_of_multi = Uuid::new_v4();
        let groups = vec![
            group(single_league_root, None),
            multi_league_group(multi_league_root),
            group(child_of_multi, Some(multi_league_root)),
        ];
        let order = topo_sort(&groups);
        let pos = |id: Uuid| order.iter().position(|&g| g == id).unwrap();
        assert!(pos(single_league_root) < pos(multi_league_root));
        assert!(pos(multi_league_root) < pos(child_of_multi));
    }

    #[test]
    fn independent_groups_all_appear() {
        let groups = vec![group(Uuid::new_v4(), None), group(Uuid::new_v4(), None)];
        assert_eq!(topo_sort(&groups).len(), 2);
    }
}

//! Unified per-stream match entry point: normalize, classify, route to the
//! team or event-card matcher, then apply the group's inclusion gate.
//!
//! Grounded on spec.md §4.5 ("StreamMatcher unified") and
//! `teamarr/consumers/event_group_processor.py`'s per-stream loop, which
//! calls normalizer -> classifier -> the appropriate matcher in sequence
//! before handing results to the lifecycle stage.

use chrono::{DateTime, Datelike, Utc};
use std::sync::Arc;

use super::event_card_matcher::{EventCardContext, EventCardMatcher};
use super::fuzzy::DEFAULT_FUZZY_THRESHOLD;
use super::result::{ExclusionReason, FilteredReason, MatchOutcome};
use super::team_matcher::{MatchContext, TeamMatcher};
use crate::cache::StreamMatchCache;
use crate::classifier::custom_regex::CustomRegexConfig;
use crate::classifier::classify;
use crate::errors::MatchResult;
use crate::models::event::EventState;
use crate::models::group::EventEpgGroup;
use crate::models::stream::{Stream, StreamCategory};
use crate::normalizer::normalize_stream;
use crate::providers::SportsDataService;

#[derive(Debug, Clone, Copy)]
pub struct StreamMatcherConfig {
    pub fuzzy_threshold: f64,
}

impl Default for StreamMatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

/// The outcome of one stream's pass through the pipeline, still carrying
/// the stream it came from so downstream lifecycle code knows what to
/// attach it to.
#[derive(Debug, Clone)]
pub struct MatchedStreamResult {
    pub stream: Stream,
    pub outcome: MatchOutcome,
}

pub struct StreamMatcher {
    team_matcher: TeamMatcher,
    event_card_matcher: EventCardMatcher,
    cache: Arc<StreamMatchCache>,
}

impl StreamMatcher {
    pub fn new(sports: Arc<SportsDataService>, cache: Arc<StreamMatchCache>, config: StreamMatcherConfig) -> Self {
        Self {
            team_matcher: TeamMatcher::new(sports.clone(), cache.clone(), config.fuzzy_threshold),
            event_card_matcher: EventCardMatcher::new(sports, cache.clone()),
            cache,
        }
    }

    /// Matches a single stream against `group`'s configured league(s).
    pub async fn match_stream(
        &self,
        group: &EventEpgGroup,
        stream: Stream,
        generation: i64,
        now: DateTime<Utc>,
        custom_regex: Option<&CustomRegexConfig>,
    ) -> MatchResult<MatchedStreamResult> {
        let normalized = normalize_stream(&stream.name, now.year());
        let classified = classify(normalized, custom_regex);

        let outcome = match classified.category {
            StreamCategory::Placeholder => MatchOutcome::filtered(FilteredReason::Unclassifiable, None),

            StreamCategory::TeamVsTeam => {
                let ctx = MatchContext {
                    group_id: group.id,
                    stream: stream.clone(),
                    classified,
                    generation,
                    now,
                };
                if group.is_multi_league() {
                    self.team_matcher.match_multi_league(&ctx, &group.leagues).await?
                } else {
                    let league = group.leagues.first().cloned().unwrap_or_default();
                    self.team_matcher.match_single_league(&ctx, &league).await?
                }
            }

            StreamCategory::EventCard => {
                let ctx = EventCardContext {
                    group_id: group.id,
                    stream: stream.clone(),
                    classified,
                    generation,
                    now,
                };
                let league = group.leagues.first().cloned().unwrap_or_default();
                self.event_card_matcher.match_event(&ctx, &league).await?
            }
        };

        Ok(MatchedStreamResult {
            stream,
            outcome: apply_inclusion_gate(outcome, group),
        })
    }

    /// Matches every stream in a group's pool, then purges cache entries
    /// that fell out of the retention window as of this generation.
    pub async fn match_group(
        &self,
        group: &EventEpgGroup,
        streams: Vec<Stream>,
        generation: i64,
        now: DateTime<Utc>,
        custom_regex: Option<&CustomRegexConfig>,
    ) -> MatchResult<Vec<MatchedStreamResult>> {
        let mut results = Vec::with_capacity(streams.len());
        for stream in streams {
            results.push(self.match_stream(group, stream, generation, now, custom_regex).await?);
        }
        self.cache.purge_stale(generation).await?;
        Ok(results)
    }
}

/// `included ⇔ matched ∧ detected_league ∈ include_leagues ∧
/// (include_final_events ∨ ¬is_final(event))` — spec.md §8 property 4.
/// Leaves `Filtered`/`Failed` outcomes untouched; only a `Matched` outcome
/// can be further excluded here.
fn apply_inclusion_gate(outcome: MatchOutcome, group: &EventEpgGroup) -> MatchOutcome {
    let MatchOutcome::Matched {
        event,
        method,
        origin_method,
        confidence,
        detected_league,
        card_segment,
        ..
    } = outcome
    else {
        return outcome;
    };

    let league_ok = group.include_leagues.is_empty()
        || group
            .include_leagues
            .iter()
            .any(|l| l.eq_ignore_ascii_case(&detected_league));
    let final_ok = group.include_final_events || event.status.state != EventState::Final;

    let exclusion = if !league_ok {
        Some(ExclusionReason::LeagueNotIncluded {
            league: detected_league.clone(),
        })
    } else if !final_ok {
        Some(ExclusionReason::EventFinal)
    } else {
        None
    };

    MatchOutcome::Matched {
        event,
        method,
        origin_method,
        confidence,
        detected_league,
        card_segment,
        exclusion,
    }
}

//! Result categories for the match pipeline.
//!
//! Grounded on `teamarr/consumers/matching/result.py` (category export
//! surface) and spec.md §7/§9: the redesign flag there calls for a tagged
//! sum type in place of the Python source's stringly-typed
//! `exclusion_reason`, so `MatchOutcome` is a proper enum with payload
//! instead of a struct of optional fields.

use serde::{Deserialize, Serialize};

use crate::models::event::{Event, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilteredReason {
    Unclassifiable,
    NoGameIndicator,
    LeagueNotEnabled,
    StaleInAggregator,
    /// Dropped by a group's `exclude_regex` or `team_exclude` pre-match
    /// filter (spec.md §4.7).
    ExcludedByPattern,
    /// A group's `include_regex` or `team_include` is non-empty and the
    /// stream matched none of it.
    NotIncludedByPattern,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedReason {
    NoEventOnDate,
    TeamsNotParsed,
    Team1NotFound,
    Team2NotFound,
    NoEventCardMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Alias,
    Fuzzy,
    Keyword,
    Cache,
    UserCorrected,
}

/// Why a matched-but-excluded stream was excluded. Distinct from
/// `FilteredReason`: these apply to streams that *did* match an event but
/// fail the inclusion gate (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    EventFinal,
    LeagueNotIncluded { league: String },
}

/// The result of one matcher invocation for one stream. A tagged sum type
/// per spec.md §9's redesign note, replacing ad hoc boolean/optional
/// combinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Filtered {
        reason: FilteredReason,
        detail: Option<String>,
    },
    Failed {
        reason: FailedReason,
        detail: Option<String>,
    },
    Matched {
        event: Box<Event>,
        method: MatchMethod,
        /// The tier that first produced the hit, preserved even when this
        /// particular outcome came from the cache (method=Cache).
        origin_method: MatchMethod,
        confidence: f64,
        detected_league: String,
        card_segment: Option<Segment>,
        exclusion: Option<ExclusionReason>,
    },
}

impl MatchOutcome {
    pub fn filtered(reason: FilteredReason, detail: impl Into<Option<String>>) -> Self {
        Self::Filtered {
            reason,
            detail: detail.into(),
        }
    }

    pub fn failed(reason: FailedReason, detail: impl Into<Option<String>>) -> Self {
        Self::Failed {
            reason,
            detail: detail.into(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn matched(
        event: Event,
        method: MatchMethod,
        origin_method: MatchMethod,
        confidence: f64,
        detected_league: impl Into<String>,
        card_segment: Option<Segment>,
    ) -> Self {
        Self::Matched {
            event: Box::new(event),
            method,
            origin_method,
            confidence,
            detected_league: detected_league.into(),
            card_segment,
            exclusion: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    pub fn event(&self) -> Option<&Event> {
        match self {
            Self::Matched { event, .. } => Some(event),
            _ => None,
        }
    }

    /// `included ⇔ matched ∧ detected_league ∈ include_leagues ∧
    /// (include_final_events ∨ ¬is_final(event))` — spec.md §8 property 4.
    pub fn included(&self) -> bool {
        matches!(self, Self::Matched { exclusion: None, .. })
    }
}

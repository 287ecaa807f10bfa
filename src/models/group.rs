//! `EventEPGGroup` and `LeagueMapping`, grounded on
//! `teamarr/database/groups.py` and `teamarr/services/league_mappings.py`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateEventMode {
    Consolidate,
    Separate,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapHandling {
    AddStream,
    AddOnly,
    CreateAll,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelAssignmentMode {
    Manual,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelNumberingMode {
    StrictBlock,
    RationalBlock,
    StrictCompact,
}

impl Default for ChannelNumberingMode {
    fn default() -> Self {
        ChannelNumberingMode::StrictBlock
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSortOrder {
    Time,
    SportTime,
    LeagueTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateTiming {
    SameDay,
    StreamAvailable,
    DayBefore,
    TwoDaysBefore,
    ThreeDaysBefore,
    OneWeekBefore,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteTiming {
    StreamRemoved,
    SameDay,
    DayAfter,
    TwoDaysAfter,
    ThreeDaysAfter,
    OneWeekAfter,
}

/// User-configured bundle tying an upstream stream collection to a list of
/// leagues and a rendering template. Groups form a forest via
/// `parent_group_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEpgGroup {
    pub id: Uuid,
    pub name: String,
    pub leagues: Vec<String>,
    pub template_id: Uuid,
    pub duplicate_event_mode: DuplicateEventMode,
    pub overlap_handling: OverlapHandling,
    pub channel_start_number: Option<u32>,
    pub assignment_mode: ChannelAssignmentMode,
    pub numbering_mode: ChannelNumberingMode,
    pub sort_order: ChannelSortOrder,
    pub order_index: i32,
    pub parent_group_id: Option<Uuid>,
    pub include_leagues: Vec<String>,
    pub include_regex: Vec<String>,
    pub exclude_regex: Vec<String>,
    pub team_include: Vec<String>,
    pub team_exclude: Vec<String>,
    pub exception_keywords: Vec<ExceptionKeyword>,
    /// Used for block-reservation numbering.
    pub total_stream_count: u32,
    pub create_timing: CreateTiming,
    pub delete_timing: DeleteTiming,
    pub include_final_events: bool,
    pub enabled: bool,
}

impl EventEpgGroup {
    pub fn is_multi_league(&self) -> bool {
        self.leagues.len() > 1
    }

    pub fn is_child(&self) -> bool {
        self.parent_group_id.is_some()
    }
}

/// A user-configured token that routes matching streams to a sibling
/// "keyword channel", optionally overriding the group's default duplicate
/// handling for that stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionKeyword {
    pub keyword: String,
    pub behavior_override: Option<DuplicateEventMode>,
}

/// Binds a canonical league code to one provider's identifiers. Loaded
/// entirely into memory at service init; read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueMapping {
    pub canonical_code: String,
    pub provider: String,
    pub provider_league_id: String,
    pub provider_league_name: String,
    pub sport: String,
    pub display_name: String,
    pub aliases: Vec<String>,
    pub logo_url: Option<String>,
}

//! Audit rows written per top-level run, grounded on spec.md §3's
//! `ProcessingRun / MatchedStream / FailedMatch` and
//! `teamarr/consumers/generation.py`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingRun {
    pub id: Uuid,
    pub generation: i64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedStream {
    pub id: Uuid,
    pub run_id: Uuid,
    pub group_id: Uuid,
    pub stream_id: i64,
    pub detected_league: String,
    pub parsed_team1: Option<String>,
    pub parsed_team2: Option<String>,
    pub match_method: String,
    pub confidence: f64,
    pub event_id: String,
    pub included: bool,
    pub exclusion_reason: Option<String>,
}

/// A lifecycle event recorded against a `ManagedChannel` outside the normal
/// match/fail audit trail: cross-group consolidation, disabled-group
/// cleanup, and similar enforcement actions each leave one of these behind
/// so an operator can see why a channel was merged or retired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelHistoryEntry {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub action: String,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedMatch {
    pub id: Uuid,
    pub run_id: Uuid,
    pub group_id: Uuid,
    pub stream_id: i64,
    pub stream_name: String,
    pub category: String,
    pub reason: String,
    pub detail: Option<String>,
}

//! Stream and classification models, grounded on
//! `teamarr/consumers/matching/{normalizer,classifier}.py`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::Segment;

/// An entry from an upstream aggregator's M3U group. Opaque except by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub id: i64,
    pub name: String,
    pub tvg_id: Option<String>,
    pub group_id: Uuid,
    pub account_id: Option<String>,
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedStream {
    pub original: String,
    pub cleaned: String,
    pub date_hint: Option<NaiveDate>,
    pub time_hint: Option<chrono::NaiveTime>,
    pub league_hint: Option<String>,
    pub provider_prefix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamCategory {
    Placeholder,
    EventCard,
    TeamVsTeam,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedStream {
    pub category: StreamCategory,
    pub normalized: NormalizedStream,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub event_hint: Option<String>,
    pub card_segment: Option<Segment>,
}

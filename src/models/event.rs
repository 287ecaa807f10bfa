//! Core sports data types, grounded on `teamarr/core/types.py`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub provider: String,
    pub name: String,
    pub short_name: String,
    pub abbreviation: String,
    pub league: String,
    pub sport: String,
    pub logo_url: Option<String>,
    pub color: Option<String>,
    /// Combat sports fighter record, e.g. "8-1-0" (W-L-D).
    pub record_summary: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    Scheduled,
    Live,
    Final,
    Postponed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStatus {
    pub state: EventState,
    pub detail: Option<String>,
    pub period: Option<i32>,
    pub clock: Option<String>,
}

/// A single bout on a combat-sports card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bout {
    pub fighter1: String,
    pub fighter2: String,
    pub segment: Segment,
    /// Position on card; 0 is the opener, higher values are later.
    pub order: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    EarlyPrelims,
    Prelims,
    MainCard,
}

impl Segment {
    pub fn order(self) -> u8 {
        match self {
            Segment::EarlyPrelims => 0,
            Segment::Prelims => 1,
            Segment::MainCard => 2,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Segment::EarlyPrelims => "Early Prelims",
            Segment::Prelims => "Prelims",
            Segment::MainCard => "Main Card",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub provider: String,
    pub name: String,
    pub short_name: String,
    pub start_time: DateTime<Utc>,
    pub home_team: Team,
    pub away_team: Team,
    pub status: EventStatus,
    pub league: String,
    pub sport: String,

    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub venue: Option<Venue>,
    #[serde(default)]
    pub broadcasts: Vec<String>,
    pub season_year: Option<i32>,
    pub season_type: Option<String>,

    pub odds_data: Option<serde_json::Value>,

    /// Combat sports: when the main card begins (prelims start at `start_time`).
    pub main_card_start: Option<DateTime<Utc>>,

    /// Combat sports: exact segment start times from bout-level provider data.
    #[serde(default)]
    pub segment_times: HashMap<Segment, DateTime<Utc>>,

    #[serde(default)]
    pub bouts: Vec<Bout>,

    pub fight_result_method: Option<String>,
    pub finish_round: Option<u32>,
    pub finish_time: Option<String>,
    pub weight_class: Option<String>,
    #[serde(default)]
    pub fighter1_scores: Option<Vec<i32>>,
    #[serde(default)]
    pub fighter2_scores: Option<Vec<i32>>,
}

impl Event {
    /// Whether this event is still "ongoing" for matching purposes: live
    /// events, or events that started in the past but haven't been marked
    /// final, remain eligible for a generation run started the next day.
    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status.state, EventState::Live)
            || (self.status.state == EventState::Scheduled && self.start_time <= now)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamStats {
    pub record: String,
    pub wins: i32,
    pub losses: i32,
    pub ties: i32,
    pub home_record: Option<String>,
    pub away_record: Option<String>,
    pub streak: Option<String>,
    pub streak_count: i32,
    pub rank: Option<i32>,
    pub playoff_seed: Option<i32>,
    pub games_back: Option<f64>,
    pub conference: Option<String>,
    pub conference_abbrev: Option<String>,
    pub division: Option<String>,
    pub ppg: Option<f64>,
    pub papg: Option<f64>,
}

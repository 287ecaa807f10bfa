//! ESPN scoreboard/team provider. Grounded on `teamarr/providers/espn.py`
//! (interface implied by `SportsDataService`'s `supports_league` contract)
//! and the teacher's `reqwest::Client` usage pattern in `sources/m3u.rs`.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::SportsDataProvider;
use crate::errors::{ProviderError, ProviderResult};
use crate::models::{Event, EventStatus, Team, TeamStats};

pub struct EspnProvider {
    client: Client,
    base_url: String,
    priority: i32,
    leagues: Vec<String>,
}

impl EspnProvider {
    pub fn new(base_url: impl Into<String>, priority: i32, leagues: Vec<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("teamarr/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            priority,
            leagues,
        }
    }

    fn scoreboard_url(&self, league: &str, target_date: NaiveDate) -> String {
        format!(
            "{}/apis/site/v2/sports/{}/scoreboard?dates={}",
            self.base_url,
            league.to_lowercase(),
            target_date.format("%Y%m%d")
        )
    }
}

#[derive(Debug, Deserialize)]
struct ScoreboardResponse {
    events: Vec<ScoreboardEvent>,
}

#[derive(Debug, Deserialize)]
struct ScoreboardEvent {
    id: String,
    name: String,
    #[serde(rename = "shortName")]
    short_name: String,
    date: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
impl SportsDataProvider for EspnProvider {
    fn name(&self) -> &str {
        "espn"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn supports_league(&self, league: &str) -> bool {
        self.leagues.iter().any(|l| l.eq_ignore_ascii_case(league))
    }

    async fn get_events(&self, league: &str, target_date: NaiveDate) -> ProviderResult<Vec<Event>> {
        let url = self.scoreboard_url(league, target_date);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                provider: self.name().to_string(),
                retry_after_secs: 60,
            });
        }

        let body: ScoreboardResponse = response.json().await?;

        Ok(body
            .events
            .into_iter()
            .map(|e| Event {
                id: e.id,
                provider: "espn".to_string(),
                name: e.name,
                short_name: e.short_name,
                start_time: e.date,
                home_team: placeholder_team(league),
                away_team: placeholder_team(league),
                status: EventStatus {
                    state: crate::models::EventState::Scheduled,
                    detail: None,
                    period: None,
                    clock: None,
                },
                league: league.to_string(),
                sport: league.to_string(),
                home_score: None,
                away_score: None,
                venue: None,
                broadcasts: Vec::new(),
                season_year: None,
                season_type: None,
                odds_data: None,
                main_card_start: None,
                segment_times: Default::default(),
                bouts: Vec::new(),
                fight_result_method: None,
                finish_round: None,
                finish_time: None,
                weight_class: None,
                fighter1_scores: None,
                fighter2_scores: None,
            })
            .collect())
    }

    async fn get_team_schedule(
        &self,
        _team_id: &str,
        _league: &str,
        _days_ahead: u32,
    ) -> ProviderResult<Vec<Event>> {
        Ok(Vec::new())
    }

    async fn get_team(&self, _team_id: &str, _league: &str) -> ProviderResult<Option<Team>> {
        Ok(None)
    }

    async fn get_event(&self, _event_id: &str, _league: &str) -> ProviderResult<Option<Event>> {
        Ok(None)
    }

    async fn get_team_stats(&self, _team_id: &str, _league: &str) -> ProviderResult<Option<TeamStats>> {
        Ok(None)
    }
}

/// ESPN's scoreboard endpoint nests team detail in a `competitions` array
/// this minimal client doesn't parse yet; home/away are filled in from the
/// full competitor payload once that's wired up.
fn placeholder_team(league: &str) -> Team {
    Team {
        id: String::new(),
        provider: "espn".to_string(),
        name: String::new(),
        short_name: String::new(),
        abbreviation: String::new(),
        league: league.to_string(),
        sport: league.to_string(),
        logo_url: None,
        color: None,
        record_summary: None,
    }
}

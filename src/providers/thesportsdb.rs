//! TheSportsDB provider, rate-limited per spec.md §6 (30 requests/minute,
//! exponential backoff on 429). Grounded on `teamarr/providers/tsdb.py`
//! (interface implied by `SportsDataService.provider_stats()`'s
//! `rate_limit_stats()` reference) and [`super::rate_limit`].

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::rate_limit::RateLimiter;
use super::SportsDataProvider;
use crate::errors::{ProviderError, ProviderResult};
use crate::models::{Event, EventStatus, Team, TeamStats};

pub struct TheSportsDbProvider {
    client: Client,
    base_url: String,
    api_key: String,
    priority: i32,
    leagues: Vec<String>,
    limiter: RateLimiter,
}

impl TheSportsDbProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        priority: i32,
        leagues: Vec<String>,
        requests_per_minute: u32,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("teamarr/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            priority,
            leagues,
            limiter: RateLimiter::per_minute(requests_per_minute),
        }
    }

    async fn fetch_events(&self, league_id: &str, target_date: NaiveDate) -> ProviderResult<EventsdayResponse> {
        let url = format!(
            "{}/{}/eventsday.php?d={}&l={}",
            self.base_url,
            self.api_key,
            target_date.format("%Y-%m-%d"),
            league_id
        );
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                provider: self.name().to_string(),
                retry_after_secs: 5,
            });
        }
        if !response.status().is_success() {
            return Err(ProviderError::ParseError {
                provider: self.name().to_string(),
                message: format!("unexpected status {}", response.status()),
            });
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
struct EventsdayResponse {
    events: Option<Vec<TsdbEvent>>,
}

#[derive(Debug, Deserialize)]
struct TsdbEvent {
    #[serde(rename = "idEvent")]
    id: String,
    #[serde(rename = "strEvent")]
    name: String,
    #[serde(rename = "strTimestamp")]
    timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

#[async_trait]
impl SportsDataProvider for TheSportsDbProvider {
    fn name(&self) -> &str {
        "thesportsdb"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn supports_league(&self, league: &str) -> bool {
        self.leagues.iter().any(|l| l.eq_ignore_ascii_case(league))
    }

    async fn get_events(&self, league: &str, target_date: NaiveDate) -> ProviderResult<Vec<Event>> {
        let body = self
            .limiter
            .run_with_backoff(self.name(), || self.fetch_events(league, target_date))
            .await?;

        Ok(body
            .events
            .unwrap_or_default()
            .into_iter()
            .filter_map(|e| {
                let start_time = e.timestamp?;
                Some(Event {
                    id: e.id,
                    provider: "thesportsdb".to_string(),
                    short_name: e.name.clone(),
                    name: e.name,
                    start_time,
                    home_team: empty_team(league),
                    away_team: empty_team(league),
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

fn empty_team(league: &str) -> Team {
    Team {
        id: String::new(),
        provider: "thesportsdb".to_string(),
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

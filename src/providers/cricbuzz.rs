//! Cricbuzz provider for cricket fixtures, grounded on `teamarr/providers`'s
//! shared `SportsDataProvider` contract. Cricket matches don't carry a
//! home/away team distinction the way league sports do (spec.md §6 notes
//! Cricbuzz feeds are consumed primarily for match schedule/status, not team
//! rosters), so `get_team`/`get_team_stats` are unsupported here and always
//! return `None` — TheSportsDB or ESPN cover team metadata where needed.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::SportsDataProvider;
use crate::errors::{ProviderError, ProviderResult};
use crate::models::{Event, EventState, EventStatus, Team, TeamStats};

pub struct CricbuzzProvider {
    client: Client,
    base_url: String,
    priority: i32,
}

impl CricbuzzProvider {
    pub fn new(base_url: impl Into<String>, priority: i32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent("teamarr/0.1")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            priority,
        }
    }

    fn schedule_url(&self, target_date: NaiveDate) -> String {
        format!("{}/matches/v1/date/{}", self.base_url, target_date.format("%-d/%-m/%Y"))
    }
}

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    #[serde(rename = "matchTypeMatches")]
    match_type_matches: Vec<MatchTypeGroup>,
}

#[derive(Debug, Deserialize)]
struct MatchTypeGroup {
    #[serde(rename = "seriesMatches")]
    series_matches: Vec<SeriesMatches>,
}

#[derive(Debug, Deserialize)]
struct SeriesMatches {
    #[serde(rename = "seriesAdWrapper")]
    series: Option<SeriesWrapper>,
}

#[derive(Debug, Deserialize)]
struct SeriesWrapper {
    #[serde(default)]
    matches: Vec<CricbuzzMatch>,
}

#[derive(Debug, Deserialize)]
struct CricbuzzMatch {
    #[serde(rename = "matchInfo")]
    match_info: CricbuzzMatchInfo,
}

#[derive(Debug, Deserialize)]
struct CricbuzzMatchInfo {
    #[serde(rename = "matchId")]
    match_id: i64,
    #[serde(rename = "matchDesc")]
    match_desc: String,
    #[serde(rename = "startDate")]
    start_date: String,
    state: Option<String>,
    team1: CricbuzzTeam,
    team2: CricbuzzTeam,
}

#[derive(Debug, Deserialize)]
struct CricbuzzTeam {
    #[serde(rename = "teamName")]
    team_name: String,
    #[serde(rename = "teamSName")]
    team_short_name: String,
}

#[async_trait]
impl SportsDataProvider for CricbuzzProvider {
    fn name(&self) -> &str {
        "cricbuzz"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn supports_league(&self, league: &str) -> bool {
        league.eq_ignore_ascii_case("cricket")
    }

    async fn get_events(&self, league: &str, target_date: NaiveDate) -> ProviderResult<Vec<Event>> {
        let url = self.schedule_url(target_date);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited {
                provider: self.name().to_string(),
                retry_after_secs: 30,
            });
        }
        if !response.status().is_success() {
            return Ok(Vec::new());
        }

        let body: ScheduleResponse = response.json().await?;

        Ok(body
            .match_type_matches
            .into_iter()
            .flat_map(|group| group.series_matches)
            .filter_map(|sm| sm.series)
            .flat_map(|series| series.matches)
            .filter_map(|m| to_event(m.match_info, league))
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

fn to_event(info: CricbuzzMatchInfo, league: &str) -> Option<Event> {
    let millis: i64 = info.start_date.parse().ok()?;
    let start_time = chrono::DateTime::from_timestamp_millis(millis)?;

    let state = match info.state.as_deref() {
        Some("Complete") => EventState::Final,
        Some("In Progress") | Some("Toss") => EventState::Live,
        Some("Preview") => EventState::Scheduled,
        _ => EventState::Scheduled,
    };

    Some(Event {
        id: info.match_id.to_string(),
        provider: "cricbuzz".to_string(),
        name: info.match_desc.clone(),
        short_name: info.match_desc,
        start_time,
        home_team: to_team(&info.team1, league),
        away_team: to_team(&info.team2, league),
        status: EventStatus {
            state,
            detail: info.state,
            period: None,
            clock: None,
        },
        league: league.to_string(),
        sport: "cricket".to_string(),
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
}

fn to_team(team: &CricbuzzTeam, league: &str) -> Team {
    Team {
        id: team.team_short_name.clone(),
        provider: "cricbuzz".to_string(),
        name: team.team_name.clone(),
        short_name: team.team_short_name.clone(),
        abbreviation: team.team_short_name.clone(),
        league: league.to_string(),
        sport: "cricket".to_string(),
        logo_url: None,
        color: None,
        record_summary: None,
    }
}

//! External sports-data provider clients and the service layer that routes
//! requests to them with caching and priority fallback.
//!
//! Grounded on `teamarr/services/sports_data.py` (the `SportsDataService`
//! routing/caching contract) and `teamarr/providers/__init__.py`'s registry
//! pattern (implied by `ProviderRegistry.get_all()` / `.initialize()`).
//! spec.md §6 specifies these as external collaborators with only their
//! interface in scope; this module implements that interface plus the
//! TTL-caching/registry layer the distillation dropped (SPEC_FULL.md §11).

pub mod cricbuzz;
pub mod espn;
pub mod rate_limit;
pub mod thesportsdb;

use async_trait::async_trait;
use chrono::NaiveDate;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderResult;
use crate::models::{Event, Team, TeamStats};

const CACHE_TTL_SCHEDULE: Duration = Duration::from_secs(8 * 3600);
const CACHE_TTL_SINGLE_EVENT: Duration = Duration::from_secs(30 * 60);
const CACHE_TTL_TEAM_INFO: Duration = Duration::from_secs(24 * 3600);
const CACHE_TTL_TEAM_STATS: Duration = Duration::from_secs(4 * 3600);

/// A single sports-data backend. Each provider declares which leagues it
/// can answer for; the service tries providers in priority order and
/// falls through to the next on an empty/`None` result.
#[async_trait]
pub trait SportsDataProvider: Send + Sync {
    fn name(&self) -> &str;
    fn priority(&self) -> i32;
    fn supports_league(&self, league: &str) -> bool;

    async fn get_events(&self, league: &str, target_date: NaiveDate) -> ProviderResult<Vec<Event>>;
    async fn get_team_schedule(
        &self,
        team_id: &str,
        league: &str,
        days_ahead: u32,
    ) -> ProviderResult<Vec<Event>>;
    async fn get_team(&self, team_id: &str, league: &str) -> ProviderResult<Option<Team>>;
    async fn get_event(&self, event_id: &str, league: &str) -> ProviderResult<Option<Event>>;
    async fn get_team_stats(&self, team_id: &str, league: &str) -> ProviderResult<Option<TeamStats>>;
}

/// Registers the configured providers, sorted once by descending priority
/// (higher priority tried first — mirrors the teacher's registration-order
/// semantics, made explicit instead of implicit).
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn SportsDataProvider>>,
}

impl ProviderRegistry {
    pub fn new(mut providers: Vec<Arc<dyn SportsDataProvider>>) -> Self {
        providers.sort_by_key(|p| std::cmp::Reverse(p.priority()));
        Self { providers }
    }

    pub fn providers(&self) -> &[Arc<dyn SportsDataProvider>] {
        &self.providers
    }
}

/// Unified, cached entry point consumers use instead of talking to
/// providers directly.
pub struct SportsDataService {
    registry: ProviderRegistry,
    events_cache: Cache<String, Arc<Vec<Event>>>,
    team_cache: Cache<String, Arc<Team>>,
    event_cache: Cache<String, Arc<Event>>,
    stats_cache: Cache<String, Arc<TeamStats>>,
}

impl SportsDataService {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            events_cache: Cache::builder().time_to_live(CACHE_TTL_SCHEDULE).build(),
            team_cache: Cache::builder().time_to_live(CACHE_TTL_TEAM_INFO).build(),
            event_cache: Cache::builder().time_to_live(CACHE_TTL_SINGLE_EVENT).build(),
            stats_cache: Cache::builder().time_to_live(CACHE_TTL_TEAM_STATS).build(),
        }
    }

    pub async fn get_events(&self, league: &str, target_date: NaiveDate) -> Vec<Event> {
        let key = format!("events:{league}:{target_date}");
        if let Some(cached) = self.events_cache.get(&key).await {
            return (*cached).clone();
        }

        for provider in self.registry.providers() {
            if !provider.supports_league(league) {
                continue;
            }
            if let Ok(events) = provider.get_events(league, target_date).await {
                if !events.is_empty() {
                    self.events_cache.insert(key, Arc::new(events.clone())).await;
                    return events;
                }
            }
        }
        Vec::new()
    }

    pub async fn get_team_schedule(&self, team_id: &str, league: &str, days_ahead: u32) -> Vec<Event> {
        for provider in self.registry.providers() {
            if !provider.supports_league(league) {
                continue;
            }
            if let Ok(events) = provider.get_team_schedule(team_id, league, days_ahead).await {
                if !events.is_empty() {
                    return events;
                }
            }
        }
        Vec::new()
    }

    pub async fn get_team(&self, team_id: &str, league: &str) -> Option<Team> {
        let key = format!("team:{league}:{team_id}");
        if let Some(cached) = self.team_cache.get(&key).await {
            return Some((*cached).clone());
        }
        for provider in self.registry.providers() {
            if !provider.supports_league(league) {
                continue;
            }
            if let Ok(Some(team)) = provider.get_team(team_id, league).await {
                self.team_cache.insert(key, Arc::new(team.clone())).await;
                return Some(team);
            }
        }
        None
    }

    pub async fn get_event(&self, event_id: &str, league: &str) -> Option<Event> {
        let key = format!("event:{league}:{event_id}");
        if let Some(cached) = self.event_cache.get(&key).await {
            return Some((*cached).clone());
        }
        for provider in self.registry.providers() {
            if !provider.supports_league(league) {
                continue;
            }
            if let Ok(Some(event)) = provider.get_event(event_id, league).await {
                self.event_cache.insert(key, Arc::new(event.clone())).await;
                return Some(event);
            }
        }
        None
    }

    pub async fn get_team_stats(&self, team_id: &str, league: &str) -> Option<TeamStats> {
        let key = format!("stats:{league}:{team_id}");
        if let Some(cached) = self.stats_cache.get(&key).await {
            return Some((*cached).clone());
        }
        for provider in self.registry.providers() {
            if !provider.supports_league(league) {
                continue;
            }
            if let Ok(Some(stats)) = provider.get_team_stats(team_id, league).await {
                self.stats_cache.insert(key, Arc::new(stats.clone())).await;
                return Some(stats);
            }
        }
        None
    }

    pub async fn invalidate_team(&self, team_id: &str, league: &str) {
        self.team_cache.invalidate(&format!("team:{league}:{team_id}")).await;
        self.stats_cache.invalidate(&format!("stats:{league}:{team_id}")).await;
    }

    pub async fn clear_cache(&self) {
        self.events_cache.invalidate_all();
        self.team_cache.invalidate_all();
        self.event_cache.invalidate_all();
        self.stats_cache.invalidate_all();
    }
}

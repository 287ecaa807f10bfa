//! Matches a classified `EVENT_CARD` stream (combat-sports cards, award
//! shows, etc.) against provider events by event-name similarity rather
//! than team names.
//!
//! Grounded on `teamarr/consumers/matching/event_matcher.py`'s three-tier
//! ladder: an exact event-number match ("UFC 315" == "UFC 315") beats a
//! keyword-overlap match, which beats falling back to a fighter's last name
//! appearing in the stream's leftover text.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use std::sync::Arc;
use uuid::Uuid;

use super::result::{FailedReason, MatchMethod, MatchOutcome};
use crate::cache::{event_to_cache_data, StreamMatchCache};
use crate::errors::MatchResult;
use crate::models::event::Event;
use crate::models::stream::{ClassifiedStream, Stream};
use crate::providers::SportsDataService;

pub struct EventCardContext {
    pub group_id: Uuid,
    pub stream: Stream,
    pub classified: ClassifiedStream,
    pub generation: i64,
    pub now: DateTime<Utc>,
}

pub struct EventCardMatcher {
    sports: Arc<SportsDataService>,
    cache: Arc<StreamMatchCache>,
}

impl EventCardMatcher {
    pub fn new(sports: Arc<SportsDataService>, cache: Arc<StreamMatchCache>) -> Self {
        Self { sports, cache }
    }

    pub async fn match_event(&self, ctx: &EventCardContext, league: &str) -> MatchResult<MatchOutcome> {
        let target_date = ctx
            .classified
            .normalized
            .date_hint
            .unwrap_or_else(|| ctx.now.date_naive());

        if let Some(cached) = self.check_cache(ctx, target_date).await? {
            return Ok(cached);
        }

        let Some(hint) = ctx.classified.event_hint.as_deref() else {
            return Ok(MatchOutcome::failed(FailedReason::NoEventCardMatch, None));
        };

        let events = self.fetch_candidate_events(league, target_date).await;
        if events.is_empty() {
            return Ok(MatchOutcome::failed(FailedReason::NoEventOnDate, None));
        }

        if let Some(event) = match_event_number(hint, &events) {
            self.cache_result(ctx, &event).await?;
            return Ok(MatchOutcome::matched(
                event,
                MatchMethod::Keyword,
                MatchMethod::Keyword,
                100.0,
                league.to_string(),
                ctx.classified.card_segment,
            ));
        }

        if let Some(event) = match_keyword_overlap(hint, &events) {
            let confidence = if events.len() == 1 { 90.0 } else { 75.0 };
            self.cache_result(ctx, &event).await?;
            return Ok(MatchOutcome::matched(
                event,
                MatchMethod::Fuzzy,
                MatchMethod::Fuzzy,
                confidence,
                league.to_string(),
                ctx.classified.card_segment,
            ));
        }

        if let Some(event) = match_fighter_surname(&ctx.classified.normalized.cleaned, &events) {
            self.cache_result(ctx, &event).await?;
            return Ok(MatchOutcome::matched(
                event,
                MatchMethod::Fuzzy,
                MatchMethod::Fuzzy,
                75.0,
                league.to_string(),
                ctx.classified.card_segment,
            ));
        }

        Ok(MatchOutcome::failed(FailedReason::NoEventCardMatch, None))
    }

    /// Fetches `target_date`'s schedule plus `target_date - 1`'s, since a
    /// card starting late local time can carry a UTC date one day behind
    /// the date the stream name hints at (spec.md §4.3 step 2, shared with
    /// the team matcher).
    async fn fetch_candidate_events(&self, league: &str, target_date: NaiveDate) -> Vec<Event> {
        let mut events = self.sports.get_events(league, target_date).await;
        let prior = self.sports.get_events(league, target_date - Duration::days(1)).await;
        events.extend(prior);
        events
    }

    async fn check_cache(&self, ctx: &EventCardContext, target_date: NaiveDate) -> MatchResult<Option<MatchOutcome>> {
        let cached = self
            .cache
            .get(ctx.group_id, ctx.stream.id, &ctx.stream.name, false)
            .await?;
        let Some(entry) = cached else { return Ok(None) };
        let Some(data) = entry.cached_data else { return Ok(None) };
        let Ok(event) = serde_json::from_value::<Event>(data) else {
            return Ok(None);
        };

        // A cached card whose event rolled into a day before the stream's
        // target date may have finished since it was cached.
        if event.start_time.date_naive() < target_date {
            return Ok(None);
        }

        self.cache
            .touch(ctx.group_id, ctx.stream.id, &ctx.stream.name, ctx.generation)
            .await?;

        let method = if entry.user_corrected {
            MatchMethod::UserCorrected
        } else {
            MatchMethod::Cache
        };

        Ok(Some(MatchOutcome::matched(
            event,
            method,
            MatchMethod::Fuzzy,
            100.0,
            entry.league,
            ctx.classified.card_segment,
        )))
    }

    async fn cache_result(&self, ctx: &EventCardContext, event: &Event) -> MatchResult<()> {
        let cached_data = event_to_cache_data(event)?;
        self.cache
            .set(
                ctx.group_id,
                ctx.stream.id,
                &ctx.stream.name,
                &event.id,
                &event.league,
                cached_data,
                ctx.generation,
                "fuzzy",
            )
            .await?;
        Ok(())
    }
}

/// Extracts `(promotion, number)` from text like "UFC 315" and compares
/// against the same extraction on each event's name.
fn event_number(text: &str) -> Option<(String, String)> {
    let re = Regex::new(r"(?i)\b([a-z]+)\s*0*(\d+)\b").ok()?;
    let caps = re.captures(text)?;
    Some((caps[1].to_lowercase(), caps[2].to_string()))
}

fn match_event_number(hint: &str, events: &[Event]) -> Option<Event> {
    let (promotion, number) = event_number(hint)?;
    events
        .iter()
        .find(|e| event_number(&e.name).is_some_and(|(p, n)| p == promotion && n == number))
        .cloned()
}

/// Overlap of whitespace-split lowercase tokens between the hint and an
/// event's name, requiring at least two shared tokens to avoid matching on
/// the promotion name alone.
fn match_keyword_overlap(hint: &str, events: &[Event]) -> Option<Event> {
    let hint_tokens: std::collections::HashSet<String> =
        hint.to_lowercase().split_whitespace().map(str::to_string).collect();

    events
        .iter()
        .filter_map(|e| {
            let name_tokens: std::collections::HashSet<String> =
                e.name.to_lowercase().split_whitespace().map(str::to_string).collect();
            let overlap = hint_tokens.intersection(&name_tokens).count();
            (overlap >= 2).then_some((e, overlap))
        })
        .max_by_key(|(_, overlap)| *overlap)
        .map(|(e, _)| e.clone())
}

/// Last resort: a fighter's surname from either bout slot appears verbatim
/// in the stream's cleaned text.
fn match_fighter_surname(cleaned: &str, events: &[Event]) -> Option<Event> {
    let lower = cleaned.to_lowercase();
    events
        .iter()
        .find(|e| {
            e.bouts.iter().any(|bout| {
                surname(&bout.fighter1).is_some_and(|s| lower.contains(&s)) || surname(&bout.fighter2).is_some_and(|s| lower.contains(&s))
            })
        })
        .cloned()
}

/// Surnames shorter than 4 characters ("Li", "Ng") are rejected: they're
/// common enough as substrings of unrelated stream text to produce false
/// positives in `match_fighter_surname`'s verbatim-contains check.
fn surname(full_name: &str) -> Option<String> {
    full_name
        .split_whitespace()
        .last()
        .map(|s| s.to_lowercase())
        .filter(|s| s.chars().count() >= 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{Bout, EventState, EventStatus, Segment, Team};

    fn blank_team() -> Team {
        Team {
            id: String::new(),
            provider: "espn".to_string(),
            name: String::new(),
            short_name: String::new(),
            abbreviation: String::new(),
            league: "MMA".to_string(),
            sport: "mma".to_string(),
            logo_url: None,
            color: None,
            record_summary: None,
        }
    }

    fn sample_event(name: &str) -> Event {
        Event {
            id: "1".to_string(),
            provider: "espn".to_string(),
            name: name.to_string(),
            short_name: name.to_string(),
            start_time: Utc::now(),
            home_team: blank_team(),
            away_team: blank_team(),
            status: EventStatus {
                state: EventState::Scheduled,
                detail: None,
                period: None,
                clock: None,
            },
            league: "MMA".to_string(),
            sport: "mma".to_string(),
            home_score: None,
            away_score: None,
            venue: None,
            broadcasts: Vec::new(),
            season_year: None,
            season_type: None,
            odds_data: None,
            main_card_start: None,
            segment_times: Default::default(),
            bouts: vec![Bout {
                fighter1: "Islam Makhachev".to_string(),
                fighter2: "Arman Tsarukyan".to_string(),
                segment: Segment::MainCard,
                order: 0,
            }],
            fight_result_method: None,
            finish_round: None,
            finish_time: None,
            weight_class: None,
            fighter1_scores: None,
            fighter2_scores: None,
        }
    }

    #[test]
    fn matches_on_exact_event_number() {
        let events = vec![sample_event("UFC 315: Makhachev vs Tsarukyan")];
        let found = match_event_number("UFC 315", &events);
        assert!(found.is_some());
    }

    #[test]
    fn falls_back_to_fighter_surname() {
        let events = vec![sample_event("UFC Fight Night")];
        let found = match_fighter_surname("makhachev vs tsarukyan main card", &events);
        assert!(found.is_some());
    }

    #[test]
    fn short_surnames_are_rejected() {
        assert_eq!(surname("Dan Ng"), None);
        assert_eq!(surname("Islam Makhachev"), Some("makhachev".to_string()));
    }

    #[test]
    fn no_match_without_any_signal() {
        let events = vec![sample_event("UFC Fight Night")];
        assert!(match_event_number("Random Channel", &events).is_none());
        assert!(match_keyword_overlap("Random Channel", &events).is_none());
    }
}

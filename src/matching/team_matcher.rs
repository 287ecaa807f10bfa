//! Matches a classified `TEAM_VS_TEAM` stream against provider events by
//! fuzzy-comparing the parsed team names against each candidate event's
//! home/away teams.
//!
//! Grounded on `teamarr/consumers/matching/team_matcher.py`: the cache
//! short-circuit, the single-vs-multi-league entry points, and the
//! time-based disambiguation tie-break all mirror that module's structure,
//! adapted to the `SportsDataService`/`StreamMatchCache` facades built in
//! SPEC_FULL.md §5/§11.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::fuzzy::{self, DEFAULT_FUZZY_THRESHOLD};
use super::result::{FailedReason, FilteredReason, MatchMethod, MatchOutcome};
use crate::cache::{event_to_cache_data, StreamMatchCache};
use crate::errors::MatchResult;
use crate::models::event::Event;
use crate::models::stream::{ClassifiedStream, Stream};
use crate::providers::SportsDataService;

/// Everything a matcher needs about the stream being matched, independent
/// of which league(s) it's being tried against.
pub struct MatchContext {
    pub group_id: Uuid,
    pub stream: Stream,
    pub classified: ClassifiedStream,
    pub generation: i64,
    pub now: DateTime<Utc>,
}

impl MatchContext {
    fn team_names(&self) -> Option<(&str, &str)> {
        Some((self.classified.team1.as_deref()?, self.classified.team2.as_deref()?))
    }

    fn target_date(&self) -> NaiveDate {
        self.classified.normalized.date_hint.unwrap_or_else(|| self.now.date_naive())
    }
}

/// One team's match against one side of an event: which tier produced the
/// hit and the resulting confidence.
#[derive(Debug, PartialEq)]
struct SideMatch {
    method: MatchMethod,
    confidence: f64,
}

/// The result of testing both teams against a single event in one
/// orientation (or the other).
#[derive(Debug, PartialEq)]
struct TeamMatchHit {
    method: MatchMethod,
    confidence: f64,
}

/// Outcome of searching every candidate event for a team-pair match.
enum TeamSearch {
    Found(Event, TeamMatchHit),
    NotFound(FailedReason),
}

pub struct TeamMatcher {
    sports: Arc<SportsDataService>,
    cache: Arc<StreamMatchCache>,
    fuzzy_threshold: f64,
}

impl TeamMatcher {
    pub fn new(sports: Arc<SportsDataService>, cache: Arc<StreamMatchCache>, fuzzy_threshold: f64) -> Self {
        Self {
            sports,
            cache,
            fuzzy_threshold: if fuzzy_threshold > 0.0 {
                fuzzy_threshold
            } else {
                DEFAULT_FUZZY_THRESHOLD
            },
        }
    }

    /// Attempts a match against a single league's schedule for the stream's
    /// date hint (or today, if the stream carried none).
    pub async fn match_single_league(&self, ctx: &MatchContext, league: &str) -> MatchResult<MatchOutcome> {
        let target_date = ctx.target_date();
        if let Some(outcome) = self.check_cache(ctx, target_date).await? {
            return Ok(outcome);
        }

        let Some((team1, team2)) = ctx.team_names() else {
            return Ok(MatchOutcome::failed(FailedReason::TeamsNotParsed, None));
        };

        let events = self.fetch_candidate_events(league, target_date).await;
        let time_hint = ctx.classified.normalized.time_hint;

        match self.search_events(&events, team1, team2, time_hint, ctx.now) {
            TeamSearch::Found(event, hit) => {
                self.cache_result(ctx, &event, hit.confidence).await?;
                Ok(MatchOutcome::matched(
                    event,
                    hit.method,
                    hit.method,
                    hit.confidence,
                    league.to_string(),
                    None,
                ))
            }
            TeamSearch::NotFound(_) if events.is_empty() => Ok(MatchOutcome::failed(FailedReason::NoEventOnDate, None)),
            TeamSearch::NotFound(reason) => Ok(MatchOutcome::failed(reason, None)),
        }
    }

    /// Tries every league in turn, returning the first match. Used for
    /// groups configured with more than one league (spec.md §4.3). A
    /// `league_hint` extracted from the stream name narrows the search to
    /// that single league, or filters the stream out entirely when the hint
    /// names a league the group doesn't enable.
    pub async fn match_multi_league(&self, ctx: &MatchContext, leagues: &[String]) -> MatchResult<MatchOutcome> {
        let target_date = ctx.target_date();
        if let Some(outcome) = self.check_cache(ctx, target_date).await? {
            return Ok(outcome);
        }

        let Some((team1, team2)) = ctx.team_names() else {
            return Ok(MatchOutcome::failed(FailedReason::TeamsNotParsed, None));
        };

        let search_leagues: Vec<String> = match &ctx.classified.normalized.league_hint {
            Some(hint) => match leagues.iter().find(|l| l.eq_ignore_ascii_case(hint)) {
                Some(found) => vec![found.clone()],
                None => return Ok(MatchOutcome::filtered(FilteredReason::LeagueNotEnabled, hint.clone())),
            },
            None => leagues.to_vec(),
        };

        let time_hint = ctx.classified.normalized.time_hint;
        let mut any_events = false;
        let mut fallback_reason = FailedReason::Team1NotFound;

        for league in &search_leagues {
            let events = self.fetch_candidate_events(league, target_date).await;
            if !events.is_empty() {
                any_events = true;
            }
            match self.search_events(&events, team1, team2, time_hint, ctx.now) {
                TeamSearch::Found(event, hit) => {
                    self.cache_result(ctx, &event, hit.confidence).await?;
                    return Ok(MatchOutcome::matched(
                        event,
                        hit.method,
                        hit.method,
                        hit.confidence,
                        league.clone(),
                        None,
                    ));
                }
                TeamSearch::NotFound(FailedReason::Team2NotFound) => {
                    fallback_reason = FailedReason::Team2NotFound;
                }
                TeamSearch::NotFound(_) => {}
            }
        }

        if any_events {
            Ok(MatchOutcome::failed(fallback_reason, None))
        } else {
            Ok(MatchOutcome::failed(FailedReason::NoEventOnDate, None))
        }
    }

    /// Fetches `target_date`'s schedule plus `target_date - 1`'s, since a
    /// game starting late local time can carry a UTC date one day behind
    /// (or ahead of) the date the stream name hints at (spec.md §4.3 step
    /// 2).
    async fn fetch_candidate_events(&self, league: &str, target_date: NaiveDate) -> Vec<Event> {
        let mut events = self.sports.get_events(league, target_date).await;
        let prior = self.sports.get_events(league, target_date - Duration::days(1)).await;
        events.extend(prior);
        events
    }

    async fn check_cache(&self, ctx: &MatchContext, target_date: NaiveDate) -> MatchResult<Option<MatchOutcome>> {
        let cached = self
            .cache
            .get(ctx.group_id, ctx.stream.id, &ctx.stream.name, false)
            .await?;

        let Some(entry) = cached else { return Ok(None) };
        let Some(data) = entry.cached_data else { return Ok(None) };
        let event: Event = match serde_json::from_value(data) {
            Ok(event) => event,
            Err(_) => return Ok(None),
        };

        // A cached event that rolled into a day before the stream's target
        // date may have gone final since it was cached; re-match rather
        // than trust a stale result.
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
            None,
        )))
    }

    /// Finds the best-scoring event whose home/away teams both clear the
    /// fuzzy threshold against `team1`/`team2` in either order. Ties are
    /// broken by proximity to the stream's extracted `time_hint` when
    /// present (a doubleheader's two games share a date but not a kickoff
    /// time), falling back to proximity of `now` to the event's start time
    /// otherwise. When no event matches both teams, distinguishes whether
    /// `team1` or `team2` is the one that was never found in any candidate.
    fn search_events(
        &self,
        events: &[Event],
        team1: &str,
        team2: &str,
        time_hint: Option<NaiveTime>,
        now: DateTime<Utc>,
    ) -> TeamSearch {
        let mut best: Option<(Event, TeamMatchHit)> = None;
        let mut fallback_reason = FailedReason::Team1NotFound;

        for event in events {
            match match_teams_to_event(event, team1, team2, self.fuzzy_threshold) {
                Ok(hit) => {
                    best = match best {
                        None => Some((event.clone(), hit)),
                        Some((ref current, ref current_hit)) if hit.confidence > current_hit.confidence => {
                            Some((event.clone(), hit))
                        }
                        Some((ref current, ref current_hit))
                            if (hit.confidence - current_hit.confidence).abs() < f64::EPSILON =>
                        {
                            if tie_break_key(event, time_hint, now) < tie_break_key(current, time_hint, now) {
                                Some((event.clone(), hit))
                            } else {
                                best
                            }
                        }
                        other => other,
                    };
                }
                Err(FailedReason::Team2NotFound) => fallback_reason = FailedReason::Team2NotFound,
                Err(_) => {}
            }
        }

        match best {
            Some((event, hit)) => TeamSearch::Found(event, hit),
            None => TeamSearch::NotFound(fallback_reason),
        }
    }

    async fn cache_result(&self, ctx: &MatchContext, event: &Event, _confidence: f64) -> MatchResult<()> {
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

/// Tests `team1`/`team2` against `event` in both home/away orientations,
/// trying the user-alias table before the fuzzy threshold for each side
/// (spec.md §4.3 step 3). Returns which side never matched either slot of
/// the event when neither orientation succeeds.
fn match_teams_to_event(event: &Event, team1: &str, team2: &str, threshold: f64) -> Result<TeamMatchHit, FailedReason> {
    let home_patterns = fuzzy::generate_team_patterns(&event.home_team);
    let away_patterns = fuzzy::generate_team_patterns(&event.away_team);

    if let Some(hit) = pair_hit(&home_patterns, team1, &away_patterns, team2, threshold) {
        return Ok(hit);
    }
    if let Some(hit) = pair_hit(&away_patterns, team1, &home_patterns, team2, threshold) {
        return Ok(hit);
    }

    let team1_found = side_match(&home_patterns, team1, threshold).is_some() || side_match(&away_patterns, team1, threshold).is_some();
    Err(if team1_found {
        FailedReason::Team2NotFound
    } else {
        FailedReason::Team1NotFound
    })
}

fn pair_hit(patterns_a: &[String], a: &str, patterns_b: &[String], b: &str, threshold: f64) -> Option<TeamMatchHit> {
    let side_a = side_match(patterns_a, a, threshold)?;
    let side_b = side_match(patterns_b, b, threshold)?;
    let method = if side_a.method == MatchMethod::Alias || side_b.method == MatchMethod::Alias {
        MatchMethod::Alias
    } else {
        MatchMethod::Fuzzy
    };
    let confidence = if method == MatchMethod::Alias {
        100.0
    } else {
        (side_a.confidence + side_b.confidence) / 2.0
    };
    Some(TeamMatchHit { method, confidence })
}

/// The user-alias table is tried first: a resolved alias that clears the
/// fuzzy threshold against `patterns` counts as method ALIAS, confidence
/// 100, ahead of a direct fuzzy comparison of `candidate` itself (spec.md
/// §4.3 step 3).
fn side_match(patterns: &[String], candidate: &str, threshold: f64) -> Option<SideMatch> {
    if let Some(canonical) = fuzzy::alias_lookup(candidate) {
        if fuzzy::matches_any(patterns, canonical, threshold).matched {
            return Some(SideMatch {
                method: MatchMethod::Alias,
                confidence: 100.0,
            });
        }
    }

    let direct = fuzzy::matches_any(patterns, candidate, threshold);
    direct.matched.then_some(SideMatch {
        method: MatchMethod::Fuzzy,
        confidence: direct.score,
    })
}

/// Disambiguates same-date candidates by proximity to the stream's
/// extracted kickoff-time hint ("7 PM") when present, since a doubleheader
/// can list two games on the same date; falls back to proximity of `now`
/// to the event's start time when the stream carried no time hint.
fn tie_break_key(event: &Event, time_hint: Option<NaiveTime>, now: DateTime<Utc>) -> i64 {
    match time_hint {
        Some(hint) => (event.start_time.time() - hint).num_seconds().abs(),
        None => (event.start_time - now).num_seconds().abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{EventState, EventStatus, Team};
    use chrono::TimeZone;

    fn team(name: &str, short: &str, abbrev: &str) -> Team {
        Team {
            id: name.to_string(),
            provider: "espn".to_string(),
            name: name.to_string(),
            short_name: short.to_string(),
            abbreviation: abbrev.to_string(),
            league: "NFL".to_string(),
            sport: "football".to_string(),
            logo_url: None,
            color: None,
            record_summary: None,
        }
    }

    fn sample_event_at(id: &str, hour: u32, minute: u32) -> Event {
        Event {
            id: id.to_string(),
            provider: "espn".to_string(),
            name: "Buccaneers at Lions".to_string(),
            short_name: "TB @ DET".to_string(),
            start_time: Utc.with_ymd_and_hms(2026, 3, 10, hour, minute, 0).unwrap(),
            home_team: team("Detroit Lions", "Lions", "DET"),
            away_team: team("Tampa Bay Buccaneers", "Buccaneers", "TB"),
            status: EventStatus {
                state: EventState::Scheduled,
                detail: None,
                period: None,
                clock: None,
            },
            league: "NFL".to_string(),
            sport: "football".to_string(),
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
        }
    }

    fn sample_event() -> Event {
        sample_event_at("1", 13, 0)
    }

    #[test]
    fn matches_teams_regardless_of_home_away_order() {
        let matcher_threshold = DEFAULT_FUZZY_THRESHOLD;
        let home_patterns = fuzzy::generate_team_patterns(&sample_event().home_team);
        let away_patterns = fuzzy::generate_team_patterns(&sample_event().away_team);

        assert!(fuzzy::matches_any(&home_patterns, "DET Lions", matcher_threshold).matched);
        assert!(fuzzy::matches_any(&away_patterns, "TB Buccaneers", matcher_threshold).matched);
    }

    #[test]
    fn alias_tier_resolves_nickname_to_100_confidence() {
        let niners = team("San Francisco 49ers", "49ers", "SF");
        let mut event = sample_event();
        event.home_team = niners;
        let hit = match_teams_to_event(&event, "the niners", "TB Buccaneers", DEFAULT_FUZZY_THRESHOLD).unwrap();
        assert_eq!(hit.method, MatchMethod::Alias);
        assert_eq!(hit.confidence, 100.0);
    }

    #[test]
    fn distinguishes_which_team_failed_to_match() {
        let event = sample_event();

        let team1_missing = match_teams_to_event(&event, "Seahawks", "TB Buccaneers", DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(team1_missing.err(), Some(FailedReason::Team1NotFound));

        let team2_missing = match_teams_to_event(&event, "DET Lions", "Seahawks", DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(team2_missing.err(), Some(FailedReason::Team2NotFound));
    }

    #[test]
    fn doubleheader_tie_break_uses_time_hint_not_wall_clock() {
        let afternoon = sample_event_at("afternoon", 13, 5);
        let evening = sample_event_at("evening", 19, 5);
        let seven_pm = NaiveTime::from_hms_opt(19, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();

        assert!(tie_break_key(&evening, Some(seven_pm), now) < tie_break_key(&afternoon, Some(seven_pm), now));
    }
}

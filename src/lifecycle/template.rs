//! Channel-name template rendering, grounded on
//! `teamarr/templates/variables/identity.py`'s variable set and the
//! teacher's `data_mapping::engine` substitution style (`{{var}}` tokens
//! resolved from a context map, unknown names rejected rather than left
//! verbatim).

use std::collections::HashMap;

use crate::errors::{LifecycleError, LifecycleResult};
use crate::models::event::{Event, Segment};

/// Values a template can reference. Built fresh per channel from the
/// matched event, since every field can change generation to generation
/// (a team's record, the event's live status, and so on).
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: HashMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Populates the standard identity variables from a matched event:
    /// `home_team`, `away_team`, `league`, `sport`, `date`, `time`, and
    /// `segment`. `segment` is always set, even to an empty string when the
    /// stream carries no card segment, so a template can reference it
    /// unconditionally without tripping `render`'s unknown-variable error.
    pub fn from_event(event: &Event, segment: Option<Segment>) -> Self {
        let mut ctx = Self::new();
        ctx.set("home_team", &event.home_team.name)
            .set("away_team", &event.away_team.name)
            .set("home_abbrev", &event.home_team.abbreviation)
            .set("away_abbrev", &event.away_team.abbreviation)
            .set("league", &event.league)
            .set("sport", &event.sport)
            .set("event_name", &event.name)
            .set("date", event.start_time.format("%Y-%m-%d").to_string())
            .set("time", event.start_time.format("%H:%M").to_string())
            .set("segment", segment.map(|s| s.display_name().to_string()).unwrap_or_default());
        ctx
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Replaces every `{{name}}` token in `template` with its value from
/// `ctx`. A name with no entry in `ctx` is a configuration error, not a
/// silent blank — a channel-naming template that references a variable
/// the context never set is a template bug, not a missing-data case.
pub fn render(template: &str, ctx: &TemplateContext) -> LifecycleResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            out.push_str("{{");
            rest = after_open;
            continue;
        };

        let name = after_open[..end].trim();
        let value = ctx.get(name).ok_or_else(|| LifecycleError::UnknownVariable {
            name: name.to_string(),
        })?;
        out.push_str(value);
        rest = &after_open[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_variables() {
        let mut ctx = TemplateContext::new();
        ctx.set("home_team", "Lions").set("away_team", "Buccaneers");
        let rendered = render("{{away_team}} @ {{home_team}}", &ctx).unwrap();
        assert_eq!(rendered, "Buccaneers @ Lions");
    }

    #[test]
    fn unknown_variable_is_an_error() {
        let ctx = TemplateContext::new();
        let err = render("{{nonexistent}}", &ctx);
        assert!(err.is_err());
    }

    #[test]
    fn leaves_plain_text_untouched() {
        let ctx = TemplateContext::new();
        assert_eq!(render("no variables here", &ctx).unwrap(), "no variables here");
    }
}

//! Repository for `event_epg_groups`. Config fields are stored as JSON
//! blobs in the entity and reassembled into `crate::models::EventEpgGroup`
//! here, grounded on `teamarr/database/groups.py`.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::entities::event_epg_group::{self, Column};
use crate::database::entities::prelude::EventEpgGroupEntity;
use crate::errors::{TeamarrError, TeamarrResult};
use crate::models::{
    ChannelAssignmentMode, ChannelNumberingMode, ChannelSortOrder, CreateTiming, DeleteTiming,
    DuplicateEventMode, EventEpgGroup, ExceptionKeyword, OverlapHandling,
};

#[derive(Clone)]
pub struct GroupRepository {
    connection: Arc<DatabaseConnection>,
}

impl GroupRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn get(&self, id: Uuid) -> TeamarrResult<Option<EventEpgGroup>> {
        let model = EventEpgGroupEntity::find_by_id(id).one(&*self.connection).await?;
        model.map(to_domain).transpose()
    }

    pub async fn all_enabled(&self) -> TeamarrResult<Vec<EventEpgGroup>> {
        let models = EventEpgGroupEntity::find()
            .filter(Column::Enabled.eq(true))
            .order_by_asc(Column::OrderIndex)
            .all(&*self.connection)
            .await?;
        models.into_iter().map(to_domain).collect()
    }

    /// Groups disabled since the last run, so the driver can retire
    /// channels they left behind (spec.md §4.7's disabled-group cleanup
    /// pass) even though `all_enabled` no longer sees them.
    pub async fn all_disabled(&self) -> TeamarrResult<Vec<EventEpgGroup>> {
        let models = EventEpgGroupEntity::find()
            .filter(Column::Enabled.eq(false))
            .order_by_asc(Column::OrderIndex)
            .all(&*self.connection)
            .await?;
        models.into_iter().map(to_domain).collect()
    }

    /// Children of `parent_id`, used to assemble a group's multi-league
    /// forest for ordering (spec.md §4.6).
    pub async fn children_of(&self, parent_id: Uuid) -> TeamarrResult<Vec<EventEpgGroup>> {
        let models = EventEpgGroupEntity::find()
            .filter(Column::ParentGroupId.eq(parent_id))
            .order_by_asc(Column::OrderIndex)
            .all(&*self.connection)
            .await?;
        models.into_iter().map(to_domain).collect()
    }

    pub async fn set_total_stream_count(&self, id: Uuid, count: u32) -> TeamarrResult<()> {
        if let Some(model) = EventEpgGroupEntity::find_by_id(id).one(&*self.connection).await? {
            let mut active: event_epg_group::ActiveModel = model.into();
            active.total_stream_count = Set(count as i32);
            active.update(&*self.connection).await?;
        }
        Ok(())
    }
}

fn from_json<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> TeamarrResult<T> {
    serde_json::from_value(value).map_err(|e| TeamarrError::internal(e.to_string()))
}

fn to_domain(m: event_epg_group::Model) -> TeamarrResult<EventEpgGroup> {
    let leagues: Vec<String> = from_json(m.leagues)?;
    let include_leagues: Vec<String> = from_json(m.include_leagues)?;
    let include_regex: Vec<String> = from_json(m.include_regex)?;
    let exclude_regex: Vec<String> = from_json(m.exclude_regex)?;
    let team_include: Vec<String> = from_json(m.team_include)?;
    let team_exclude: Vec<String> = from_json(m.team_exclude)?;
    let exception_keywords: Vec<ExceptionKeyword> = from_json(m.exception_keywords)?;

    Ok(EventEpgGroup {
        id: m.id,
        name: m.name,
        leagues,
        template_id: m.template_id,
        duplicate_event_mode: parse_duplicate_event_mode(&m.duplicate_event_mode)?,
        overlap_handling: parse_overlap_handling(&m.overlap_handling)?,
        channel_start_number: m.channel_start_number.map(|n| n as u32),
        assignment_mode: parse_assignment_mode(&m.assignment_mode)?,
        numbering_mode: parse_numbering_mode(&m.numbering_mode)?,
        sort_order: parse_sort_order(&m.sort_order)?,
        order_index: m.order_index,
        parent_group_id: m.parent_group_id,
        include_leagues,
        include_regex,
        exclude_regex,
        team_include,
        team_exclude,
        exception_keywords,
        total_stream_count: m.total_stream_count as u32,
        create_timing: parse_create_timing(&m.create_timing)?,
        delete_timing: parse_delete_timing(&m.delete_timing)?,
        include_final_events: m.include_final_events,
        enabled: m.enabled,
    })
}

fn parse_duplicate_event_mode(s: &str) -> TeamarrResult<DuplicateEventMode> {
    Ok(match s {
        "consolidate" => DuplicateEventMode::Consolidate,
        "separate" => DuplicateEventMode::Separate,
        "ignore" => DuplicateEventMode::Ignore,
        other => return Err(TeamarrError::internal(format!("unknown duplicate_event_mode: {other}"))),
    })
}

fn parse_overlap_handling(s: &str) -> TeamarrResult<OverlapHandling> {
    Ok(match s {
        "add_stream" => OverlapHandling::AddStream,
        "add_only" => OverlapHandling::AddOnly,
        "create_all" => OverlapHandling::CreateAll,
        "skip" => OverlapHandling::Skip,
        other => return Err(TeamarrError::internal(format!("unknown overlap_handling: {other}"))),
    })
}

fn parse_assignment_mode(s: &str) -> TeamarrResult<ChannelAssignmentMode> {
    Ok(match s {
        "manual" => ChannelAssignmentMode::Manual,
        "auto" => ChannelAssignmentMode::Auto,
        other => return Err(TeamarrError::internal(format!("unknown assignment_mode: {other}"))),
    })
}

fn parse_numbering_mode(s: &str) -> TeamarrResult<ChannelNumberingMode> {
    Ok(match s {
        "strict_block" => ChannelNumberingMode::StrictBlock,
        "rational_block" => ChannelNumberingMode::RationalBlock,
        "strict_compact" => ChannelNumberingMode::StrictCompact,
        other => return Err(TeamarrError::internal(format!("unknown numbering_mode: {other}"))),
    })
}

fn parse_sort_order(s: &str) -> TeamarrResult<ChannelSortOrder> {
    Ok(match s {
        "time" => ChannelSortOrder::Time,
        "sport_time" => ChannelSortOrder::SportTime,
        "league_time" => ChannelSortOrder::LeagueTime,
        other => return Err(TeamarrError::internal(format!("unknown sort_order: {other}"))),
    })
}

fn parse_create_timing(s: &str) -> TeamarrResult<CreateTiming> {
    Ok(match s {
        "same_day" => CreateTiming::SameDay,
        "stream_available" => CreateTiming::StreamAvailable,
        "day_before" => CreateTiming::DayBefore,
        "two_days_before" => CreateTiming::TwoDaysBefore,
        "three_days_before" => CreateTiming::ThreeDaysBefore,
        "one_week_before" => CreateTiming::OneWeekBefore,
        "manual" => CreateTiming::Manual,
        other => return Err(TeamarrError::internal(format!("unknown create_timing: {other}"))),
    })
}

fn parse_delete_timing(s: &str) -> TeamarrResult<DeleteTiming> {
    Ok(match s {
        "stream_removed" => DeleteTiming::StreamRemoved,
        "same_day" => DeleteTiming::SameDay,
        "day_after" => DeleteTiming::DayAfter,
        "two_days_after" => DeleteTiming::TwoDaysAfter,
        "three_days_after" => DeleteTiming::ThreeDaysAfter,
        "one_week_after" => DeleteTiming::OneWeekAfter,
        other => return Err(TeamarrError::internal(format!("unknown delete_timing: {other}"))),
    })
}

//! Repository for the `processing_runs` / `matched_streams` /
//! `failed_matches` audit tables, grounded on spec.md §3 and
//! `teamarr/consumers/generation.py`.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::entities::channel_history::{self};
use crate::database::entities::failed_match::{self};
use crate::database::entities::matched_stream::{self};
use crate::database::entities::processing_run::{self, Column as RunColumn};
use crate::database::entities::prelude::{
    ChannelHistoryEntity, FailedMatchEntity, MatchedStreamEntity, ProcessingRunEntity,
};
use crate::errors::{TeamarrError, TeamarrResult};
use crate::models::{ChannelHistoryEntry, FailedMatch, MatchedStream, ProcessingRun, RunStatus};

#[derive(Clone)]
pub struct AuditRepository {
    connection: Arc<DatabaseConnection>,
}

impl AuditRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn start_run(&self, run: ProcessingRun) -> TeamarrResult<()> {
        let errors = serde_json::to_value(&run.errors).map_err(|e| TeamarrError::internal(e.to_string()))?;
        let active = processing_run::ActiveModel {
            id: Set(run.id),
            generation: Set(run.generation),
            started_at: Set(run.started_at),
            finished_at: Set(run.finished_at),
            status: Set(status_str(run.status).to_string()),
            errors: Set(errors),
        };
        active.insert(&*self.connection).await?;
        Ok(())
    }

    pub async fn finish_run(
        &self,
        run_id: Uuid,
        status: RunStatus,
        errors: Vec<String>,
        finished_at: chrono::DateTime<chrono::Utc>,
    ) -> TeamarrResult<()> {
        if let Some(model) = ProcessingRunEntity::find_by_id(run_id).one(&*self.connection).await? {
            let mut active: processing_run::ActiveModel = model.into();
            active.status = Set(status_str(status).to_string());
            active.finished_at = Set(Some(finished_at));
            active.errors = Set(serde_json::to_value(&errors).map_err(|e| TeamarrError::internal(e.to_string()))?);
            active.update(&*self.connection).await?;
        }
        Ok(())
    }

    pub async fn recent_runs(&self, limit: u64) -> TeamarrResult<Vec<ProcessingRun>> {
        let models = ProcessingRunEntity::find()
            .order_by_desc(RunColumn::StartedAt)
            .limit(limit)
            .all(&*self.connection)
            .await?;
        models.into_iter().map(to_run).collect()
    }

    pub async fn record_match(&self, matched: MatchedStream) -> TeamarrResult<()> {
        let active = matched_stream::ActiveModel {
            id: Set(matched.id),
            run_id: Set(matched.run_id),
            group_id: Set(matched.group_id),
            stream_id: Set(matched.stream_id),
            detected_league: Set(matched.detected_league),
            parsed_team1: Set(matched.parsed_team1),
            parsed_team2: Set(matched.parsed_team2),
            match_method: Set(matched.match_method),
            confidence: Set(matched.confidence),
            event_id: Set(matched.event_id),
            included: Set(matched.included),
            exclusion_reason: Set(matched.exclusion_reason),
        };
        active.insert(&*self.connection).await?;
        Ok(())
    }

    pub async fn record_failure(&self, failed: FailedMatch) -> TeamarrResult<()> {
        let active = failed_match::ActiveModel {
            id: Set(failed.id),
            run_id: Set(failed.run_id),
            group_id: Set(failed.group_id),
            stream_id: Set(failed.stream_id),
            stream_name: Set(failed.stream_name),
            category: Set(failed.category),
            reason: Set(failed.reason),
            detail: Set(failed.detail),
        };
        active.insert(&*self.connection).await?;
        Ok(())
    }

    pub async fn matches_for_run(&self, run_id: Uuid) -> TeamarrResult<Vec<MatchedStream>> {
        use crate::database::entities::matched_stream::Column;
        let models = MatchedStreamEntity::find()
            .filter(Column::RunId.eq(run_id))
            .all(&*self.connection)
            .await?;
        Ok(models
            .into_iter()
            .map(|m| MatchedStream {
                id: m.id,
                run_id: m.run_id,
                group_id: m.group_id,
                stream_id: m.stream_id,
                detected_league: m.detected_league,
                parsed_team1: m.parsed_team1,
                parsed_team2: m.parsed_team2,
                match_method: m.match_method,
                confidence: m.confidence,
                event_id: m.event_id,
                included: m.included,
                exclusion_reason: m.exclusion_reason,
            })
            .collect())
    }

    pub async fn record_channel_history(&self, entry: ChannelHistoryEntry) -> TeamarrResult<()> {
        let active = channel_history::ActiveModel {
            id: Set(entry.id),
            channel_id: Set(entry.channel_id),
            action: Set(entry.action),
            reason: Set(entry.reason),
            recorded_at: Set(entry.recorded_at),
        };
        active.insert(&*self.connection).await?;
        Ok(())
    }

    pub async fn history_for_channel(&self, channel_id: Uuid) -> TeamarrResult<Vec<ChannelHistoryEntry>> {
        use crate::database::entities::channel_history::Column;
        let models = ChannelHistoryEntity::find()
            .filter(Column::ChannelId.eq(channel_id))
            .order_by_asc(Column::RecordedAt)
            .all(&*self.connection)
            .await?;
        Ok(models
            .into_iter()
            .map(|m| ChannelHistoryEntry {
                id: m.id,
                channel_id: m.channel_id,
                action: m.action,
                reason: m.reason,
                recorded_at: m.recorded_at,
            })
            .collect())
    }

    pub async fn failures_for_run(&self, run_id: Uuid) -> TeamarrResult<Vec<FailedMatch>> {
        use crate::database::entities::failed_match::Column;
        let models = FailedMatchEntity::find()
            .filter(Column::RunId.eq(run_id))
            .all(&*self.connection)
            .await?;
        Ok(models
            .into_iter()
            .map(|m| FailedMatch {
                id: m.id,
                run_id: m.run_id,
                group_id: m.group_id,
                stream_id: m.stream_id,
                stream_name: m.stream_name,
                category: m.category,
                reason: m.reason,
                detail: m.detail,
            })
            .collect())
    }
}

fn status_str(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Running => "running",
        RunStatus::Success => "success",
        RunStatus::Failed => "failed",
    }
}

fn to_run(m: processing_run::Model) -> TeamarrResult<ProcessingRun> {
    let errors: Vec<String> =
        serde_json::from_value(m.errors).map_err(|e| TeamarrError::internal(e.to_string()))?;
    Ok(ProcessingRun {
        id: m.id,
        generation: m.generation,
        started_at: m.started_at,
        finished_at: m.finished_at,
        status: match m.status.as_str() {
            "success" => RunStatus::Success,
            "failed" => RunStatus::Failed,
            _ => RunStatus::Running,
        },
        errors,
    })
}

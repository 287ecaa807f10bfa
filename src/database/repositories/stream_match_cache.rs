//! Repository for the `stream_match_cache` table. Grounded on
//! `teamarr/consumers/stream_match_cache.py`'s SQL access patterns,
//! translated to SeaORM.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::entities::prelude::StreamMatchCacheEntity;
use crate::database::entities::stream_match_cache::{self, Column, FAILED_MATCH_EVENT_ID};
use crate::errors::CacheResult;

#[derive(Debug, Clone)]
pub struct StreamCacheRow {
    pub fingerprint: String,
    pub group_id: Uuid,
    pub stream_id: i64,
    pub stream_name: String,
    pub event_id: String,
    pub league: String,
    pub cached_data: Option<serde_json::Value>,
    pub match_method: String,
    pub user_corrected: bool,
    pub last_seen_generation: i64,
}

impl StreamCacheRow {
    pub fn is_failed(&self) -> bool {
        self.event_id == FAILED_MATCH_EVENT_ID
    }

    fn from_model(m: stream_match_cache::Model) -> Self {
        Self {
            fingerprint: m.fingerprint,
            group_id: m.group_id,
            stream_id: m.stream_id,
            stream_name: m.stream_name,
            event_id: m.event_id,
            league: m.league,
            cached_data: m.cached_data,
            match_method: m.match_method,
            user_corrected: m.user_corrected,
            last_seen_generation: m.last_seen_generation,
        }
    }
}

#[derive(Clone)]
pub struct StreamMatchCacheRepository {
    connection: Arc<DatabaseConnection>,
}

impl StreamMatchCacheRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn get(&self, fingerprint: &str) -> CacheResult<Option<StreamCacheRow>> {
        let model = StreamMatchCacheEntity::find_by_id(fingerprint.to_string())
            .one(&*self.connection)
            .await?;
        Ok(model.map(StreamCacheRow::from_model))
    }

    pub async fn upsert(&self, row: StreamCacheRow) -> CacheResult<()> {
        let now = Utc::now();
        let active = stream_match_cache::ActiveModel {
            fingerprint: Set(row.fingerprint),
            group_id: Set(row.group_id),
            stream_id: Set(row.stream_id),
            stream_name: Set(row.stream_name),
            event_id: Set(row.event_id),
            league: Set(row.league),
            cached_data: Set(row.cached_data),
            match_method: Set(row.match_method),
            user_corrected: Set(row.user_corrected),
            last_seen_generation: Set(row.last_seen_generation),
            created_at: Set(now),
            updated_at: Set(now),
        };

        StreamMatchCacheEntity::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(Column::Fingerprint)
                    .update_columns([
                        Column::EventId,
                        Column::League,
                        Column::CachedData,
                        Column::MatchMethod,
                        Column::UserCorrected,
                        Column::LastSeenGeneration,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&*self.connection)
            .await?;
        Ok(())
    }

    pub async fn touch(&self, fingerprint: &str, generation: i64) -> CacheResult<()> {
        if let Some(model) = StreamMatchCacheEntity::find_by_id(fingerprint.to_string())
            .one(&*self.connection)
            .await?
        {
            let mut active: stream_match_cache::ActiveModel = model.into();
            active.last_seen_generation = Set(generation);
            active.updated_at = Set(Utc::now());
            active.update(&*self.connection).await?;
        }
        Ok(())
    }

    pub async fn delete(&self, fingerprint: &str) -> CacheResult<()> {
        StreamMatchCacheEntity::delete_by_id(fingerprint.to_string())
            .exec(&*self.connection)
            .await?;
        Ok(())
    }

    pub async fn clear_group(&self, group_id: Uuid) -> CacheResult<u64> {
        let res = StreamMatchCacheEntity::delete_many()
            .filter(Column::GroupId.eq(group_id))
            .exec(&*self.connection)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn clear_all(&self) -> CacheResult<u64> {
        let res = StreamMatchCacheEntity::delete_many()
            .exec(&*self.connection)
            .await?;
        Ok(res.rows_affected)
    }

    /// Delete non-user-corrected rows stale per their kind's horizon.
    pub async fn purge_stale(
        &self,
        current_generation: i64,
        success_horizon: i64,
        failure_horizon: i64,
    ) -> CacheResult<u64> {
        let success_cutoff = current_generation - success_horizon;
        let failure_cutoff = current_generation - failure_horizon;

        let res = StreamMatchCacheEntity::delete_many()
            .filter(Column::UserCorrected.eq(false))
            .filter(
                Column::EventId
                    .ne(FAILED_MATCH_EVENT_ID)
                    .and(Column::LastSeenGeneration.lt(success_cutoff))
                    .or(Column::EventId
                        .eq(FAILED_MATCH_EVENT_ID)
                        .and(Column::LastSeenGeneration.lt(failure_cutoff))),
            )
            .exec(&*self.connection)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn count(&self) -> CacheResult<u64> {
        Ok(StreamMatchCacheEntity::find().count(&*self.connection).await?)
    }
}


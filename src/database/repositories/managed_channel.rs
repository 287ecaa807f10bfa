//! Repository for `managed_channels` / `managed_channel_streams`.
//! Grounded on `teamarr/database/channels/crud.py`.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::database::entities::managed_channel::{self, Column as ChannelColumn};
use crate::database::entities::managed_channel_stream::{self, Column as StreamColumn};
use crate::database::entities::prelude::{ManagedChannelEntity, ManagedChannelStreamEntity};
use crate::errors::TeamarrResult;
use crate::models::{ManagedChannel, ManagedChannelStream, SyncStatus};

#[derive(Clone)]
pub struct ManagedChannelRepository {
    connection: Arc<DatabaseConnection>,
}

impl ManagedChannelRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    /// Every active (non-deleted) channel across all groups, used by the
    /// cross-group consolidation sweep (`enforcement::cross_group`) to find
    /// duplicates spanning more than one group.
    pub async fn find_all_active(&self) -> TeamarrResult<Vec<ManagedChannel>> {
        Ok(ManagedChannelEntity::find()
            .filter(ChannelColumn::DeletedAt.is_null())
            .order_by_asc(ChannelColumn::CreatedAt)
            .all(&*self.connection)
            .await?
            .into_iter()
            .map(to_domain)
            .collect())
    }

    /// Finds the active channel for `(group, event, keyword)` — the tuple
    /// spec.md §3's partial unique index is built on.
    pub async fn find_active(
        &self,
        group_id: Uuid,
        event_id: &str,
        event_provider: &str,
        exception_keyword: Option<&str>,
    ) -> TeamarrResult<Option<ManagedChannel>> {
        let mut query = ManagedChannelEntity::find()
            .filter(ChannelColumn::EventEpgGroupId.eq(group_id))
            .filter(ChannelColumn::EventId.eq(event_id))
            .filter(ChannelColumn::EventProvider.eq(event_provider))
            .filter(ChannelColumn::DeletedAt.is_null());

        query = match exception_keyword {
            Some(k) => query.filter(ChannelColumn::ExceptionKeyword.eq(k)),
            None => query.filter(ChannelColumn::ExceptionKeyword.is_null()),
        };

        Ok(query.one(&*self.connection).await?.map(to_domain))
    }

    pub async fn find_for_group(
        &self,
        group_id: Uuid,
        include_deleted: bool,
    ) -> TeamarrResult<Vec<ManagedChannel>> {
        let mut query =
            ManagedChannelEntity::find().filter(ChannelColumn::EventEpgGroupId.eq(group_id));
        if !include_deleted {
            query = query.filter(ChannelColumn::DeletedAt.is_null());
        }
        Ok(query
            .order_by_asc(ChannelColumn::ChannelNumber)
            .all(&*self.connection)
            .await?
            .into_iter()
            .map(to_domain)
            .collect())
    }

    pub async fn used_numbers_in_range(
        &self,
        start: u32,
        end: u32,
    ) -> TeamarrResult<Vec<u32>> {
        let rows = ManagedChannelEntity::find()
            .filter(ChannelColumn::DeletedAt.is_null())
            .filter(ChannelColumn::ChannelNumber.gte(start as i32))
            .filter(ChannelColumn::ChannelNumber.lte(end as i32))
            .all(&*self.connection)
            .await?;
        Ok(rows.into_iter().map(|r| r.channel_number as u32).collect())
    }

    pub async fn insert(&self, channel: ManagedChannel) -> TeamarrResult<ManagedChannel> {
        let active = managed_channel::ActiveModel {
            id: Set(channel.id),
            event_epg_group_id: Set(channel.event_epg_group_id),
            event_id: Set(channel.event_id),
            event_provider: Set(channel.event_provider),
            tvg_id: Set(channel.tvg_id),
            channel_name: Set(channel.channel_name),
            channel_number: Set(channel.channel_number as i32),
            exception_keyword: Set(channel.exception_keyword),
            dispatcharr_channel_id: Set(channel.dispatcharr_channel_id),
            scheduled_delete_at: Set(channel.scheduled_delete_at),
            deleted_at: Set(channel.deleted_at),
            delete_reason: Set(channel.delete_reason),
            sync_status: Set(sync_status_str(channel.sync_status).to_string()),
            created_at: Set(channel.created_at),
        };
        let model = active.insert(&*self.connection).await?;
        Ok(to_domain(model))
    }

    pub async fn mark_deleted(&self, id: Uuid, reason: &str) -> TeamarrResult<()> {
        if let Some(model) = ManagedChannelEntity::find_by_id(id).one(&*self.connection).await? {
            let mut active: managed_channel::ActiveModel = model.into();
            active.deleted_at = Set(Some(Utc::now()));
            active.delete_reason = Set(Some(reason.to_string()));
            active.update(&*self.connection).await?;
        }
        Ok(())
    }

    pub async fn renumber(&self, id: Uuid, number: u32) -> TeamarrResult<()> {
        if let Some(model) = ManagedChannelEntity::find_by_id(id).one(&*self.connection).await? {
            let mut active: managed_channel::ActiveModel = model.into();
            active.channel_number = Set(number as i32);
            active.update(&*self.connection).await?;
        }
        Ok(())
    }

    pub async fn due_for_deletion(&self, now: chrono::DateTime<Utc>) -> TeamarrResult<Vec<ManagedChannel>> {
        Ok(ManagedChannelEntity::find()
            .filter(ChannelColumn::DeletedAt.is_null())
            .filter(ChannelColumn::ScheduledDeleteAt.is_not_null())
            .filter(ChannelColumn::ScheduledDeleteAt.lte(now))
            .all(&*self.connection)
            .await?
            .into_iter()
            .map(to_domain)
            .collect())
    }

    pub async fn streams_for_channel(
        &self,
        channel_id: Uuid,
        include_removed: bool,
    ) -> TeamarrResult<Vec<ManagedChannelStream>> {
        let mut query = ManagedChannelStreamEntity::find()
            .filter(StreamColumn::ManagedChannelId.eq(channel_id));
        if !include_removed {
            query = query.filter(StreamColumn::RemovedAt.is_null());
        }
        Ok(query
            .order_by_asc(StreamColumn::Priority)
            .all(&*self.connection)
            .await?
            .into_iter()
            .map(|m| ManagedChannelStream {
                id: m.id,
                managed_channel_id: m.managed_channel_id,
                dispatcharr_stream_id: m.dispatcharr_stream_id,
                stream_name: m.stream_name,
                priority: m.priority,
                source_group_id: m.source_group_id,
                source_group_type: m.source_group_type,
                exception_keyword: m.exception_keyword,
                m3u_account_name: m.m3u_account_name,
                removed_at: m.removed_at,
            })
            .collect())
    }

    pub async fn next_stream_priority(&self, channel_id: Uuid) -> TeamarrResult<i32> {
        let max = ManagedChannelStreamEntity::find()
            .filter(StreamColumn::ManagedChannelId.eq(channel_id))
            .count(&*self.connection)
            .await?;
        Ok(max as i32)
    }

    pub async fn add_stream(&self, stream: ManagedChannelStream) -> TeamarrResult<()> {
        let active = managed_channel_stream::ActiveModel {
            id: Set(stream.id),
            managed_channel_id: Set(stream.managed_channel_id),
            dispatcharr_stream_id: Set(stream.dispatcharr_stream_id),
            stream_name: Set(stream.stream_name),
            priority: Set(stream.priority),
            source_group_id: Set(stream.source_group_id),
            source_group_type: Set(stream.source_group_type),
            exception_keyword: Set(stream.exception_keyword),
            m3u_account_name: Set(stream.m3u_account_name),
            removed_at: Set(stream.removed_at),
        };
        active.insert(&*self.connection).await?;
        Ok(())
    }

    /// Moves every non-removed stream attached to `from_channel_id` onto
    /// `to_channel_id`, for folding a consolidation loser's streams onto
    /// the surviving winner channel (spec.md §4.7 scenario S5). Returns the
    /// moved rows so the caller can re-attach them on the gateway side.
    pub async fn reassign_streams(
        &self,
        from_channel_id: Uuid,
        to_channel_id: Uuid,
    ) -> TeamarrResult<Vec<ManagedChannelStream>> {
        let rows = ManagedChannelStreamEntity::find()
            .filter(StreamColumn::ManagedChannelId.eq(from_channel_id))
            .filter(StreamColumn::RemovedAt.is_null())
            .all(&*self.connection)
            .await?;

        let mut moved = Vec::with_capacity(rows.len());
        for model in rows {
            let mut active: managed_channel_stream::ActiveModel = model.into();
            active.managed_channel_id = Set(to_channel_id);
            let updated = active.update(&*self.connection).await?;
            moved.push(ManagedChannelStream {
                id: updated.id,
                managed_channel_id: updated.managed_channel_id,
                dispatcharr_stream_id: updated.dispatcharr_stream_id,
                stream_name: updated.stream_name,
                priority: updated.priority,
                source_group_id: updated.source_group_id,
                source_group_type: updated.source_group_type,
                exception_keyword: updated.exception_keyword,
                m3u_account_name: updated.m3u_account_name,
                removed_at: updated.removed_at,
            });
        }
        Ok(moved)
    }

    pub async fn stream_exists_on_channel(
        &self,
        channel_id: Uuid,
        dispatcharr_stream_id: i64,
    ) -> TeamarrResult<bool> {
        let count = ManagedChannelStreamEntity::find()
            .filter(StreamColumn::ManagedChannelId.eq(channel_id))
            .filter(StreamColumn::DispatcharrStreamId.eq(dispatcharr_stream_id))
            .filter(StreamColumn::RemovedAt.is_null())
            .count(&*self.connection)
            .await?;
        Ok(count > 0)
    }
}

fn sync_status_str(status: SyncStatus) -> &'static str {
    match status {
        SyncStatus::Pending => "pending",
        SyncStatus::Synced => "synced",
        SyncStatus::Failed => "failed",
    }
}

fn to_domain(m: managed_channel::Model) -> ManagedChannel {
    ManagedChannel {
        id: m.id,
        event_epg_group_id: m.event_epg_group_id,
        event_id: m.event_id,
        event_provider: m.event_provider,
        tvg_id: m.tvg_id,
        channel_name: m.channel_name,
        channel_number: m.channel_number as u32,
        exception_keyword: m.exception_keyword,
        dispatcharr_channel_id: m.dispatcharr_channel_id,
        scheduled_delete_at: m.scheduled_delete_at,
        deleted_at: m.deleted_at,
        delete_reason: m.delete_reason,
        sync_status: match m.sync_status.as_str() {
            "synced" => SyncStatus::Synced,
            "failed" => SyncStatus::Failed,
            _ => SyncStatus::Pending,
        },
        created_at: m.created_at,
    }
}

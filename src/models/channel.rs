//! `ManagedChannel` and attached-stream records, grounded on
//! `teamarr/database/channels/crud.py`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedChannel {
    pub id: Uuid,
    pub event_epg_group_id: Uuid,
    pub event_id: String,
    pub event_provider: String,
    pub tvg_id: String,
    pub channel_name: String,
    pub channel_number: u32,
    pub exception_keyword: Option<String>,
    pub dispatcharr_channel_id: Option<i64>,
    pub scheduled_delete_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub delete_reason: Option<String>,
    pub sync_status: SyncStatus,
    pub created_at: DateTime<Utc>,
}

impl ManagedChannel {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// `teamarr-event-<provider>-<event_id>`, the required tvg-id format.
    pub fn make_tvg_id(provider: &str, event_id: &str) -> String {
        format!("teamarr-event-{provider}-{event_id}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Pending,
    Synced,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagedChannelStream {
    pub id: Uuid,
    pub managed_channel_id: Uuid,
    pub dispatcharr_stream_id: i64,
    pub stream_name: String,
    pub priority: i32,
    pub source_group_id: Uuid,
    pub source_group_type: String,
    pub exception_keyword: Option<String>,
    pub m3u_account_name: Option<String>,
    pub removed_at: Option<DateTime<Utc>>,
}

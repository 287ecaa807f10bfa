//! `stream_match_cache` table, grounded on
//! `teamarr/consumers/stream_match_cache.py`'s `StreamCacheEntry`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stream_match_cache")]
pub struct Model {
    /// 16-character truncated SHA-256 of `group_id:stream_id:stream_name`.
    #[sea_orm(primary_key, auto_increment = false)]
    pub fingerprint: String,
    pub group_id: Uuid,
    pub stream_id: i64,
    pub stream_name: String,
    /// The sentinel `__FAILED__` marks a cached non-match.
    pub event_id: String,
    pub league: String,
    pub cached_data: Option<Json>,
    pub match_method: String,
    pub user_corrected: bool,
    pub last_seen_generation: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub const FAILED_MATCH_EVENT_ID: &str = "__FAILED__";

//! `managed_channels` table, grounded on spec.md §3 `ManagedChannel` and
//! §6's partial-unique-index invariant.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "managed_channels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_epg_group_id: Uuid,
    pub event_id: String,
    pub event_provider: String,
    pub tvg_id: String,
    pub channel_name: String,
    pub channel_number: i32,
    pub exception_keyword: Option<String>,
    pub dispatcharr_channel_id: Option<i64>,
    pub scheduled_delete_at: Option<DateTimeUtc>,
    pub deleted_at: Option<DateTimeUtc>,
    pub delete_reason: Option<String>,
    pub sync_status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ManagedChannelStream,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::ManagedChannelStream => Entity::has_many(super::managed_channel_stream::Entity)
                .into(),
        }
    }
}

impl Related<super::managed_channel_stream::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManagedChannelStream.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

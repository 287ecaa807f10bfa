//! `managed_channel_streams` table: the attached-stream list for a
//! `ManagedChannel`, grounded on `teamarr/database/channels/crud.py`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "managed_channel_streams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub managed_channel_id: Uuid,
    pub dispatcharr_stream_id: i64,
    pub stream_name: String,
    pub priority: i32,
    pub source_group_id: Uuid,
    pub source_group_type: String,
    pub exception_keyword: Option<String>,
    pub m3u_account_name: Option<String>,
    pub removed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ManagedChannel,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::ManagedChannel => Entity::belongs_to(super::managed_channel::Entity)
                .from(Column::ManagedChannelId)
                .to(super::managed_channel::Column::Id)
                .into(),
        }
    }
}

impl Related<super::managed_channel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManagedChannel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

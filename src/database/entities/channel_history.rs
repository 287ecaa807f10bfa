//! `channel_history` table: enforcement actions taken against a
//! `ManagedChannel` outside the per-run match/fail audit trail (cross-group
//! consolidation, disabled-group cleanup), grounded on spec.md §4.7
//! scenario S5's "a history row is written for both channels".

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "channel_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub channel_id: Uuid,
    pub action: String,
    pub reason: String,
    pub recorded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ManagedChannel,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::ManagedChannel => Entity::belongs_to(super::managed_channel::Entity)
                .from(Column::ChannelId)
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

//! `event_epg_groups` table, grounded on `teamarr/database/groups.py`.
//! Config fields live here as JSON blobs (leagues, regex bundle, exception
//! keywords) since they are read-mostly and reassembled into
//! `crate::models::EventEpgGroup` by the repository layer.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "event_epg_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub leagues: Json,
    pub template_id: Uuid,
    pub duplicate_event_mode: String,
    pub overlap_handling: String,
    pub channel_start_number: Option<i32>,
    pub assignment_mode: String,
    pub numbering_mode: String,
    pub sort_order: String,
    pub order_index: i32,
    pub parent_group_id: Option<Uuid>,
    pub include_leagues: Json,
    pub include_regex: Json,
    pub exclude_regex: Json,
    pub team_include: Json,
    pub team_exclude: Json,
    pub exception_keywords: Json,
    pub total_stream_count: i32,
    pub create_timing: String,
    pub delete_timing: String,
    pub include_final_events: bool,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! `matched_streams` audit table, grounded on spec.md §3.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "matched_streams")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub run_id: Uuid,
    pub group_id: Uuid,
    pub stream_id: i64,
    pub detected_league: String,
    pub parsed_team1: Option<String>,
    pub parsed_team2: Option<String>,
    pub match_method: String,
    pub confidence: f64,
    pub event_id: String,
    pub included: bool,
    pub exclusion_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

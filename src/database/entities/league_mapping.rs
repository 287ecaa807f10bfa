//! `leagues` table, grounded on `teamarr/services/league_mappings.py`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leagues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub canonical_code: String,
    pub provider: String,
    pub provider_league_id: String,
    pub provider_league_name: String,
    pub sport: String,
    pub display_name: String,
    pub aliases: Json,
    pub logo_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! Repository for the `leagues` table. Grounded on
//! `teamarr/services/league_mappings.py`: the table is small and read-mostly
//! so the service layer loads it wholesale into memory at startup.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;

use crate::database::entities::league_mapping::{self, Column};
use crate::database::entities::prelude::LeagueMappingEntity;
use crate::errors::{TeamarrError, TeamarrResult};
use crate::models::LeagueMapping;

#[derive(Clone)]
pub struct LeagueMappingRepository {
    connection: Arc<DatabaseConnection>,
}

impl LeagueMappingRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn all(&self) -> TeamarrResult<Vec<LeagueMapping>> {
        let models = LeagueMappingEntity::find().all(&*self.connection).await?;
        models.into_iter().map(to_domain).collect()
    }

    pub async fn for_provider(&self, provider: &str) -> TeamarrResult<Vec<LeagueMapping>> {
        let models = LeagueMappingEntity::find()
            .filter(Column::Provider.eq(provider))
            .all(&*self.connection)
            .await?;
        models.into_iter().map(to_domain).collect()
    }

    pub async fn upsert(&self, mapping: LeagueMapping) -> TeamarrResult<()> {
        let aliases = serde_json::to_value(&mapping.aliases)
            .map_err(|e| TeamarrError::internal(e.to_string()))?;
        let active = league_mapping::ActiveModel {
            canonical_code: Set(mapping.canonical_code),
            provider: Set(mapping.provider),
            provider_league_id: Set(mapping.provider_league_id),
            provider_league_name: Set(mapping.provider_league_name),
            sport: Set(mapping.sport),
            display_name: Set(mapping.display_name),
            aliases: Set(aliases),
            logo_url: Set(mapping.logo_url),
        };
        LeagueMappingEntity::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(Column::CanonicalCode)
                    .update_columns([
                        Column::Provider,
                        Column::ProviderLeagueId,
                        Column::ProviderLeagueName,
                        Column::Sport,
                        Column::DisplayName,
                        Column::Aliases,
                        Column::LogoUrl,
                    ])
                    .to_owned(),
            )
            .exec(&*self.connection)
            .await?;
        Ok(())
    }
}

fn to_domain(m: league_mapping::Model) -> TeamarrResult<LeagueMapping> {
    let aliases: Vec<String> =
        serde_json::from_value(m.aliases).map_err(|e| TeamarrError::internal(e.to_string()))?;
    Ok(LeagueMapping {
        canonical_code: m.canonical_code,
        provider: m.provider,
        provider_league_id: m.provider_league_id,
        provider_league_name: m.provider_league_name,
        sport: m.sport,
        display_name: m.display_name,
        aliases,
        logo_url: m.logo_url,
    })
}

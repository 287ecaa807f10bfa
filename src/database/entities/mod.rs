//! SeaORM entity definitions, one module per table. Mirrors the
//! `crate::entities` / `crate::models` split in the teacher: entities are
//! the wire-to-SQL shape, `crate::models` are the domain structs matchers
//! and services actually operate on.

pub mod stream_match_cache;
pub mod managed_channel;
pub mod managed_channel_stream;
pub mod event_epg_group;
pub mod league_mapping;
pub mod processing_run;
pub mod matched_stream;
pub mod failed_match;
pub mod channel_history;

pub mod prelude {
    pub use super::stream_match_cache::Entity as StreamMatchCacheEntity;
    pub use super::managed_channel::Entity as ManagedChannelEntity;
    pub use super::managed_channel_stream::Entity as ManagedChannelStreamEntity;
    pub use super::event_epg_group::Entity as EventEpgGroupEntity;
    pub use super::league_mapping::Entity as LeagueMappingEntity;
    pub use super::processing_run::Entity as ProcessingRunEntity;
    pub use super::matched_stream::Entity as MatchedStreamEntity;
    pub use super::failed_match::Entity as FailedMatchEntity;
    pub use super::channel_history::Entity as ChannelHistoryEntity;
}

//! SeaORM-based repositories, one per aggregate. Grounded on
//! `database/repositories/*.rs` in the teacher: each repository owns the
//! entity<->domain-model translation so the rest of the crate never
//! touches `sea_orm::ActiveModel` directly.

pub mod stream_match_cache;
pub mod managed_channel;
pub mod group;
pub mod league_mapping;
pub mod audit;

pub use stream_match_cache::StreamMatchCacheRepository;
pub use managed_channel::ManagedChannelRepository;
pub use group::GroupRepository;
pub use league_mapping::LeagueMappingRepository;
pub use audit::AuditRepository;

//! Teamarr's match-and-lifecycle core: reconciles an upstream IPTV
//! stream pool against sports data providers, materializes managed
//! channels in an external aggregator, and renders XMLTV.
//!
//! See `DESIGN.md` for how each module is grounded.

pub mod cache;
pub mod channel_gateway;
pub mod classifier;
pub mod config;
pub mod database;
pub mod enforcement;
pub mod errors;
pub mod group_processor;
pub mod lifecycle;
pub mod matching;
pub mod models;
pub mod normalizer;
pub mod providers;
pub mod scheduler;
pub mod utils;
pub mod xmltv;

pub use channel_gateway::{ChannelGateway, DispatcharrGateway};
pub use config::Config;
pub use database::Database;
pub use errors::{TeamarrError, TeamarrResult};
pub use group_processor::GroupProcessor;
pub use matching::StreamMatcher;
pub use providers::{ProviderRegistry, SportsDataProvider, SportsDataService};
pub use scheduler::{generation::GenerationDriver, Scheduler};

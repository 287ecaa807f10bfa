//! Domain model structs shared across the pipeline.
//!
//! Grounded on `teamarr/core/types.py`. Provider-scoped entities carry
//! both `id` and `provider` fields so the same numeric/string id from two
//! providers is never conflated.

pub mod event;
pub mod group;
pub mod channel;
pub mod stream;
pub mod audit;

pub use event::*;
pub use group::*;
pub use channel::*;
pub use stream::*;
pub use audit::*;

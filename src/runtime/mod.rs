//! Runtime adapters and the presentation-facing API surface.

pub mod api;
pub mod tokio_spawner;

pub use api::{redact, state, Attributes, Diagnostics, RedactedConfig};
pub use tokio_spawner::TokioSpawner;

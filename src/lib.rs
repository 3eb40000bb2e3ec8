//! # Prometheus Service Result
//!
//! Periodically invokes a named action, captures its structured response and
//! republishes it as a queryable state object (status + payload + metadata)
//! for dashboards and templates.
//!
//! ## Core Problem Solved
//!
//! Calling an action is easy; keeping its result observable is not:
//!
//! - **Cadence**: each instance fires immediately, then on its interval
//! - **No overlap**: at most one call in flight per instance; late ticks are skipped
//! - **Consistent reads**: readers always see a whole result, never a partial one
//! - **Safe reconfiguration**: interval changes, manual refresh and teardown
//!   never let a stale call write into the store
//! - **Failure tolerance**: failures become `error` results and polling goes on
//!
//! ## Architecture
//!
//! ```text
//! Supervisor ──► Instance ──► scheduler ──► ActionInvoker::invoke
//!                   │                             │
//!                   └── ResultStore ◄── Publisher ◄┘
//!                           │
//!                           ├─► read()       (snapshot)
//!                           └─► subscribe()  (stream of results)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prometheus_service_result::config::{PollConfig, SupervisorConfig};
//! use prometheus_service_result::core::Supervisor;
//! use prometheus_service_result::infra::ActionRegistry;
//! use prometheus_service_result::runtime::TokioSpawner;
//!
//! let registry = Arc::new(ActionRegistry::new());
//! registry.register_fn("weather.get_forecasts".parse()?, |_, params| async move {
//!     Ok(serde_json::json!({ "forecast": [], "for": params }))
//! });
//!
//! let supervisor = Supervisor::new(SupervisorConfig::default(), registry, TokioSpawner::current()?)?;
//! let cfg = PollConfig::from_setup(
//!     Some("weather.get_forecasts"),
//!     "entity_id: weather.home\ntype: daily",
//!     Some(600),
//!     supervisor.config(),
//! )?;
//! let id = supervisor.create(cfg)?;
//!
//! let attributes = supervisor.attributes(id)?;
//! supervisor.refresh(id)?;
//! supervisor.remove(id)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Polling core: results, store, publisher, scheduler, supervisor.
pub mod core;
/// Configuration models for the supervisor and its instances.
pub mod config;
/// Builders to construct supervisors from configuration.
pub mod builders;
/// Infrastructure adapters for invoking actions.
pub mod infra;
/// Runtime adapters and the presentation API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;

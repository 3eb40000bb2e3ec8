//! Configuration models for the supervisor and its polling instances.

pub mod params;
pub mod poll;

pub use params::{parse_parameters, ParsedParameters};
pub use poll::{
    BridgeConfig, PollConfig, SupervisorConfig, DEFAULT_INTERVAL_SECS,
    DEFAULT_INVOCATION_TIMEOUT_SECS, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS,
};

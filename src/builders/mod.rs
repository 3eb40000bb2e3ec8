//! Builders to construct supervisors from configuration.

pub mod supervisor_builder;

pub use supervisor_builder::build_supervisor;

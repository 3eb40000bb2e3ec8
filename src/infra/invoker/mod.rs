//! Action invoker adapters.

pub mod fn_invoker;
pub mod registry;

pub use fn_invoker::FnInvoker;
pub use registry::ActionRegistry;

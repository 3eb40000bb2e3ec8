//! Infrastructure adapters for invoking actions.

pub mod invoker;

pub use invoker::{ActionRegistry, FnInvoker};

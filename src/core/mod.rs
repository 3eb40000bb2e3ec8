//! Polling core: result model, store, publisher, scheduler and supervisor.

pub mod error;
pub mod invoker;
pub mod publisher;
pub mod result;
pub mod scheduler;
pub mod spawn;
pub mod stats;
pub mod store;
pub mod supervisor;

pub use error::{AppResult, BridgeError, InvocationError};
pub use invoker::ActionInvoker;
pub use publisher::Publisher;
pub use result::{ErrorKind, PollResult, ResultStatus};
pub use scheduler::{PollJob, SchedulerHandle};
pub use spawn::Spawn;
pub use stats::InstanceStats;
pub use store::{ResultStore, ResultStream};
pub use supervisor::Supervisor;

//! Runtime-agnostic spawning seam.

use std::future::Future;

/// Abstraction for spawning background work on a runtime.
///
/// Scheduler loops and individual invocations are both launched through this
/// trait, so embedders decide which runtime handle owns them.
pub trait Spawn: Clone + Send + Sync + 'static {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

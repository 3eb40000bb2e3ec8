//! Latest-result slot with snapshot reads and change notification.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::core::PollResult;

/// Stream of results produced by [`ResultStore::subscribe`].
///
/// Yields the current result first, then every later replacement. A slow
/// consumer skips intermediate values and sees the newest one. The stream
/// ends once the store is released.
pub type ResultStream = WatchStream<Arc<PollResult>>;

/// Holds the latest [`PollResult`] of one instance.
///
/// The slot is replaced wholesale on every write; readers clone an `Arc`
/// snapshot and never observe a partially written value.
pub struct ResultStore {
    slot: watch::Sender<Arc<PollResult>>,
}

impl ResultStore {
    /// Create a store seeded with `initial`.
    #[must_use]
    pub fn new(initial: PollResult) -> Self {
        let (slot, _) = watch::channel(Arc::new(initial));
        Self { slot }
    }

    /// Replace the stored result and wake subscribers.
    pub fn write(&self, result: PollResult) {
        self.slot.send_replace(Arc::new(result));
    }

    /// Snapshot of the current result.
    #[must_use]
    pub fn read(&self) -> Arc<PollResult> {
        Arc::clone(&self.slot.borrow())
    }

    /// Subscribe to result updates, starting with the current value.
    #[must_use]
    pub fn subscribe(&self) -> ResultStream {
        WatchStream::new(self.slot.subscribe())
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.slot.receiver_count()
    }
}

impl std::fmt::Debug for ResultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultStore")
            .field("current", &self.read())
            .finish()
    }
}

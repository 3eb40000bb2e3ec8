//! Turns invocation outcomes into published results.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::core::stats::InstanceCounters;
use crate::core::{InvocationError, PollResult, ResultStore};
use crate::util::clock::Clock;
use crate::util::serde::{ActionId, Payload};

/// Writes invocation outcomes of one scheduler generation into a store.
///
/// A publisher is closed when its scheduler stops. Closing and publishing
/// serialize on the same lock, so once [`Publisher::close`] returns no
/// further write from this publisher can reach the store.
pub struct Publisher {
    action_id: ActionId,
    store: Arc<ResultStore>,
    counters: Arc<InstanceCounters>,
    clock: Clock,
    closed: Mutex<bool>,
}

impl Publisher {
    pub(crate) fn new(
        action_id: ActionId,
        store: Arc<ResultStore>,
        counters: Arc<InstanceCounters>,
    ) -> Self {
        Self {
            action_id,
            store,
            counters,
            clock: Clock::new(),
            closed: Mutex::new(false),
        }
    }

    /// Publish one outcome. Returns `false` when the publisher is closed and
    /// the outcome was discarded.
    pub fn publish(&self, outcome: Result<Payload, InvocationError>) -> bool {
        let result = PollResult::from_outcome(self.action_id.clone(), outcome, self.clock.now());

        let closed = self.closed.lock();
        if *closed {
            self.counters.discarded_results.fetch_add(1, Ordering::Relaxed);
            debug!(action = %self.action_id, "discarding result that arrived after stop");
            return false;
        }

        if result.is_ok() {
            self.counters.record_success(result.observed_at());
            debug!(action = %self.action_id, "action returned response");
        } else {
            self.counters.record_failure();
            warn!(
                action = %self.action_id,
                error = result.error_message().unwrap_or_default(),
                consecutive_errors = self.counters.consecutive_errors.load(Ordering::Relaxed),
                "action call failed"
            );
        }
        self.store.write(result);
        drop(closed);
        true
    }

    /// Stop accepting outcomes.
    pub fn close(&self) {
        *self.closed.lock() = true;
    }

    /// Whether [`Publisher::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.lock()
    }

    /// Action this publisher stamps on its results.
    #[must_use]
    pub const fn action_id(&self) -> &ActionId {
        &self.action_id
    }
}

//! Per-instance counters.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// Statistics about one instance's polling activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstanceStats {
    /// Invocations handed to the action invoker.
    pub invocations: u64,
    /// Invocations whose result was published as OK.
    pub succeeded: u64,
    /// Invocations whose result was published as ERROR.
    pub failed: u64,
    /// Timer ticks dropped because an invocation was still in flight.
    pub skipped_ticks: u64,
    /// Manual refreshes absorbed by an in-flight invocation.
    pub coalesced_triggers: u64,
    /// Results that completed after their scheduler was stopped.
    pub discarded_results: u64,
    /// Failures since the last success.
    pub consecutive_errors: u64,
    /// Time of the last OK result.
    pub last_success_at: Option<DateTime<Utc>>,
}

/// Internal counters for instance statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct InstanceCounters {
    pub invocations: AtomicU64,
    pub succeeded: AtomicU64,
    pub failed: AtomicU64,
    pub skipped_ticks: AtomicU64,
    pub coalesced_triggers: AtomicU64,
    pub discarded_results: AtomicU64,
    pub consecutive_errors: AtomicU64,
    pub last_success_at: Mutex<Option<DateTime<Utc>>>,
}

impl InstanceCounters {
    pub fn record_success(&self, at: DateTime<Utc>) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        self.consecutive_errors.store(0, Ordering::Relaxed);
        *self.last_success_at.lock() = Some(at);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.consecutive_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> InstanceStats {
        InstanceStats {
            invocations: self.invocations.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped_ticks: self.skipped_ticks.load(Ordering::Relaxed),
            coalesced_triggers: self.coalesced_triggers.load(Ordering::Relaxed),
            discarded_results: self.discarded_results.load(Ordering::Relaxed),
            consecutive_errors: self.consecutive_errors.load(Ordering::Relaxed),
            last_success_at: *self.last_success_at.lock(),
        }
    }
}

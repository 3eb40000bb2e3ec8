//! Per-instance poll scheduler.
//!
//! One scheduler drives one action on a fixed interval:
//!
//! ```text
//! start ──► fire (t = 0) ──► sleep(interval) ──► fire ──► sleep ──► ...
//!              │                                   │
//!              └─► invocation task ──► Publisher ──┘ (at most one in flight)
//!
//! trigger_now     ─► fire now, restart the countdown (no-op while in flight)
//! update_interval ─► restart the countdown from now with the new interval
//! stop            ─► cancel the loop, close the publisher
//! ```
//!
//! The timer loop never awaits an invocation. Each firing spawns a separate
//! invocation task and the loop keeps ticking, which is what makes skipped
//! ticks observable when the action is slower than the interval.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::stats::{InstanceCounters, InstanceStats};
use crate::core::{ActionInvoker, InvocationError, Publisher, ResultStore, Spawn};
use crate::util::serde::{ActionId, Payload};

/// What a scheduler polls and how often.
#[derive(Debug, Clone)]
pub struct PollJob {
    /// Action to invoke.
    pub action_id: ActionId,
    /// Parameters passed on every invocation.
    pub parameters: Payload,
    /// Delay between firings.
    pub interval: Duration,
    /// Upper bound for a single invocation.
    pub timeout: Duration,
}

#[derive(Debug)]
enum Command {
    TriggerNow,
    UpdateInterval(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Firing {
    Tick,
    Manual,
}

/// Clears the in-flight flag when the invocation task ends, even by panic.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Everything a firing needs, shared between the loop and invocation tasks.
struct Firer<S> {
    job: PollJob,
    invoker: Arc<dyn ActionInvoker>,
    publisher: Arc<Publisher>,
    counters: Arc<InstanceCounters>,
    in_flight: Arc<AtomicBool>,
    spawner: S,
}

impl<S: Spawn> Firer<S> {
    /// Start one invocation unless one is already running. Returns whether
    /// an invocation was started.
    fn fire(&self, firing: Firing) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            match firing {
                Firing::Tick => {
                    self.counters.skipped_ticks.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        action = %self.job.action_id,
                        "skipping tick, previous invocation still in flight"
                    );
                }
                Firing::Manual => {
                    self.counters
                        .coalesced_triggers
                        .fetch_add(1, Ordering::Relaxed);
                    debug!(
                        action = %self.job.action_id,
                        "manual refresh coalesced into in-flight invocation"
                    );
                }
            }
            return false;
        }

        self.counters.invocations.fetch_add(1, Ordering::Relaxed);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        let invoker = Arc::clone(&self.invoker);
        let publisher = Arc::clone(&self.publisher);
        let action = self.job.action_id.clone();
        let parameters = self.job.parameters.clone();
        let timeout = self.job.timeout;

        self.spawner.spawn(async move {
            debug!(%action, ?firing, "invoking action");
            let call = AssertUnwindSafe(invoker.invoke(&action, &parameters)).catch_unwind();
            let outcome = match time::timeout(timeout, call).await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(panic)) => Err(InvocationError::new(format!(
                    "action call panicked: {}",
                    panic_message(panic.as_ref())
                ))),
                Err(_) => Err(InvocationError::new("action call timed out")),
            };
            publisher.publish(outcome);
            drop(guard);
        });
        true
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Handle to a running poll scheduler.
///
/// Dropping the handle stops the scheduler.
pub struct SchedulerHandle {
    commands: mpsc::UnboundedSender<Command>,
    cancel: CancellationToken,
    publisher: Arc<Publisher>,
    counters: Arc<InstanceCounters>,
    in_flight: Arc<AtomicBool>,
    interval: Mutex<Duration>,
}

impl SchedulerHandle {
    /// Request an immediate invocation. Coalesced into a no-op when one is
    /// already in flight; ignored once stopped.
    pub fn trigger_now(&self) {
        if self.cancel.is_cancelled() {
            debug!(action = %self.publisher.action_id(), "refresh ignored, scheduler stopped");
            return;
        }
        let _ = self.commands.send(Command::TriggerNow);
    }

    /// Reschedule the timer with `interval`, anchored to now. An in-flight
    /// invocation is unaffected and its result still lands.
    pub fn update_interval(&self, interval: Duration) {
        if self.cancel.is_cancelled() {
            return;
        }
        *self.interval.lock() = interval;
        let _ = self.commands.send(Command::UpdateInterval(interval));
    }

    /// Stop the scheduler. No invocation starts afterwards and the result of
    /// an invocation still in flight is discarded. Idempotent.
    pub fn stop(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.publisher.close();
        self.cancel.cancel();
        info!(action = %self.publisher.action_id(), "poll scheduler stopped");
    }

    /// Whether [`SchedulerHandle::stop`] has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether an invocation is currently outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Interval currently in effect.
    #[must_use]
    pub fn interval(&self) -> Duration {
        *self.interval.lock()
    }

    /// Snapshot of the polling statistics.
    #[must_use]
    pub fn stats(&self) -> InstanceStats {
        self.counters.snapshot()
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start a scheduler for `job` that publishes into `store`. The first
/// invocation fires immediately.
pub fn start<S: Spawn>(
    spawner: &S,
    job: PollJob,
    invoker: Arc<dyn ActionInvoker>,
    store: Arc<ResultStore>,
) -> SchedulerHandle {
    start_with_counters(spawner, job, invoker, store, Arc::new(InstanceCounters::default()))
}

/// Like [`start`], accumulating statistics into existing counters so they
/// survive a restart of the instance.
pub(crate) fn start_with_counters<S: Spawn>(
    spawner: &S,
    job: PollJob,
    invoker: Arc<dyn ActionInvoker>,
    store: Arc<ResultStore>,
    counters: Arc<InstanceCounters>,
) -> SchedulerHandle {
    let (commands, rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let in_flight = Arc::new(AtomicBool::new(false));
    let interval = job.interval;
    let publisher = Arc::new(Publisher::new(
        job.action_id.clone(),
        store,
        Arc::clone(&counters),
    ));

    info!(
        action = %job.action_id,
        interval_secs = interval.as_secs(),
        "poll scheduler started"
    );

    let firer = Firer {
        job,
        invoker,
        publisher: Arc::clone(&publisher),
        counters: Arc::clone(&counters),
        in_flight: Arc::clone(&in_flight),
        spawner: spawner.clone(),
    };
    spawner.spawn(run_loop(firer, rx, cancel.clone()));

    SchedulerHandle {
        commands,
        cancel,
        publisher,
        counters,
        in_flight,
        interval: Mutex::new(interval),
    }
}

async fn run_loop<S: Spawn>(
    firer: Firer<S>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    cancel: CancellationToken,
) {
    let mut interval = firer.job.interval;
    let sleep = time::sleep(Duration::ZERO);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            cmd = commands.recv() => match cmd {
                Some(Command::TriggerNow) => {
                    if firer.fire(Firing::Manual) {
                        sleep.as_mut().reset(Instant::now() + interval);
                    }
                }
                Some(Command::UpdateInterval(next)) => {
                    debug!(
                        action = %firer.job.action_id,
                        interval_secs = next.as_secs(),
                        "interval updated"
                    );
                    interval = next;
                    sleep.as_mut().reset(Instant::now() + interval);
                }
                None => break,
            },
            () = &mut sleep => {
                firer.fire(Firing::Tick);
                sleep.as_mut().reset(Instant::now() + interval);
            }
        }
    }
}

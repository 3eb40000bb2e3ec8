//! Wall-clock helpers.

use chrono::{DateTime, TimeDelta, Utc};
use tokio::time::Instant;

/// Current UTC time, used to stamp published results.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Wall-clock stamps that advance with the runtime's monotonic clock.
///
/// The UTC time is read once at construction; later stamps add the elapsed
/// [`tokio::time::Instant`] time. Spacing between stamps therefore matches
/// the timer cadence exactly, including under a paused test clock.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    base: DateTime<Utc>,
    anchor: Instant,
}

impl Clock {
    /// Anchor a clock at the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: Utc::now(),
            anchor: Instant::now(),
        }
    }

    /// Current time as seen by this clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().saturating_duration_since(self.anchor);
        TimeDelta::from_std(elapsed)
            .ok()
            .and_then(|delta| self.base.checked_add_signed(delta))
            .unwrap_or_else(Utc::now)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

//! Cancellable pacing between monitor cycles.

use std::time::Duration;

use anyhow::{bail, Result};

use crate::shutdown::ShutdownSignal;

/// Fixed-interval scheduler whose wait aborts early on shutdown.
pub struct IntervalScheduler {
    interval: Duration,
}

impl IntervalScheduler {
    /// A zero interval would spin the loop; reject it at construction so
    /// misconfiguration fails before the first fetch.
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            bail!("scheduler interval must be greater than zero");
        }
        Ok(Self { interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block for one interval or until `signal` fires, whichever is first.
    ///
    /// Returns `true` if shutdown cut the wait short.
    pub fn wait(&self, signal: &ShutdownSignal) -> bool {
        signal.wait_timeout(self.interval)
    }
}

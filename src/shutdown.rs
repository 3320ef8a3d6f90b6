//! Process-wide shutdown coordination.
//!
//! One [`ShutdownSignal`] is created at startup and cloned into every
//! monitor thread, the key listener, and the ctrl-c handler. The signal is
//! set-once: after [`ShutdownSignal::trigger`] fires, every observer sees
//! it and further triggers are no-ops. Observation is either a cheap
//! non-blocking check or a condvar wait, so sleeping threads wake
//! immediately instead of noticing on their next poll.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Cloneable handle to the shared shutdown flag.
#[derive(Clone)]
pub struct ShutdownSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    /// Set the flag and wake every waiting thread. Idempotent.
    pub fn trigger(&self) {
        let (lock, cvar) = &*self.inner;
        let mut triggered = lock.lock().unwrap_or_else(|e| e.into_inner());
        *triggered = true;
        cvar.notify_all();
    }

    /// Non-blocking check, suitable for loop conditions.
    pub fn is_triggered(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Block until the signal fires.
    pub fn wait(&self) {
        let (lock, cvar) = &*self.inner;
        let mut triggered = lock.lock().unwrap_or_else(|e| e.into_inner());
        while !*triggered {
            triggered = cvar.wait(triggered).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Block until the signal fires or `timeout` elapses.
    ///
    /// Returns `true` if the signal fired, `false` if the full timeout
    /// passed without it. Used by the scheduler to implement cancellable
    /// interval sleeps.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut triggered = lock.lock().unwrap_or_else(|e| e.into_inner());
        let deadline = std::time::Instant::now() + timeout;
        while !*triggered {
            let now = std::time::Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = cvar
                .wait_timeout(triggered, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            triggered = guard;
        }
        true
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

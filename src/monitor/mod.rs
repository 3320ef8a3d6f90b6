//! The per-domain monitor loop and the trait seams it is built against.
//!
//! A [`Monitor`] owns one snapshot store and three injected collaborators:
//! a [`Fetcher`] producing the current snapshot, a [`FetchErrorHandler`]
//! absorbing transient source failures, and an [`ActionExecutor`] receiving
//! every non-empty change set. The loop never talks to the network or the
//! terminal itself, which keeps it fully testable with scripted fakes.

pub mod scheduler;

use std::fmt;

use tracing::{debug, warn};

use crate::models::{ChangeSet, Record, Snapshot};
use crate::monitor::scheduler::IntervalScheduler;
use crate::shutdown::ShutdownSignal;
use crate::store::{SnapshotStore, StoreError};

/// A failed attempt to observe the source.
///
/// Deliberately opaque: the loop only needs to know that this cycle produced
/// no new information. Carried as a value, handed to the error handler, and
/// never escalated past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchError {}

/// Produces the current state of the watched collection.
pub trait Fetcher<T: Record> {
    /// An `Err` means "no observation this cycle", nothing stronger; the
    /// loop stays alive and retries after the next interval.
    fn fetch(&mut self) -> Result<Snapshot<T>, FetchError>;
}

/// Absorbs fetch failures. Infallible by contract: whatever it does
/// internally (log, count, notify), failures are its own to swallow.
pub trait FetchErrorHandler {
    fn handle(&mut self, error: &FetchError);
}

/// Receives each non-empty change set exactly once, after the snapshot has
/// been durably persisted. Never invoked for an empty set.
pub trait ActionExecutor<T: Record> {
    fn execute(&mut self, changes: &ChangeSet<T>);
}

/// One watched domain: store plus collaborators plus pacing.
pub struct Monitor<T, F, H, E>
where
    T: Record,
    F: Fetcher<T>,
    H: FetchErrorHandler,
    E: ActionExecutor<T>,
{
    name: String,
    store: SnapshotStore<T>,
    fetcher: F,
    handler: H,
    executor: E,
    scheduler: IntervalScheduler,
}

impl<T, F, H, E> Monitor<T, F, H, E>
where
    T: Record,
    F: Fetcher<T>,
    H: FetchErrorHandler,
    E: ActionExecutor<T>,
{
    pub fn new(
        name: impl Into<String>,
        store: SnapshotStore<T>,
        fetcher: F,
        handler: H,
        executor: E,
        scheduler: IntervalScheduler,
    ) -> Self {
        Self {
            name: name.into(),
            store,
            fetcher,
            handler,
            executor,
            scheduler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run cycles until shutdown.
    ///
    /// The signal is checked before every fetch and again during the
    /// inter-cycle wait, so cancellation takes effect within one interval
    /// at the latest and never interrupts a cycle midway. The only other
    /// way out is a store failure, which terminates this loop alone and is
    /// surfaced to the caller.
    pub fn run(&mut self, signal: &ShutdownSignal) -> Result<(), StoreError> {
        loop {
            if signal.is_triggered() {
                debug!(watch = %self.name, "monitor stopping on shutdown signal");
                return Ok(());
            }
            self.cycle()?;
            if self.scheduler.wait(signal) {
                debug!(watch = %self.name, "monitor stopping on shutdown signal");
                return Ok(());
            }
        }
    }

    /// Perform exactly one fetch-reconcile-execute cycle, without waiting.
    pub fn run_once(&mut self) -> Result<(), StoreError> {
        self.cycle()
    }

    fn cycle(&mut self) -> Result<(), StoreError> {
        match self.fetcher.fetch() {
            Ok(snapshot) => {
                debug!(
                    watch = %self.name,
                    records = snapshot.len(),
                    "fetched snapshot"
                );
                let changes = self.store.reconcile(snapshot)?;
                if !changes.is_empty() {
                    self.executor.execute(&changes);
                }
            }
            Err(error) => {
                warn!(watch = %self.name, %error, "fetch failed");
                self.handler.handle(&error);
            }
        }
        Ok(())
    }
}

//! The coordinator: start every philosopher, stop them, wait for them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use dp_core::{AgentId, AgentRng, TableConfig};
use dp_protocol::{AgentSnapshot, Ledger, SharedTable, TransitionObserver};
use tracing::{error, info};

use crate::{AgentHandle, AgentSummary, Philosopher, TableError, TableResult};

// ── Table ─────────────────────────────────────────────────────────────────────

/// A built table whose philosophers have not started yet.
///
/// Create via [`TableBuilder`][crate::TableBuilder].
pub struct Table<O: TransitionObserver> {
    pub(crate) config: TableConfig,
    pub(crate) shared: Arc<SharedTable<O>>,
}

impl<O: TransitionObserver + 'static> Table<O> {
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Seat the philosopher at `id` without starting it.
    ///
    /// Each seat can be taken once per table; asking again is
    /// [`DpError::SeatTaken`][dp_core::DpError::SeatTaken].  [`start`](Self::start)
    /// seats everyone, so it fails if any seat was taken by hand first.
    pub fn seat(&self, id: AgentId) -> TableResult<Philosopher<O>> {
        self.shared.claim_seat(id)?;
        Ok(Philosopher::new(
            id,
            Arc::clone(&self.shared),
            AgentRng::new(self.config.seed, id),
            self.config.think_ms,
            self.config.eat_ms,
            self.config.max_meals,
        ))
    }

    /// Start every philosopher on its own thread.
    ///
    /// If a thread cannot be spawned, the ones already running are shut down
    /// and joined before the error is returned.
    pub fn start(self) -> TableResult<RunningTable<O>> {
        let ring = self.shared.ring();
        info!(philosophers = ring.size(), seed = self.config.seed, "starting table");

        let mut handles = Vec::with_capacity(ring.size());
        for id in ring.ids() {
            match self.seat(id).and_then(Philosopher::start) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    self.shared.shutdown();
                    for handle in handles {
                        let id = handle.id();
                        if let Err(e) = handle.await_termination() {
                            error!(philosopher = %id, error = %e, "philosopher did not finish cleanly");
                        }
                    }
                    return Err(e);
                }
            }
        }

        Ok(RunningTable { shared: self.shared, handles })
    }

    /// Start, run until `stop` is raised or every philosopher has finished
    /// its meals, then shut down and join.
    ///
    /// `stop` is polled every `poll`; this is how the CLI turns a signal
    /// into a shutdown.
    pub fn run(self, stop: &AtomicBool, poll: Duration) -> TableResult<RunReport<O>> {
        let running = self.start()?;
        while !stop.load(Ordering::Relaxed) && !running.is_finished() {
            thread::sleep(poll);
        }
        running.shutdown_handle().shutdown();
        running.await_termination()
    }
}

// ── ShutdownHandle ────────────────────────────────────────────────────────────

/// Cooperative cancellation token for a running table.
///
/// Holds only a weak reference, so a forgotten handle never keeps the table
/// alive after every philosopher has left.
pub struct ShutdownHandle<O: TransitionObserver> {
    shared: Weak<SharedTable<O>>,
}

impl<O: TransitionObserver> Clone for ShutdownHandle<O> {
    fn clone(&self) -> Self {
        Self { shared: Weak::clone(&self.shared) }
    }
}

impl<O: TransitionObserver> ShutdownHandle<O> {
    /// Raise the stop flag and wake every parked philosopher.
    ///
    /// Philosophers that are thinking or eating finish their current sleep
    /// first.  Does nothing once the table is gone.
    pub fn shutdown(&self) {
        if let Some(shared) = self.shared.upgrade() {
            info!("shutting table down");
            shared.shutdown();
        }
    }
}

// ── RunningTable ──────────────────────────────────────────────────────────────

/// A table whose philosophers are running.
pub struct RunningTable<O: TransitionObserver> {
    shared:  Arc<SharedTable<O>>,
    handles: Vec<AgentHandle>,
}

impl<O: TransitionObserver> RunningTable<O> {
    pub fn shutdown_handle(&self) -> ShutdownHandle<O> {
        ShutdownHandle { shared: Arc::downgrade(&self.shared) }
    }

    /// `true` once every philosopher's thread has returned.
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(AgentHandle::is_finished)
    }

    /// A live view of every philosopher's protocol state.
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.shared.snapshot()
    }

    /// Join every philosopher, then hand back the final state and observer.
    ///
    /// Every thread is joined even if some fail; the first failure is
    /// returned.  Without a shutdown or `max_meals` this blocks forever.
    pub fn await_termination(self) -> TableResult<RunReport<O>> {
        let mut summaries = Vec::with_capacity(self.handles.len());
        let mut first_error = None;

        for handle in self.handles {
            let id = handle.id();
            match handle.await_termination() {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    error!(philosopher = %id, error = %e, "philosopher did not finish cleanly");
                    first_error.get_or_insert(e);
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let ledger = self.shared.ledger();
        let final_states = self.shared.snapshot();
        let shared = Arc::into_inner(self.shared).ok_or(TableError::TableInUse)?;
        info!(?ledger, "table closed");

        Ok(RunReport {
            summaries,
            ledger,
            final_states,
            observer: shared.into_observer(),
        })
    }
}

// ── RunReport ─────────────────────────────────────────────────────────────────

/// Everything left on the table after the last philosopher leaves.
pub struct RunReport<O> {
    /// One entry per philosopher, in ring order.
    pub summaries:    Vec<AgentSummary>,
    pub ledger:       Ledger,
    pub final_states: Vec<AgentSnapshot>,
    pub observer:     O,
}

impl<O> RunReport<O> {
    /// Meals eaten per philosopher, in ring order.
    pub fn meals(&self) -> Vec<u64> {
        self.summaries.iter().map(|s| s.meals).collect()
    }

    /// `true` when every philosopher ended up thinking with nothing pending
    /// and every increment was matched.
    pub fn is_clean(&self) -> bool {
        self.ledger.is_balanced()
            && self
                .final_states
                .iter()
                .all(|a| a.state.is_thinking() && a.pending == 0)
    }
}

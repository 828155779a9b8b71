//! One philosopher: its private lifecycle loop and its thread handle.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use dp_core::{AgentId, AgentRng, DurationRange};
use dp_protocol::{Permission, SharedTable, TransitionObserver};
use tracing::{debug, error, info};

use crate::{TableError, TableResult};

// ── AgentSummary ──────────────────────────────────────────────────────────────

/// What a philosopher reports when its thread ends.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AgentSummary {
    pub id:    AgentId,
    pub meals: u64,
}

// ── SeatGuard ─────────────────────────────────────────────────────────────────

/// Leaves the table on every exit path, including unwinding.
///
/// A philosopher that dies hungry or eating would otherwise leave a count on
/// its neighbors that nobody ever pays back.  The guard is only armed between
/// this philosopher's own successful `request` and the matching `release`, so
/// it never touches a seat this thread did not put in play.  On a panic the
/// whole table is also shut down, since a panic under the lock may have left
/// it half-updated.
struct SeatGuard<O: TransitionObserver> {
    table: Arc<SharedTable<O>>,
    id:    AgentId,
    armed: bool,
}

impl<O: TransitionObserver> Drop for SeatGuard<O> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = self.table.abandon(self.id) {
                error!(philosopher = %self.id, error = %e, "could not leave the table cleanly");
            }
        }
        if thread::panicking() {
            error!(philosopher = %self.id, "philosopher panicked; shutting the table down");
            self.table.shutdown();
        }
    }
}

// ── Philosopher ───────────────────────────────────────────────────────────────

/// A seated philosopher, ready to [`start`](Self::start).
pub struct Philosopher<O: TransitionObserver> {
    id:        AgentId,
    table:     Arc<SharedTable<O>>,
    rng:       AgentRng,
    think_ms:  DurationRange,
    eat_ms:    DurationRange,
    max_meals: Option<u64>,
}

impl<O: TransitionObserver + 'static> Philosopher<O> {
    pub(crate) fn new(
        id:        AgentId,
        table:     Arc<SharedTable<O>>,
        rng:       AgentRng,
        think_ms:  DurationRange,
        eat_ms:    DurationRange,
        max_meals: Option<u64>,
    ) -> Self {
        Self { id, table, rng, think_ms, eat_ms, max_meals }
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Spawn the lifecycle on its own named thread.
    pub fn start(self) -> TableResult<AgentHandle> {
        let id = self.id;
        let join = thread::Builder::new()
            .name(format!("philosopher-{id}"))
            .spawn(move || {
                let table = Arc::clone(&self.table);
                let result = self.dine();
                if let Err(e) = &result {
                    error!(philosopher = %id, error = %e, "philosopher failed; shutting the table down");
                    table.shutdown();
                }
                result
            })
            .map_err(|source| TableError::Spawn { id, source })?;
        Ok(AgentHandle { id, join })
    }

    /// The think → hungry → eat → think loop.
    ///
    /// The stop flag is read at the top of every cycle and again after
    /// thinking.  Sleeps are never interrupted, so a philosopher notices a
    /// shutdown at most one think or eat interval late; only a philosopher
    /// parked on its condvar is woken immediately.
    fn dine(mut self) -> TableResult<AgentSummary> {
        let mut guard = SeatGuard { table: Arc::clone(&self.table), id: self.id, armed: false };
        let mut meals = 0u64;
        info!(philosopher = %self.id, "seated");

        loop {
            if self.table.is_stopping() || self.max_meals.is_some_and(|max| meals >= max) {
                break;
            }

            thread::sleep(self.rng.duration(self.think_ms));
            if self.table.is_stopping() {
                break;
            }

            let waiting_on = self.table.request(self.id)?;
            guard.armed = true;
            debug!(philosopher = %self.id, waiting_on, "hungry");
            if self.table.await_permission(self.id)? == Permission::Cancelled {
                self.table.abandon(self.id)?;
                guard.armed = false;
                break;
            }

            thread::sleep(self.rng.duration(self.eat_ms));
            self.table.release(self.id)?;
            guard.armed = false;
            meals += 1;
        }

        info!(philosopher = %self.id, meals, "left the table");
        Ok(AgentSummary { id: self.id, meals })
    }
}

// ── AgentHandle ───────────────────────────────────────────────────────────────

/// Join handle for one running philosopher.
pub struct AgentHandle {
    id:   AgentId,
    join: JoinHandle<TableResult<AgentSummary>>,
}

impl AgentHandle {
    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// `true` once the philosopher's thread has returned.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Block until the philosopher's thread ends.
    pub fn await_termination(self) -> TableResult<AgentSummary> {
        self.join
            .join()
            .map_err(|_| TableError::AgentPanicked { id: self.id })?
    }
}

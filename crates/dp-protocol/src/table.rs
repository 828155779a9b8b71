//! `SharedTable` — every philosopher's state behind one mutex.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use dp_core::{AgentId, AgentState, DpError, DpResult, Ring};
use tracing::{debug, error, warn};

use crate::{AgentSnapshot, Ledger, Permission, TransitionObserver};

// ── Lock-protected state ──────────────────────────────────────────────────────

/// Protocol fields of one philosopher.  Only ever touched under the lock.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
struct AgentRecord {
    state:    AgentState,
    pending:  u32,
    awaiting: Vec<AgentId>,
    /// A lifecycle owns this seat.
    seated:   bool,
}

/// Everything the mutex guards.  The methods here are the protocol proper;
/// `SharedTable` only adds locking and wakeups around them.
struct TableState<O> {
    agents:   Vec<AgentRecord>,
    ledger:   Ledger,
    stopping: bool,
    observer: O,
}

impl<O: TransitionObserver> TableState<O> {
    fn record(&self, id: AgentId) -> &AgentRecord {
        &self.agents[id.index()]
    }

    fn set_state(&mut self, id: AgentId, state: AgentState) {
        self.agents[id.index()].state = state;
        self.observer.on_transition(id, state);
    }

    fn expect_state(&self, id: AgentId, expected: AgentState, to: AgentState) -> DpResult<()> {
        let from = self.record(id).state;
        if from == expected {
            Ok(())
        } else {
            Err(DpError::IllegalTransition { id, from, to })
        }
    }

    /// Count the busy neighbors of `id` and mark it hungry.
    fn request(&mut self, ring: &Ring, id: AgentId) -> DpResult<u32> {
        self.expect_state(id, AgentState::Thinking, AgentState::Hungry)?;

        let busy: Vec<AgentId> = ring
            .neighbors(id)
            .into_iter()
            .filter(|n| !self.record(*n).state.is_thinking())
            .collect();

        let me = &mut self.agents[id.index()];
        debug_assert_eq!(me.pending, 0);
        for n in busy {
            me.pending += 1;
            me.awaiting.push(n);
            debug!(philosopher = %id, neighbor = %n, pending = me.pending, "waiting on busy neighbor");
        }
        let pending = me.pending;
        self.ledger.increments += u64::from(pending);

        self.set_state(id, AgentState::Hungry);
        Ok(pending)
    }

    /// Become eating if nothing is pending.
    fn try_begin_eating(&mut self, id: AgentId) -> DpResult<bool> {
        self.expect_state(id, AgentState::Hungry, AgentState::Eating)?;
        if self.record(id).pending != 0 {
            return Ok(false);
        }
        self.set_state(id, AgentState::Eating);
        Ok(true)
    }

    /// Pay back the count every neighbor holds against `id`.
    ///
    /// A neighbor that is not thinking and that `id` is not itself waiting on
    /// must have counted `id` when it got hungry.  All targets are checked
    /// before any counter moves, so a broken pairing leaves the table
    /// untouched.  Returns the neighbors whose count reached zero.
    fn pay_back(&mut self, ring: &Ring, id: AgentId) -> DpResult<Vec<AgentId>> {
        let own_awaiting = self.record(id).awaiting.clone();
        let creditors: Vec<AgentId> = ring
            .neighbors(id)
            .into_iter()
            .filter(|n| !self.record(*n).state.is_thinking() && !own_awaiting.contains(n))
            .collect();

        for &n in &creditors {
            let rec = self.record(n);
            if rec.pending == 0 || !rec.awaiting.contains(&id) {
                error!(philosopher = %n, releaser = %id, "release without a matching count");
                return Err(DpError::CounterUnderflow { id: n, neighbor: id });
            }
        }

        let mut ready = Vec::new();
        for n in creditors {
            let rec = &mut self.agents[n.index()];
            rec.awaiting.retain(|a| *a != id);
            rec.pending -= 1;
            debug!(philosopher = %n, releaser = %id, pending = rec.pending, "neighbor rested");
            if rec.pending == 0 {
                ready.push(n);
            }
            self.ledger.decrements += 1;
        }
        Ok(ready)
    }

    fn claim_seat(&mut self, id: AgentId) -> DpResult<()> {
        let me = &mut self.agents[id.index()];
        if me.seated {
            return Err(DpError::SeatTaken { id });
        }
        me.seated = true;
        Ok(())
    }

    fn release(&mut self, ring: &Ring, id: AgentId) -> DpResult<Vec<AgentId>> {
        self.expect_state(id, AgentState::Eating, AgentState::Thinking)?;
        let ready = self.pay_back(ring, id)?;
        self.set_state(id, AgentState::Thinking);
        Ok(ready)
    }

    fn abandon(&mut self, ring: &Ring, id: AgentId) -> DpResult<Vec<AgentId>> {
        match self.record(id).state {
            AgentState::Thinking => Ok(Vec::new()),
            AgentState::Eating => self.release(ring, id),
            AgentState::Hungry => {
                let ready = self.pay_back(ring, id)?;
                let me = &mut self.agents[id.index()];
                let retracted = me.pending;
                me.pending = 0;
                me.awaiting.clear();
                self.ledger.retractions += u64::from(retracted);
                warn!(philosopher = %id, retracted, "hungry philosopher left the table");
                self.set_state(id, AgentState::Thinking);
                Ok(ready)
            }
        }
    }
}

// ── SharedTable ───────────────────────────────────────────────────────────────

/// The ring of philosophers and the single lock that guards all of them.
///
/// Created once by the coordinator and shared with every philosopher thread
/// through an `Arc`.  All cross-agent reads and writes go through the methods
/// below; no philosopher ever reaches into a neighbor's record directly.
///
/// Each philosopher parks on its own condvar, always paired with the one
/// table mutex.
pub struct SharedTable<O: TransitionObserver> {
    ring:  Ring,
    state: Mutex<TableState<O>>,
    ready: Vec<Condvar>,
}

impl<O: TransitionObserver> SharedTable<O> {
    /// Seat everyone as thinking with nothing pending.
    pub fn new(ring: Ring, observer: O) -> Self {
        let agents = ring.ids().map(|_| AgentRecord::default()).collect();
        let ready = ring.ids().map(|_| Condvar::new()).collect();
        Self {
            ring,
            state: Mutex::new(TableState {
                agents,
                ledger: Ledger::default(),
                stopping: false,
                observer,
            }),
            ready,
        }
    }

    #[inline]
    pub fn ring(&self) -> Ring {
        self.ring
    }

    fn lock(&self) -> MutexGuard<'_, TableState<O>> {
        self.state.lock().unwrap_or_else(|poisoned| {
            error!("table lock poisoned by a panicking philosopher");
            poisoned.into_inner()
        })
    }

    fn notify(&self, ready: &[AgentId]) {
        for n in ready {
            self.ready[n.index()].notify_one();
        }
    }

    // ── Protocol operations ───────────────────────────────────────────────

    /// Reserve the seat at `id` for one lifecycle.
    ///
    /// A seat is claimed at most once per table; a second claim is
    /// [`DpError::SeatTaken`].
    pub fn claim_seat(&self, id: AgentId) -> DpResult<()> {
        let id = self.ring.check(id)?;
        self.lock().claim_seat(id)
    }

    /// Become hungry: count the neighbors that are not thinking.
    ///
    /// Returns the snapshot count.  Zero means the philosopher may eat
    /// without waiting.
    pub fn request(&self, id: AgentId) -> DpResult<u32> {
        let id = self.ring.check(id)?;
        self.lock().request(&self.ring, id)
    }

    /// Block until every counted neighbor has rested, then start eating.
    ///
    /// The pending check and the wait are atomic with respect to the table
    /// lock, so a release that lands between `request` and this call is
    /// never lost.  Returns [`Permission::Cancelled`] if the table shuts down
    /// while the philosopher is still blocked.
    pub fn await_permission(&self, id: AgentId) -> DpResult<Permission> {
        let id = self.ring.check(id)?;
        let mut table = self.lock();
        table.expect_state(id, AgentState::Hungry, AgentState::Eating)?;

        while table.record(id).pending != 0 && !table.stopping {
            table = self.ready[id.index()]
                .wait(table)
                .unwrap_or_else(PoisonError::into_inner);
        }

        if table.try_begin_eating(id)? {
            Ok(Permission::Granted)
        } else {
            Ok(Permission::Cancelled)
        }
    }

    /// Non-blocking form of [`await_permission`](Self::await_permission):
    /// start eating iff nothing is pending.
    pub fn try_begin_eating(&self, id: AgentId) -> DpResult<bool> {
        let id = self.ring.check(id)?;
        self.lock().try_begin_eating(id)
    }

    /// Stop eating: pay back every neighbor that counted this philosopher,
    /// wake those whose count reaches zero, and go back to thinking.
    pub fn release(&self, id: AgentId) -> DpResult<()> {
        let id = self.ring.check(id)?;
        let mut table = self.lock();
        let ready = table.release(&self.ring, id)?;
        self.notify(&ready);
        Ok(())
    }

    /// Leave the table from any state.
    ///
    /// Thinking is a no-op and eating is a normal release.  A hungry
    /// philosopher pays back the neighbors that counted it and drops the
    /// counts it still holds against its own neighbors, so nobody is left
    /// waiting on a philosopher that will never eat.
    pub fn abandon(&self, id: AgentId) -> DpResult<()> {
        let id = self.ring.check(id)?;
        let mut table = self.lock();
        let ready = table.abandon(&self.ring, id)?;
        self.notify(&ready);
        Ok(())
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Raise the stop flag and wake every parked philosopher.
    pub fn shutdown(&self) {
        let mut table = self.lock();
        table.stopping = true;
        for cv in &self.ready {
            cv.notify_all();
        }
    }

    pub fn is_stopping(&self) -> bool {
        self.lock().stopping
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// A consistent copy of every philosopher's protocol state.
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        let table = self.lock();
        self.ring
            .ids()
            .map(|id| {
                let rec = table.record(id);
                AgentSnapshot {
                    id,
                    state:    rec.state,
                    pending:  rec.pending,
                    awaiting: rec.awaiting.clone(),
                }
            })
            .collect()
    }

    pub fn ledger(&self) -> Ledger {
        self.lock().ledger
    }

    /// Run `f` against the observer under the table lock.
    pub fn with_observer<R>(&self, f: impl FnOnce(&mut O) -> R) -> R {
        f(&mut self.lock().observer)
    }

    /// Consume the table and hand back its observer.
    pub fn into_observer(self) -> O {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .observer
    }
}

// ── Pairing guard ─────────────────────────────────────────────────────────────

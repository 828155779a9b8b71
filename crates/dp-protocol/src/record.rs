//! Plain data types exchanged with the shared table.

use dp_core::{AgentId, AgentState, DpError, DpResult};

/// Outcome of [`SharedTable::await_permission`][crate::SharedTable::await_permission].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Permission {
    /// Every counted neighbor has rested; the philosopher is now eating.
    Granted,
    /// The table is shutting down and the philosopher was still blocked.
    /// It is still hungry and must [`abandon`][crate::SharedTable::abandon].
    Cancelled,
}

/// One philosopher's protocol state, copied out under the lock.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AgentSnapshot {
    pub id:       AgentId,
    pub state:    AgentState,
    pub pending:  u32,
    /// Neighbors whose increments are still included in `pending`.
    pub awaiting: Vec<AgentId>,
}

/// Running totals of counter traffic.
///
/// At every instant `increments == decrements + retractions + Σ pending`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Ledger {
    /// Busy neighbors counted by `request`.
    pub increments:  u64,
    /// Counts paid back by a neighbor's `release` (or forced release).
    pub decrements:  u64,
    /// Counts dropped by a hungry philosopher that abandoned its request.
    pub retractions: u64,
}

impl Ledger {
    /// Increments not yet matched by a decrement or retraction.
    ///
    /// More matches than increments means a counter was paid back twice;
    /// that is reported as [`DpError::LedgerInconsistent`].
    pub fn outstanding(&self) -> DpResult<u64> {
        let matched = self.decrements.saturating_add(self.retractions);
        self.increments
            .checked_sub(matched)
            .ok_or(DpError::LedgerInconsistent { increments: self.increments, matched })
    }

    /// `true` when every increment has been matched, and no more.
    pub fn is_balanced(&self) -> bool {
        matches!(self.outstanding(), Ok(0))
    }
}

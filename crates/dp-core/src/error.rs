//! Framework error type.
//!
//! `dp-table` and `dp-output` define their own error enums and wrap `DpError`
//! as one variant.

use thiserror::Error;

use crate::{AgentId, AgentState};

/// The top-level error type for `dp-core` and the protocol.
#[derive(Debug, Error)]
pub enum DpError {
    #[error("a ring needs at least 2 philosophers, got {size}")]
    RingTooSmall { size: usize },

    #[error("philosopher {id} is not seated at a table of {size}")]
    AgentOutOfRange { id: AgentId, size: usize },

    #[error("philosopher {id} cannot go from {from} to {to}")]
    IllegalTransition {
        id:   AgentId,
        from: AgentState,
        to:   AgentState,
    },

    /// A release tried to decrement a counter it never incremented.  This
    /// breaks the increment/decrement pairing and is never recoverable.
    #[error("pending count of philosopher {id} would underflow on release by {neighbor}")]
    CounterUnderflow { id: AgentId, neighbor: AgentId },

    /// A second lifecycle tried to drive a seat that already has one.
    #[error("seat of philosopher {id} is already taken")]
    SeatTaken { id: AgentId },

    #[error("ledger out of balance: {matched} counts matched but only {increments} taken")]
    LedgerInconsistent { increments: u64, matched: u64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `dp-*` crates.
pub type DpResult<T> = Result<T, DpError>;

//! Transition observer trait.
//!
//! The shared table calls the observer while it still holds the lock, so the
//! order in which an observer sees transitions is the order in which they
//! happened.  Implementations must not block for long and must never call
//! back into the table.

use dp_core::{AgentId, AgentState};

/// One state change of one philosopher.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Transition {
    pub id:    AgentId,
    pub state: AgentState,
}

/// Callbacks invoked by [`SharedTable`][crate::SharedTable] on every state
/// change.
///
/// # Example — counting meals
///
/// ```rust
/// use dp_core::{AgentId, AgentState};
/// use dp_protocol::TransitionObserver;
///
/// struct MealCounter(u64);
///
/// impl TransitionObserver for MealCounter {
///     fn on_transition(&mut self, _id: AgentId, state: AgentState) {
///         if state == AgentState::Eating {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait TransitionObserver: Send {
    /// Called once per transition, in linearization order.
    fn on_transition(&mut self, id: AgentId, state: AgentState);
}

/// An observer that does nothing.
pub struct NoopObserver;

impl TransitionObserver for NoopObserver {
    fn on_transition(&mut self, _id: AgentId, _state: AgentState) {}
}

/// Keeps every transition in memory.  Used by tests and by the validator
/// round-trip.
#[derive(Default, Debug)]
pub struct RecordingObserver {
    pub transitions: Vec<Transition>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransitionObserver for RecordingObserver {
    fn on_transition(&mut self, id: AgentId, state: AgentState) {
        self.transitions.push(Transition { id, state });
    }
}

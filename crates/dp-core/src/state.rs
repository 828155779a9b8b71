//! Agent lifecycle states.
//!
//! The generic protocol names are RESTING / WAITING / ACTIVE; the table uses
//! the classic names because they are what the transition log prints.
//!
//! ```text
//!   Thinking ──request──▶ Hungry ──permission──▶ Eating
//!      ▲                                            │
//!      └──────────────────release───────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use crate::DpError;

/// Lifecycle state of one agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    /// Resting.  Holds no claim on either neighbor.
    #[default]
    Thinking,
    /// Waiting for every counted neighbor to rest.
    Hungry,
    /// Using both shared resources.
    Eating,
}

impl AgentState {
    pub const ALL: [AgentState; 3] = [AgentState::Thinking, AgentState::Hungry, AgentState::Eating];

    /// The upper-case label printed in transition log lines.
    pub fn label(self) -> &'static str {
        match self {
            AgentState::Thinking => "THINKING",
            AgentState::Hungry   => "HUNGRY",
            AgentState::Eating   => "EATING",
        }
    }

    /// `true` for `Thinking`.  A neighbor that is not thinking must be waited on.
    #[inline]
    pub fn is_thinking(self) -> bool {
        matches!(self, AgentState::Thinking)
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgentState {
    type Err = DpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentState::ALL
            .into_iter()
            .find(|state| state.label() == s)
            .ok_or_else(|| DpError::Parse(format!("unknown state {s:?}")))
    }
}

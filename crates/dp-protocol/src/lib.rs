//! `dp-protocol` — the fork protocol shared by every philosopher.
//!
//! # Algorithm
//!
//! ```text
//! request(i):   under the lock
//!                 for each neighbor n not THINKING: pending[i] += 1
//!                 state[i] = HUNGRY
//! await(i):     under the lock
//!                 while pending[i] != 0: wait on ready[i]
//!                 state[i] = EATING
//! release(i):   under the lock
//!                 for each neighbor n not THINKING:
//!                   pending[n] -= 1; if pending[n] == 0: notify ready[n]
//!                 state[i] = THINKING
//! ```
//!
//! The count is a snapshot taken when the philosopher gets hungry, never
//! recomputed.  Every increment made by `request(i)` for neighbor `n` is
//! paid back by exactly one decrement in `release(n)`: a neighbor that is not
//! thinking when `n` releases has necessarily counted `n`.  Philosophers who
//! got hungry earlier eat first, so there is no cycle of waiters.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`table`]       | `SharedTable` (one mutex + one condvar per agent)       |
//! | [`record`]      | `AgentSnapshot`, `Ledger`, `Permission`                 |
//! | [`observer`]    | `TransitionObserver`, `Transition`, stock observers     |

pub mod observer;
pub mod record;
pub mod table;


pub use observer::{NoopObserver, RecordingObserver, Transition, TransitionObserver};
pub use record::{AgentSnapshot, Ledger, Permission};
pub use table::SharedTable;

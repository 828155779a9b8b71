//! `dp-table` — the coordinator that seats philosophers and runs them.
//!
//! # Lifecycle of one philosopher
//!
//! ```text
//! loop until stopped or max_meals reached:
//!   ① think      — sleep a random `think_ms` duration (outside the lock)
//!   ② request    — count busy neighbors, become HUNGRY
//!   ③ await      — park on own condvar until the count is zero → EATING
//!                  (a shutdown while parked abandons the request)
//!   ④ eat        — sleep a random `eat_ms` duration (outside the lock)
//!   ⑤ release    — pay back neighbors, become THINKING
//! ```
//!
//! Each philosopher runs on its own OS thread named `philosopher-<id>`.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dp_core::TableConfig;
//! use dp_table::TableBuilder;
//!
//! let table = TableBuilder::new(TableConfig::with_ring_size(5))
//!     .observer(my_observer)
//!     .build()?;
//! let running = table.start()?;
//! running.shutdown_handle().shutdown();
//! let report = running.await_termination()?;
//! ```

pub mod builder;
pub mod error;
pub mod philosopher;
pub mod table;

#[cfg(test)]
mod tests;

pub use builder::TableBuilder;
pub use error::{TableError, TableResult};
pub use philosopher::{AgentHandle, AgentSummary, Philosopher};
pub use table::{RunReport, RunningTable, ShutdownHandle, Table};

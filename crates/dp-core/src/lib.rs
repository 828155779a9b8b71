//! `dp-core` — foundational types for the `rust_dp` dining table.
//!
//! This crate is a dependency of every other `dp-*` crate.  It has no `dp-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`state`]       | `AgentState` (THINKING / HUNGRY / EATING)             |
//! | [`ring`]        | `Ring`, `Neighbors` — cyclic adjacency                |
//! | [`rng`]         | `AgentRng` (per-agent, deterministic)                 |
//! | [`config`]      | `TableConfig`, `DurationRange`                        |
//! | [`error`]       | `DpError`, `DpResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, states and config.  |

pub mod config;
pub mod error;
pub mod ids;
pub mod ring;
pub mod rng;
pub mod state;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DurationRange, TableConfig};
pub use error::{DpError, DpResult};
pub use ids::AgentId;
pub use ring::{Neighbors, Ring};
pub use rng::AgentRng;
pub use state::AgentState;

//! Table configuration.
//!
//! Defaults reproduce the classic setup: five philosophers, each thinking and
//! eating for 1–2 seconds per cycle, forever.

use crate::{DpError, DpResult, Ring};

// ── DurationRange ─────────────────────────────────────────────────────────────

/// An inclusive range of milliseconds to sleep for.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DurationRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DurationRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// A range that always yields `ms`.
    pub const fn fixed(ms: u64) -> Self {
        Self { min_ms: ms, max_ms: ms }
    }
}

// ── TableConfig ───────────────────────────────────────────────────────────────

/// Top-level run configuration, passed to the table builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableConfig {
    /// Number of philosophers around the table.  Must be at least 2.
    pub ring_size: usize,

    /// Master RNG seed.  The same seed always produces the same per-agent
    /// think/eat schedule (the interleaving still depends on the OS).
    pub seed: u64,

    /// How long one think phase lasts.
    pub think_ms: DurationRange,

    /// How long one meal lasts.
    pub eat_ms: DurationRange,

    /// Stop each agent after this many meals.  `None` runs until shutdown.
    pub max_meals: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            ring_size: 5,
            seed:      0,
            think_ms:  DurationRange::new(1_000, 2_000),
            eat_ms:    DurationRange::new(1_000, 2_000),
            max_meals: None,
        }
    }
}

impl TableConfig {
    /// Default configuration for a ring of `ring_size` philosophers.
    pub fn with_ring_size(ring_size: usize) -> Self {
        Self { ring_size, ..Self::default() }
    }

    /// Check every field and return the ring the config describes.
    pub fn validate(&self) -> DpResult<Ring> {
        let ring = Ring::new(self.ring_size)?;
        for (what, range) in [("think", self.think_ms), ("eat", self.eat_ms)] {
            if range.min_ms > range.max_ms {
                return Err(DpError::Config(format!(
                    "{what} range is empty: {}..={} ms",
                    range.min_ms, range.max_ms
                )));
            }
        }
        if self.max_meals == Some(0) {
            return Err(DpError::Config("max_meals must be at least 1".into()));
        }
        Ok(ring)
    }
}

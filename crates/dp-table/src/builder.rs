//! Fluent builder for constructing a [`Table`].

use std::sync::Arc;

use dp_core::TableConfig;
use dp_protocol::{NoopObserver, SharedTable, TransitionObserver};

use crate::{Table, TableResult};

/// Fluent builder for [`Table<O>`].
///
/// # Inputs
///
/// | Method           | Default                          |
/// |------------------|----------------------------------|
/// | `new(config)`    | required                         |
/// | `.observer(o)`   | [`NoopObserver`]                 |
///
/// # Example
///
/// ```rust,ignore
/// let table = TableBuilder::new(TableConfig::with_ring_size(5))
///     .observer(LogSink::stdout())
///     .build()?;
/// ```
pub struct TableBuilder<O: TransitionObserver> {
    config:   TableConfig,
    observer: O,
}

impl TableBuilder<NoopObserver> {
    /// Create a builder whose transitions go nowhere.
    pub fn new(config: TableConfig) -> Self {
        Self { config, observer: NoopObserver }
    }
}

impl<O: TransitionObserver + 'static> TableBuilder<O> {
    /// Send every transition to `observer`.
    pub fn observer<P: TransitionObserver + 'static>(self, observer: P) -> TableBuilder<P> {
        TableBuilder { config: self.config, observer }
    }

    /// Validate the configuration and seat everyone at a fresh shared table.
    ///
    /// Fails before any thread starts if the ring is smaller than two or a
    /// duration range is empty.
    pub fn build(self) -> TableResult<Table<O>> {
        let ring = self.config.validate()?;
        let shared = Arc::new(SharedTable::new(ring, self.observer));
        Ok(Table { config: self.config, shared })
    }
}

use dp_core::{AgentId, DpError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("protocol error: {0}")]
    Protocol(#[from] DpError),

    #[error("could not start philosopher {id}: {source}")]
    Spawn {
        id:     AgentId,
        #[source]
        source: std::io::Error,
    },

    #[error("philosopher {id} panicked")]
    AgentPanicked { id: AgentId },

    #[error("table is still referenced after every philosopher left")]
    TableInUse,
}

pub type TableResult<T> = Result<T, TableError>;

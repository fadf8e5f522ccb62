use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The backing store could not be opened or brought to the current layout.
    #[error("failed to open store at {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A read or write transaction errored or was rolled back.
    #[error("transaction failed: {0}")]
    TransactionFailed(#[from] rusqlite::Error),

    /// A platform reorder did not name every existing platform exactly once.
    #[error("platform count mismatch: expected {expected} distinct platforms, got {found}")]
    CountMismatch { expected: usize, found: usize },

    #[error("cannot delete the last remaining platform")]
    LastPlatform,

    #[error("malformed import: {0}")]
    MalformedImport(String),

    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

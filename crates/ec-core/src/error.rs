//! Error types for the catalog engine.

use thiserror::Error;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the catalog engine.
///
/// Local invariant violations (missing id, wrong kind, empty source) are
/// *not* errors: they are healed by normalization. Errors here are the
/// recoverable failures the caller must surface: storage trouble and
/// malformed import payloads.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The stored payload for a slot failed to parse.
    /// Callers degrade to an empty catalog instead of aborting startup.
    #[error("corrupt data in storage slot \"{key}\": {source}")]
    CorruptStore {
        /// The storage slot that held the bad payload.
        key: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing a storage slot failed at the I/O level.
    /// The in-memory catalog still reflects the attempted mutation.
    #[error("storage I/O failure on slot \"{key}\": {source}")]
    StoreIo {
        /// The storage slot involved.
        key: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing records for storage or export failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A positional operation referenced an index past the end of the list.
    #[error("record index {index} out of bounds (catalog holds {len})")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The catalog length at the time of the call.
        len: usize,
    },

    /// An import payload parsed as JSON but was not a top-level array.
    #[error("import payload must be a JSON array of records")]
    ImportNotArray,

    /// An import payload was not valid JSON, or an element was not a record.
    #[error("import payload could not be parsed: {0}")]
    ImportParse(#[source] serde_json::Error),
}

//! Error types for the reconciliation engine.

use thiserror::Error;

use crate::remote::RemoteError;

/// Alias for `Result<T, SyncError>`.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while reconciling with a remote store.
///
/// Remote failures are always surfaced to the user; local state that was
/// already changed before the failure (a local delete, a merge already
/// staged) is never rolled back.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A remote call failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// A local catalog operation failed (usually a persist).
    #[error(transparent)]
    Core(#[from] ec_core::CoreError),

    /// A cascade delete was requested for a record the active identity
    /// does not own.
    #[error("record \"{name}\" is owned by another identity and cannot be deleted remotely")]
    NotOwner {
        /// The record's display name.
        name: String,
    },
}

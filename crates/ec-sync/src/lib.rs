//! Reconciliation engine for Encounter Codex.
//!
//! Sits beside the `ec-core` catalogs: merges batches of externally
//! sourced records into them (file imports, remote snapshots) and pushes
//! locally owned records outward. Identity comes from the external auth
//! boundary as an opaque [`ec_core::UserId`]; this crate only compares it
//! for equality when deciding what may be pushed or remotely deleted.

/// Error types for reconciliation.
pub mod error;
/// Outbound push and the remote delete cascade.
pub mod outbound;
/// Batch merge and remote pull.
pub mod reconcile;
/// The remote store contract and its implementations.
pub mod remote;

/// Re-export error types.
pub use error::{SyncError, SyncResult};
/// Re-export outbound operations.
pub use outbound::{PushReport, delete_remote, outbound_candidates, push};
/// Re-export merge operations.
pub use reconcile::{MergeReport, REMOTE_SOURCE, merge, pull};
/// Re-export the remote contract.
pub use remote::{FileRemote, MemoryRemote, RemoteError, RemoteRow, RemoteStore};

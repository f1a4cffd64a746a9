//! Core catalog engine for Encounter Codex: adversary/environment
//! records, durable local storage, and faceted filtering.
//!
//! This crate is the local-first half of the system. It knows nothing
//! about remote stores or identity; reconciliation against a shared
//! remote lives in `ec-sync`, and rendering is the consumer's job — the
//! catalog exposes records and a computed [`CatalogView`], nothing more.

/// Catalogs: per-kind record lists with durable backing and a live view.
pub mod catalog;
/// Error types used throughout the crate.
pub mod error;
/// Faceted filter/sort pipeline and its state types.
pub mod filter;
/// Transient runtime state (hp/stress/notes) kept apart from records.
pub mod overlay;
/// Entity records, identifiers, and normalization.
pub mod record;
/// Built-in seed records.
pub mod seed;
/// Synchronous keyed persistence of record lists.
pub mod store;

/// Re-export catalog types.
pub use catalog::{Catalog, CatalogConfig, CatalogWarning, parse_batch};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export filter types.
pub use filter::{CatalogView, Facet, FilterState, SortDirection, SortField, SortState};
/// Re-export record types.
pub use record::{NormalizeReport, Record, RecordId, RecordKind, UserId, normalize};
/// Re-export storage types.
pub use store::{FileStore, MemoryStore, StorageBackend};

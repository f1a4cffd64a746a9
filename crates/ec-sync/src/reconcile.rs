//! Merging externally sourced record batches into a catalog.
//!
//! Merge is id-keyed and last-writer-wins at the record level: an
//! incoming record wholesale-replaces the local record with the same id.
//! There is no per-field diffing and no timestamp comparison — write
//! contention on a shared store is expected to be low, and richer
//! conflict resolution is out of scope by design.

use std::fmt;

use ec_core::{Catalog, Record, RecordKind, normalize};

use crate::error::SyncResult;
use crate::remote::RemoteStore;

/// Default source tag for records that arrive from the shared remote.
pub const REMOTE_SOURCE: &str = "remote";

/// Per-item classification counters for one merge, reported to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Records appended because no local record carried their id.
    pub added: usize,
    /// Local records replaced wholesale by an incoming one with the same id.
    pub updated: usize,
    /// Records of the wrong kind for the target catalog. Not an error:
    /// both catalogs may share one feed, so mixed batches are expected.
    pub skipped: usize,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} updated, {} skipped",
            self.added, self.updated, self.skipped
        )
    }
}

/// Merge a batch into a catalog.
///
/// For each incoming record: a kind mismatch counts as skipped (a record
/// with no kind at all is assumed to be an adversary, which is how legacy
/// exports behave); otherwise the record is normalized — with
/// `default_source` filling an absent source tag — and matched against
/// the catalog *by id only*. Absent ids append, present ids replace.
///
/// The catalog persists once after the whole batch and recomputes its
/// view once. A persist failure is returned after the in-memory merge has
/// already been applied.
pub fn merge(
    catalog: &mut Catalog,
    batch: Vec<Record>,
    default_source: &str,
) -> SyncResult<MergeReport> {
    let mut report = MergeReport::default();

    for mut incoming in batch {
        let assumed_kind = incoming.kind.unwrap_or(RecordKind::Adversary);
        if assumed_kind != catalog.kind() {
            report.skipped += 1;
            continue;
        }

        if incoming.source.is_empty() {
            incoming.source = default_source.to_string();
        }
        let (healed, _) = normalize(incoming, catalog.kind());

        match catalog.find_by_id(healed.id) {
            Some(index) => {
                catalog.stage_put(Some(index), healed);
                report.updated += 1;
            }
            None => {
                catalog.stage_put(None, healed);
                report.added += 1;
            }
        }
    }

    catalog.commit()?;
    Ok(report)
}

/// Fetch the full remote snapshot and merge it into the catalog.
///
/// Each row is unwrapped into its record with the remote linkage stamped
/// on: `remote_id` from the row's primary key, `owner_id` from the row's
/// author. Rows of the other kind fall into the skipped counter as usual.
pub fn pull(catalog: &mut Catalog, remote: &dyn RemoteStore) -> SyncResult<MergeReport> {
    let rows = remote.fetch_all()?;
    let batch: Vec<Record> = rows
        .into_iter()
        .map(|row| {
            let mut record = row.data;
            record.remote_id = Some(row.id);
            record.owner_id = Some(row.author_id);
            record
        })
        .collect();
    merge(catalog, batch, REMOTE_SOURCE)
}

//! Outbound sync: pushing local records to the remote store and the
//! ownership-gated remote delete cascade.

use ec_core::{Catalog, Record, RecordId, UserId};

use crate::error::{SyncError, SyncResult};
use crate::remote::{RemoteRow, RemoteStore};

/// Outcome of one push, reported to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushReport {
    /// Rows upserted into the remote table.
    pub pushed: usize,
}

/// The records eligible for outbound sync under the given identity:
/// the catalog's uploadable subset minus anything owned by someone else
/// (a foreign record stays locally cached but is never re-uploaded).
///
/// Every candidate lacking a `remote_id` is assigned one here and the
/// assignment is written back into the catalog, so a retried push reuses
/// the same row id instead of creating a duplicate remote row.
pub fn outbound_candidates(catalog: &mut Catalog, identity: &UserId) -> SyncResult<Vec<Record>> {
    let indices: Vec<usize> = catalog
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_protected() && !r.is_foreign_to(identity))
        .map(|(i, _)| i)
        .collect();

    let mut assigned_any = false;
    for &index in &indices {
        if catalog.records()[index].remote_id.is_none() {
            let mut record = catalog.records()[index].clone();
            record.remote_id = Some(RecordId::new());
            catalog.stage_put(Some(index), record);
            assigned_any = true;
        }
    }
    if assigned_any {
        catalog.commit()?;
    }

    Ok(indices
        .into_iter()
        .map(|i| catalog.records()[i].clone())
        .collect())
}

/// Push the outbound candidates to the remote store as an upsert batch,
/// then stamp `owner_id` on the pushed local records.
pub fn push(
    catalog: &mut Catalog,
    remote: &mut dyn RemoteStore,
    identity: &UserId,
) -> SyncResult<PushReport> {
    let candidates = outbound_candidates(catalog, identity)?;
    if candidates.is_empty() {
        return Ok(PushReport::default());
    }

    let rows: Vec<RemoteRow> = candidates
        .iter()
        .map(|record| RemoteRow {
            // Candidates always carry a remote id by now; the local id is
            // the documented fallback for linkage-less records.
            id: record.remote_id.unwrap_or(record.id),
            name: record.name.clone(),
            data: record.clone(),
            author_id: identity.clone(),
        })
        .collect();
    let pushed = remote.upsert(rows)?;

    for candidate in &candidates {
        if let Some(index) = catalog.find_by_id(candidate.id) {
            let mut record = catalog.records()[index].clone();
            record.owner_id = Some(identity.clone());
            catalog.stage_put(Some(index), record);
        }
    }
    catalog.commit()?;

    Ok(PushReport { pushed })
}

/// Delete a record's remote row. Permitted only when the record is owned
/// by the active identity; the row key is the record's `remote_id`,
/// falling back to its local id.
///
/// This call is the *remote half* of a delete cascade: the caller removes
/// the local record separately, and a failure here must not reverse that
/// local delete — it is surfaced as a warning and the stores are allowed
/// to diverge.
pub fn delete_remote(
    record: &Record,
    remote: &mut dyn RemoteStore,
    identity: &UserId,
) -> SyncResult<()> {
    if record.owner_id.as_ref() != Some(identity) {
        return Err(SyncError::NotOwner {
            name: record.name.clone(),
        });
    }
    remote.delete(record.remote_id.unwrap_or(record.id))?;
    Ok(())
}

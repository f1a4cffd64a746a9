//! The remote store contract: one shared table of rows, fetched whole.
//!
//! The row's own `id` is its primary key (what a record stores as
//! `remote_id`); the record inside `data` keeps its own `id`, which is
//! the local merge key. Reads are full snapshots — no pagination, no
//! deltas. Writes are upsert batches keyed on the row id, full replace on
//! conflict. Deletion permissions are enforced server-side; the client's
//! only job is to not issue calls it knows are disallowed.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ec_core::{Record, RecordId, UserId};

/// Errors from the remote boundary.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The store could not be reached or read.
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the call (auth, permission, validation).
    #[error("remote store rejected the call: {0}")]
    Rejected(String),
}

/// One row of the shared table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRow {
    /// Row primary key. Stored locally as the record's `remote_id`.
    pub id: RecordId,
    /// Denormalized display name, for browsing the table directly.
    pub name: String,
    /// The full entity record, including its own (local) merge id.
    pub data: Record,
    /// Identity of the row's author.
    pub author_id: UserId,
}

/// The remote store seam. The hosted backend, the file-backed stand-in,
/// and the in-memory test double all implement this.
pub trait RemoteStore {
    /// Fetch the entire table as a snapshot.
    fn fetch_all(&self) -> Result<Vec<RemoteRow>, RemoteError>;

    /// Upsert a batch of rows keyed on the row id; existing rows are
    /// replaced wholesale. Returns the number of rows written.
    fn upsert(&mut self, rows: Vec<RemoteRow>) -> Result<usize, RemoteError>;

    /// Delete a row by primary key.
    fn delete(&mut self, id: RecordId) -> Result<(), RemoteError>;
}

/// In-memory remote for tests. Can be armed to fail the next call so the
/// not-rolled-back error paths are testable.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    rows: BTreeMap<RecordId, RemoteRow>,
    fail_with: Option<String>,
}

impl MemoryRemote {
    /// An empty remote table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with the given message.
    pub fn fail_with(&mut self, message: impl Into<String>) {
        self.fail_with = Some(message.into());
    }

    /// The current table contents, in row-id order.
    pub fn rows(&self) -> Vec<&RemoteRow> {
        self.rows.values().collect()
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn check(&self) -> Result<(), RemoteError> {
        match &self.fail_with {
            Some(message) => Err(RemoteError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

impl RemoteStore for MemoryRemote {
    fn fetch_all(&self) -> Result<Vec<RemoteRow>, RemoteError> {
        self.check()?;
        Ok(self.rows.values().cloned().collect())
    }

    fn upsert(&mut self, rows: Vec<RemoteRow>) -> Result<usize, RemoteError> {
        self.check()?;
        let written = rows.len();
        for row in rows {
            self.rows.insert(row.id, row);
        }
        Ok(written)
    }

    fn delete(&mut self, id: RecordId) -> Result<(), RemoteError> {
        self.check()?;
        match self.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RemoteError::Rejected(format!("no row with id {id}"))),
        }
    }
}

/// A remote table backed by a single shared JSON file. Stands in for the
/// hosted store when a group shares a synced folder instead of a server.
#[derive(Debug, Clone)]
pub struct FileRemote {
    path: PathBuf,
}

impl FileRemote {
    /// Use the given file as the shared table.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_rows(&self) -> Result<Vec<RemoteRow>, RemoteError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| RemoteError::Unavailable(e.to_string()))
    }

    fn write_rows(&self, rows: &[RemoteRow]) -> Result<(), RemoteError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| RemoteError::Unavailable(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(rows)
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| RemoteError::Unavailable(e.to_string()))
    }
}

impl RemoteStore for FileRemote {
    fn fetch_all(&self) -> Result<Vec<RemoteRow>, RemoteError> {
        self.read_rows()
    }

    fn upsert(&mut self, rows: Vec<RemoteRow>) -> Result<usize, RemoteError> {
        let mut table: BTreeMap<RecordId, RemoteRow> = self
            .read_rows()?
            .into_iter()
            .map(|row| (row.id, row))
            .collect();
        let written = rows.len();
        for row in rows {
            table.insert(row.id, row);
        }
        let rows: Vec<RemoteRow> = table.into_values().collect();
        self.write_rows(&rows)?;
        Ok(written)
    }

    fn delete(&mut self, id: RecordId) -> Result<(), RemoteError> {
        let mut rows = self.read_rows()?;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(RemoteError::Rejected(format!("no row with id {id}")));
        }
        self.write_rows(&rows)
    }
}

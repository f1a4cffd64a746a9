//! Transient per-record runtime state (current hp, stress, notes).
//!
//! This state belongs to a running encounter, not to the catalog: it is
//! keyed by record id, composed with the record at render time, and never
//! persisted with the record list. Older payloads that carried it inside
//! records are cleaned up by [`crate::record::normalize`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::{Record, RecordId};

/// Mutable runtime counters and notes for one record on the board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeState {
    /// Hit points currently marked.
    pub current_hp: u32,
    /// Stress currently marked.
    pub current_stress: u32,
    /// Free-text table note.
    pub note: String,
}

/// Runtime state for every record in play, keyed by record id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeOverlay {
    states: HashMap<RecordId, RuntimeState>,
}

impl RuntimeOverlay {
    /// An empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// The state for a record, if any has been recorded.
    pub fn state(&self, id: RecordId) -> Option<&RuntimeState> {
        self.states.get(&id)
    }

    /// The state for a record, created zeroed on first access.
    pub fn state_mut(&mut self, id: RecordId) -> &mut RuntimeState {
        self.states.entry(id).or_default()
    }

    /// Set marked hit points, clamped to the record's maximum.
    pub fn set_hp(&mut self, record: &Record, value: u32) {
        self.state_mut(record.id).current_hp = value.min(record.hit_points);
    }

    /// Set marked stress, clamped to the record's maximum.
    pub fn set_stress(&mut self, record: &Record, value: u32) {
        self.state_mut(record.id).current_stress = value.min(record.stress);
    }

    /// Re-clamp stored counters after a record edit changed its maxima.
    pub fn reconcile(&mut self, record: &Record) {
        if let Some(state) = self.states.get_mut(&record.id) {
            state.current_hp = state.current_hp.min(record.hit_points);
            state.current_stress = state.current_stress.min(record.stress);
        }
    }

    /// Drop state for a record that left the board.
    pub fn remove(&mut self, id: RecordId) -> Option<RuntimeState> {
        self.states.remove(&id)
    }

    /// Drop state for every record not in the given id set.
    pub fn retain_ids<'a>(&mut self, live: impl IntoIterator<Item = &'a RecordId>) {
        let live: std::collections::HashSet<RecordId> = live.into_iter().copied().collect();
        self.states.retain(|id, _| live.contains(id));
    }
}

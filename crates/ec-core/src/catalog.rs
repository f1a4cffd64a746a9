//! The authoritative in-memory record list for one entity kind, with
//! durable backing and an always-current filtered view.

use thiserror::Error;

use crate::error::{CoreError, CoreResult};
use crate::filter::{self, CatalogView, Facet, FilterState, SortField, SortState};
use crate::record::{self, Record, RecordId, RecordKind, NormalizeReport};
use crate::seed;
use crate::store::StorageBackend;

/// Configuration value object for a catalog. One generic [`Catalog`]
/// parameterized by this replaces per-kind subclassing.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Storage slot the record list persists under.
    pub storage_key: String,
    /// The entity kind this catalog owns. Records of any other kind are
    /// coerced on save and skipped on merge.
    pub kind: RecordKind,
    /// Source tags pre-selected in the source facet when the catalog
    /// opens. Stale entries are pruned on the first recompute.
    pub default_sources: Vec<String>,
}

impl CatalogConfig {
    /// The standard adversary catalog configuration.
    pub fn adversary() -> Self {
        Self {
            storage_key: "adversary_catalog".to_string(),
            kind: RecordKind::Adversary,
            default_sources: vec![seed::SEED_SOURCE.to_string()],
        }
    }

    /// The standard environment catalog configuration.
    pub fn environment() -> Self {
        Self {
            storage_key: "environment_catalog".to_string(),
            kind: RecordKind::Environment,
            default_sources: vec![seed::SEED_SOURCE.to_string()],
        }
    }

    /// The standard configuration for a kind.
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Adversary => Self::adversary(),
            RecordKind::Environment => Self::environment(),
        }
    }
}

/// Recoverable conditions noticed while opening or mutating a catalog.
/// Returned to the consumer for display; the engine itself never prints.
#[derive(Debug, Clone, Error)]
pub enum CatalogWarning {
    /// The storage slot held unparseable data; the catalog started empty.
    #[error("stored data for \"{key}\" was unreadable and has been reset: {detail}")]
    StoreHealed {
        /// The affected storage slot.
        key: String,
        /// Description of the parse failure.
        detail: String,
    },

    /// A loaded record carried a foreign or missing kind and was coerced.
    #[error("record \"{name}\" had a mismatched kind and was coerced to {kind}")]
    KindCoerced {
        /// The record's display name.
        name: String,
        /// The kind it now carries.
        kind: RecordKind,
    },

    /// A persist attempt failed; the in-memory list is ahead of storage.
    #[error("could not persist catalog \"{key}\": {detail}")]
    PersistFailed {
        /// The affected storage slot.
        key: String,
        /// Description of the failure.
        detail: String,
    },
}

/// One catalog: records of a single kind, their filter/sort state, and
/// the computed view. Every mutation persists write-through and
/// recomputes the view.
pub struct Catalog {
    config: CatalogConfig,
    store: Box<dyn StorageBackend>,
    records: Vec<Record>,
    filters: FilterState,
    sort: SortState,
    view: CatalogView,
}

impl Catalog {
    /// Open a catalog: load from storage, heal what loads, seed the
    /// built-in set if the slot was empty, and compute the initial view.
    ///
    /// Never fails: unreadable storage degrades to the seed set and is
    /// reported in the returned warnings.
    pub fn open(config: CatalogConfig, store: Box<dyn StorageBackend>) -> (Self, Vec<CatalogWarning>) {
        let mut warnings = Vec::new();

        let loaded = match store.load(&config.storage_key) {
            Ok(records) => records,
            Err(err) => {
                warnings.push(CatalogWarning::StoreHealed {
                    key: config.storage_key.clone(),
                    detail: err.to_string(),
                });
                Vec::new()
            }
        };

        // Heal in memory only; the fixes reach disk with the next save,
        // as in the original tool.
        let mut records = Vec::with_capacity(loaded.len());
        for raw in loaded {
            let (healed, report) = record::normalize(raw, config.kind);
            if report.kind_coerced {
                warnings.push(CatalogWarning::KindCoerced {
                    name: healed.name.clone(),
                    kind: config.kind,
                });
            }
            records.push(healed);
        }

        let mut seeded = false;
        if records.is_empty() {
            records = seed::seed_records(config.kind);
            seeded = !records.is_empty();
        }

        let mut filters = FilterState::new();
        for source in &config.default_sources {
            filters.select(Facet::Source, source.clone());
        }

        let mut catalog = Self {
            config,
            store,
            records,
            filters,
            sort: SortState::default(),
            view: CatalogView::default(),
        };

        // First run with a seed persists immediately, so the catalog is
        // never observably empty on the next start.
        if seeded && let Err(err) = catalog.persist() {
            warnings.push(CatalogWarning::PersistFailed {
                key: catalog.config.storage_key.clone(),
                detail: err.to_string(),
            });
        }
        catalog.refresh();

        (catalog, warnings)
    }

    /// The kind this catalog owns.
    pub fn kind(&self) -> RecordKind {
        self.config.kind
    }

    /// The catalog's configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the catalog holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the first record whose name matches case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let lower = name.to_lowercase();
        self.records.iter().position(|r| r.name.to_lowercase() == lower)
    }

    /// Index of the record with the given id. Ids are the sole merge key;
    /// names may collide across sources intentionally.
    pub fn find_by_id(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// The current filtered, sorted view.
    pub fn view(&self) -> &CatalogView {
        &self.view
    }

    /// The records of the current view, in view order.
    pub fn filtered_records(&self) -> Vec<&Record> {
        self.view.rows.iter().map(|&i| &self.records[i]).collect()
    }

    /// Current filter state.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Current sort state.
    pub fn sort(&self) -> SortState {
        self.sort
    }

    /// Set the search term and recompute.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filters.search = term.into();
        self.refresh();
    }

    /// Toggle a facet value and recompute. Returns true if the value is
    /// now selected.
    pub fn toggle_facet(&mut self, facet: Facet, value: &str) -> bool {
        let selected = self.filters.toggle(facet, value);
        self.refresh();
        selected
    }

    /// Clear a facet's selections and recompute.
    pub fn clear_facet(&mut self, facet: Facet) {
        self.filters.clear(facet);
        self.refresh();
    }

    /// Replace the sort state outright. For callers that know the exact
    /// field and direction they want; [`Self::set_sort`] has the
    /// header-click toggle semantics instead.
    pub fn set_sort_state(&mut self, sort: SortState) {
        self.sort = sort;
        self.refresh();
    }

    /// Activate a sort field. Re-selecting the active field flips the
    /// direction; a new field starts ascending.
    pub fn set_sort(&mut self, field: SortField) {
        if self.sort.field == field {
            self.sort.direction = self.sort.direction.flipped();
        } else {
            self.sort = SortState {
                field,
                ..SortState::default()
            };
        }
        self.refresh();
    }

    /// Insert or replace a record: normalize, replace in place when `at`
    /// is a valid position (otherwise append), persist, recompute.
    ///
    /// A persist failure is returned as the error, but the in-memory
    /// mutation stands (best-effort persistence).
    pub fn upsert(&mut self, record: Record, at: Option<usize>) -> CoreResult<NormalizeReport> {
        let (healed, report) = record::normalize(record, self.config.kind);
        match at {
            Some(index) if index < self.records.len() => self.records[index] = healed,
            _ => self.records.push(healed),
        }
        self.commit()?;
        Ok(report)
    }

    /// Delete by position, persist, recompute, and return the removed
    /// record. The caller decides whether a remote cascade applies.
    pub fn remove(&mut self, index: usize) -> CoreResult<Record> {
        if index >= self.records.len() {
            return Err(CoreError::IndexOutOfBounds {
                index,
                len: self.records.len(),
            });
        }
        let removed = self.records.remove(index);
        self.commit()?;
        Ok(removed)
    }

    /// Records eligible for outbound sync: everything whose source is not
    /// a protected built-in tag. Ownership filtering against the active
    /// identity happens in the reconciliation layer.
    pub fn uploadable(&self) -> Vec<&Record> {
        self.records.iter().filter(|r| !r.is_protected()).collect()
    }

    /// Stage a record without persisting or recomputing: replace at a
    /// valid index, else append. Batch operations (merge, linkage
    /// stamping) stage any number of records and then [`Self::commit`]
    /// once.
    pub fn stage_put(&mut self, at: Option<usize>, record: Record) {
        match at {
            Some(index) if index < self.records.len() => self.records[index] = record,
            _ => self.records.push(record),
        }
    }

    /// Persist the full list and recompute the view. The recompute always
    /// happens, even when the persist fails.
    pub fn commit(&mut self) -> CoreResult<()> {
        let result = self.persist();
        self.refresh();
        result
    }

    /// Serialize the full record list as a pretty-printed JSON array.
    pub fn export_all(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Serialize the current filtered view as a pretty-printed JSON array.
    pub fn export_filtered(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.filtered_records())?)
    }

    fn persist(&mut self) -> CoreResult<()> {
        self.store.save(&self.config.storage_key, &self.records)
    }

    fn refresh(&mut self) {
        self.view = filter::recompute(&self.records, &mut self.filters, self.sort);
    }
}

/// Parse an import payload: the text must be a JSON array of records.
/// Anything else aborts the import with the catalog untouched.
pub fn parse_batch(text: &str) -> CoreResult<Vec<Record>> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(CoreError::ImportParse)?;
    let items = value.as_array().ok_or(CoreError::ImportNotArray)?;
    items
        .iter()
        .map(|item| serde_json::from_value(item.clone()).map_err(CoreError::ImportParse))
        .collect()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::record::CUSTOM_SOURCE;
    use crate::store::{FileStore, MemoryStore};

    fn open_adversaries(store: Box<dyn StorageBackend>) -> (Catalog, Vec<CatalogWarning>) {
        Catalog::open(CatalogConfig::adversary(), store)
    }

    #[test]
    fn empty_slot_loads_seed_set() {
        let (catalog, warnings) = open_adversaries(Box::new(MemoryStore::new()));
        assert!(!catalog.is_empty());
        assert!(warnings.is_empty());
        assert!(catalog.records().iter().all(|r| r.source == seed::SEED_SOURCE));
    }

    #[test]
    fn seed_set_persists_immediately() {
        let dir = TempDir::new().unwrap();
        let (catalog, _) = open_adversaries(Box::new(FileStore::new(dir.path())));
        let seeded = catalog.len();

        let (reopened, _) = open_adversaries(Box::new(FileStore::new(dir.path())));
        assert_eq!(reopened.len(), seeded);
    }

    #[test]
    fn corrupt_slot_degrades_with_warning() {
        let mut store = MemoryStore::new();
        store.insert_raw("adversary_catalog", "!! not json !!");
        let (catalog, warnings) = open_adversaries(Box::new(store));

        assert!(matches!(warnings[0], CatalogWarning::StoreHealed { .. }));
        // Healed to "no local data", then seeded as a first run.
        assert!(!catalog.is_empty());
    }

    #[test]
    fn loaded_records_are_healed_in_memory() {
        let mut store = MemoryStore::new();
        store.insert_raw(
            "adversary_catalog",
            r#"[{"name": "Mystery", "kind": "environment", "_note": "old"}]"#,
        );
        let (catalog, warnings) = open_adversaries(Box::new(store));

        let record = &catalog.records()[0];
        assert_eq!(record.kind, Some(RecordKind::Adversary));
        assert!(!record.id.is_nil());
        assert_eq!(record.source, CUSTOM_SOURCE);
        assert!(!record.extra.contains_key("_note"));
        assert!(warnings
            .iter()
            .any(|w| matches!(w, CatalogWarning::KindCoerced { .. })));
    }

    #[test]
    fn upsert_appends_and_replaces() {
        let (mut catalog, _) = open_adversaries(Box::new(MemoryStore::new()));
        let before = catalog.len();

        let goblin = Record::new(RecordKind::Adversary, "Goblin");
        catalog.upsert(goblin.clone(), None).unwrap();
        assert_eq!(catalog.len(), before + 1);

        let mut edited = goblin;
        edited.tier = 3;
        catalog.upsert(edited, Some(before)).unwrap();
        assert_eq!(catalog.len(), before + 1);
        assert_eq!(catalog.records()[before].tier, 3);
    }

    #[test]
    fn upsert_persists_write_through() {
        let dir = TempDir::new().unwrap();
        let (mut catalog, _) = open_adversaries(Box::new(FileStore::new(dir.path())));
        catalog
            .upsert(Record::new(RecordKind::Adversary, "Goblin"), None)
            .unwrap();

        let (reopened, _) = open_adversaries(Box::new(FileStore::new(dir.path())));
        assert!(reopened.find_by_name("Goblin").is_some());
    }

    #[test]
    fn remove_out_of_bounds_is_an_error() {
        let (mut catalog, _) = open_adversaries(Box::new(MemoryStore::new()));
        let err = catalog.remove(999).unwrap_err();
        assert!(matches!(err, CoreError::IndexOutOfBounds { .. }));
    }

    #[test]
    fn remove_returns_the_record() {
        let (mut catalog, _) = open_adversaries(Box::new(MemoryStore::new()));
        let name = catalog.records()[0].name.clone();
        let removed = catalog.remove(0).unwrap();
        assert_eq!(removed.name, name);
        assert!(catalog.find_by_name(&name).is_none());
    }

    #[test]
    fn uploadable_excludes_protected_sources() {
        let (mut catalog, _) = open_adversaries(Box::new(MemoryStore::new()));
        let mut voidling = Record::new(RecordKind::Adversary, "Voidling");
        voidling.source = "void".to_string();
        catalog.upsert(voidling, None).unwrap();
        catalog
            .upsert(Record::new(RecordKind::Adversary, "Goblin"), None)
            .unwrap();

        let uploadable = catalog.uploadable();
        assert_eq!(uploadable.len(), 1);
        assert_eq!(uploadable[0].name, "Goblin");
    }

    #[test]
    fn default_sources_preselect_the_source_facet() {
        let (mut catalog, _) = open_adversaries(Box::new(MemoryStore::new()));
        assert!(catalog.filters().selected(Facet::Source).contains("core"));

        // Custom records are hidden until the filter is widened.
        catalog
            .upsert(Record::new(RecordKind::Adversary, "Goblin"), None)
            .unwrap();
        assert!(catalog.filtered_records().iter().all(|r| r.source == "core"));

        catalog.clear_facet(Facet::Source);
        assert!(catalog
            .filtered_records()
            .iter()
            .any(|r| r.name == "Goblin"));
    }

    #[test]
    fn set_sort_toggles_direction_on_repeat() {
        let (mut catalog, _) = open_adversaries(Box::new(MemoryStore::new()));
        catalog.set_sort(SortField::Name);
        assert_eq!(catalog.sort().direction, crate::filter::SortDirection::Ascending);
        catalog.set_sort(SortField::Name);
        assert_eq!(catalog.sort().direction, crate::filter::SortDirection::Descending);
        catalog.set_sort(SortField::Tier);
        assert_eq!(catalog.sort().direction, crate::filter::SortDirection::Ascending);
    }

    #[test]
    fn set_sort_state_never_toggles() {
        let (mut catalog, _) = open_adversaries(Box::new(MemoryStore::new()));
        let sort = SortState {
            field: SortField::Tier,
            direction: crate::filter::SortDirection::Ascending,
        };
        // Tier is the default active field; setting it explicitly, even
        // repeatedly, must not flip the direction.
        catalog.set_sort_state(sort);
        catalog.set_sort_state(sort);
        assert_eq!(catalog.sort(), sort);
    }

    #[test]
    fn export_filtered_respects_the_view() {
        let (mut catalog, _) = open_adversaries(Box::new(MemoryStore::new()));
        catalog.clear_facet(Facet::Source);
        catalog.set_search("rat");
        let json = catalog.export_filtered().unwrap();
        let parsed: Vec<Record> = serde_json::from_str(&json).unwrap();
        assert!(!parsed.is_empty());
        assert!(parsed.iter().all(|r| r.name.to_lowercase().contains("rat")));
    }

    #[test]
    fn parse_batch_rejects_non_arrays() {
        assert!(matches!(
            parse_batch(r#"{"name": "Goblin"}"#),
            Err(CoreError::ImportNotArray)
        ));
        assert!(matches!(
            parse_batch("not json at all"),
            Err(CoreError::ImportParse(_))
        ));
        assert_eq!(parse_batch("[]").unwrap().len(), 0);
    }
}

//! Faceted filtering: result lists, cross-filtered option sets, selection
//! pruning, and sorting.
//!
//! The whole pipeline is recomputed from scratch on every catalog mutation
//! or filter change. For catalogs in the hundreds of records a full pass
//! is cheap, and full recomputation is what keeps the three facets and the
//! selection state mutually consistent.

use std::collections::BTreeSet;
use std::fmt;

use crate::record::Record;

/// Category prefix that collapses to a single facet option: every
/// "Cluster (...)" sub-type filters and displays as plain "Cluster".
pub const CLUSTER_FAMILY: &str = "Cluster";

/// A filterable dimension of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    /// Provenance tag.
    Source,
    /// Tier number (filtered as its decimal string).
    Tier,
    /// Category label, with the cluster family collapsed.
    Category,
}

impl Facet {
    /// All facets, in display order.
    pub const ALL: [Facet; 3] = [Facet::Source, Facet::Tier, Facet::Category];
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Tier => write!(f, "tier"),
            Self::Category => write!(f, "category"),
        }
    }
}

/// The value a record presents for a facet.
///
/// Tier uses its decimal rendering so all facet values are strings.
/// Categories in the cluster family collapse to [`CLUSTER_FAMILY`].
pub fn facet_value(record: &Record, facet: Facet) -> String {
    match facet {
        Facet::Source => record.source.clone(),
        Facet::Tier => record.tier.to_string(),
        Facet::Category => {
            if record.category.starts_with(CLUSTER_FAMILY) {
                CLUSTER_FAMILY.to_string()
            } else {
                record.category.clone()
            }
        }
    }
}

/// Active filter selections for one catalog.
///
/// An empty selection set for a facet means "no restriction". Selections
/// are pruned during recomputation: a selected value that no longer
/// appears among the facet's (cross-filtered) options is silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Case-insensitive substring match against record names.
    pub search: String,
    source: BTreeSet<String>,
    tier: BTreeSet<String>,
    category: BTreeSet<String>,
    // Facets in modification order, oldest first. Pruning walks it newest
    // first so a freshly made selection that contradicts established ones
    // is the one dropped.
    touched: Vec<Facet>,
}

impl FilterState {
    /// Empty state: no search term, no facet restrictions.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected values for a facet.
    pub fn selected(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Source => &self.source,
            Facet::Tier => &self.tier,
            Facet::Category => &self.category,
        }
    }

    fn selected_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Source => &mut self.source,
            Facet::Tier => &mut self.tier,
            Facet::Category => &mut self.category,
        }
    }

    /// Add a value to a facet's selection.
    pub fn select(&mut self, facet: Facet, value: impl Into<String>) {
        self.selected_mut(facet).insert(value.into());
        self.touch(facet);
    }

    /// Toggle a value; returns true if it is now selected.
    pub fn toggle(&mut self, facet: Facet, value: &str) -> bool {
        self.touch(facet);
        let set = self.selected_mut(facet);
        if set.remove(value) {
            false
        } else {
            set.insert(value.to_string());
            true
        }
    }

    fn touch(&mut self, facet: Facet) {
        self.touched.retain(|f| *f != facet);
        self.touched.push(facet);
    }

    fn prune_order(&self) -> Vec<Facet> {
        let mut order: Vec<Facet> = self.touched.iter().rev().copied().collect();
        for facet in Facet::ALL {
            if !order.contains(&facet) {
                order.push(facet);
            }
        }
        order
    }

    /// Drop every selection for a facet.
    pub fn clear(&mut self, facet: Facet) {
        self.selected_mut(facet).clear();
    }

    fn passes(&self, record: &Record, exclude: Option<Facet>) -> bool {
        if !self.search.is_empty()
            && !record
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase())
        {
            return false;
        }

        for facet in Facet::ALL {
            if Some(facet) == exclude {
                continue;
            }
            let selected = self.selected(facet);
            if !selected.is_empty() && !selected.contains(&facet_value(record, facet)) {
                return false;
            }
        }

        true
    }
}

/// The field a catalog is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    /// Record name (case-sensitive text).
    Name,
    /// Tier, compared numerically.
    #[default]
    Tier,
    /// Category label (raw, not cluster-collapsed).
    Category,
    /// Provenance tag.
    Source,
    /// Difficulty text.
    Difficulty,
}

impl SortField {
    /// Try to parse a field name as used on the CLI.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Self::Name),
            "tier" => Some(Self::Tier),
            "category" => Some(Self::Category),
            "source" => Some(Self::Source),
            "difficulty" => Some(Self::Difficulty),
            _ => None,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Tier => write!(f, "tier"),
            Self::Category => write!(f, "category"),
            Self::Source => write!(f, "source"),
            Self::Difficulty => write!(f, "difficulty"),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The active sort: one field plus a direction. Defaults to tier,
/// ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    /// Field being sorted on.
    pub field: SortField,
    /// Current direction.
    pub direction: SortDirection,
}

/// The computed output of the filter pipeline: the filtered, sorted rows
/// (as indices into the catalog's record list) and, per facet, the option
/// values still selectable given the *other* facets' selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogView {
    /// Indices of the surviving records, in sort order.
    pub rows: Vec<usize>,
    /// Selectable source values.
    pub source_options: Vec<String>,
    /// Selectable tier values, numerically ordered.
    pub tier_options: Vec<String>,
    /// Selectable category values (cluster family collapsed).
    pub category_options: Vec<String>,
}

impl CatalogView {
    /// The option list for a facet.
    pub fn options(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Source => &self.source_options,
            Facet::Tier => &self.tier_options,
            Facet::Category => &self.category_options,
        }
    }
}

fn compare(records: &[Record], a: usize, b: usize, sort: SortState) -> std::cmp::Ordering {
    let (ra, rb) = (&records[a], &records[b]);
    let ordering = match sort.field {
        SortField::Tier => ra.tier.cmp(&rb.tier),
        SortField::Name => ra.name.cmp(&rb.name),
        SortField::Category => ra.category.cmp(&rb.category),
        SortField::Source => ra.source.cmp(&rb.source),
        SortField::Difficulty => ra
            .difficulty
            .as_deref()
            .unwrap_or("")
            .cmp(rb.difficulty.as_deref().unwrap_or("")),
    };
    match sort.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

fn live_values(records: &[Record], filters: &FilterState, facet: Facet) -> BTreeSet<String> {
    let mut values = BTreeSet::new();
    for record in records.iter().filter(|r| filters.passes(r, Some(facet))) {
        values.insert(facet_value(record, facet));
    }
    values
}

/// Run the full pipeline: prune stale selections, then recompute every
/// facet's option set (each one ignoring its own constraint) and the
/// filtered, sorted row list against the pruned state.
///
/// Pruning walks the facets newest-modified first, validating each one
/// against the selections still standing on the others. A selection that
/// has just been made against the grain of established ones is therefore
/// the one dropped; the established selections survive.
pub fn recompute(records: &[Record], filters: &mut FilterState, sort: SortState) -> CatalogView {
    for facet in filters.prune_order() {
        let values = live_values(records, filters, facet);
        filters
            .selected_mut(facet)
            .retain(|value| values.contains(value));
    }

    let mut view = CatalogView::default();
    for facet in Facet::ALL {
        let mut options: Vec<String> = live_values(records, filters, facet).into_iter().collect();
        if facet == Facet::Tier {
            options.sort_by_key(|v| v.parse::<i64>().unwrap_or(0));
        }
        match facet {
            Facet::Source => view.source_options = options,
            Facet::Tier => view.tier_options = options,
            Facet::Category => view.category_options = options,
        }
    }

    let mut rows: Vec<usize> = (0..records.len())
        .filter(|&i| filters.passes(&records[i], None))
        .collect();
    // Vec::sort_by is stable: ties keep their insertion order, and a
    // reversed comparison still returns Equal for ties.
    rows.sort_by(|&a, &b| compare(records, a, b, sort));
    view.rows = rows;

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;

    fn record(name: &str, tier: u32, category: &str, source: &str) -> Record {
        let mut r = Record::new(RecordKind::Adversary, name);
        r.tier = tier;
        r.category = category.to_string();
        r.source = source.to_string();
        r
    }

    #[test]
    fn empty_filters_pass_everything() {
        let records = vec![record("Goblin", 1, "Standard", "core")];
        let mut filters = FilterState::new();
        let view = recompute(&records, &mut filters, SortState::default());
        assert_eq!(view.rows, vec![0]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let records = vec![
            record("Goblin Scout", 1, "Standard", "core"),
            record("Cave Ogre", 1, "Bruiser", "core"),
        ];
        let mut filters = FilterState::new();
        filters.search = "gOBLIN".to_string();
        let view = recompute(&records, &mut filters, SortState::default());
        assert_eq!(view.rows, vec![0]);
    }

    #[test]
    fn facet_selection_restricts_rows() {
        let records = vec![
            record("Goblin", 1, "Standard", "core"),
            record("Ogre", 2, "Bruiser", "custom"),
        ];
        let mut filters = FilterState::new();
        filters.select(Facet::Source, "custom");
        let view = recompute(&records, &mut filters, SortState::default());
        assert_eq!(view.rows, vec![1]);
    }

    #[test]
    fn cluster_family_collapses_to_one_option() {
        let records = vec![
            record("Rat Swarm", 1, "Cluster (Vermin)", "core"),
            record("Imp Flock", 1, "Cluster (Imps)", "core"),
            record("Ogre", 1, "Bruiser", "core"),
        ];
        let mut filters = FilterState::new();
        let view = recompute(&records, &mut filters, SortState::default());
        assert_eq!(view.category_options, vec!["Bruiser", "Cluster"]);

        filters.select(Facet::Category, "Cluster");
        let view = recompute(&records, &mut filters, SortState::default());
        assert_eq!(view.rows, vec![0, 1]);
    }

    #[test]
    fn options_exclude_own_facet_constraint() {
        let records = vec![
            record("Goblin", 1, "Standard", "core"),
            record("Ogre", 2, "Bruiser", "custom"),
        ];
        let mut filters = FilterState::new();
        filters.select(Facet::Source, "core");
        let view = recompute(&records, &mut filters, SortState::default());

        // The source facet still offers both values; the others are
        // narrowed by the active source selection.
        assert_eq!(view.source_options, vec!["core", "custom"]);
        assert_eq!(view.category_options, vec!["Standard"]);
        assert_eq!(view.tier_options, vec!["1"]);
    }

    #[test]
    fn stale_selections_are_pruned() {
        // Categories {A, B} and sources {X, Y}, where no X-sourced record
        // has category B: selecting source=X must clear category=B.
        let records = vec![
            record("One", 1, "A", "X"),
            record("Two", 1, "B", "Y"),
        ];
        let mut filters = FilterState::new();
        filters.select(Facet::Source, "X");
        filters.select(Facet::Category, "B");

        let view = recompute(&records, &mut filters, SortState::default());
        assert!(filters.selected(Facet::Category).is_empty());
        assert_eq!(view.category_options, vec!["A"]);
        assert_eq!(view.rows, vec![0]);
    }

    #[test]
    fn established_selection_outlives_a_conflicting_newer_one() {
        // Mirror image of the test above: category=B first, then a
        // source=X selection no category-B record carries. The newer
        // source selection is the one dropped.
        let records = vec![
            record("One", 1, "A", "X"),
            record("Two", 1, "B", "Y"),
        ];
        let mut filters = FilterState::new();
        filters.select(Facet::Category, "B");
        filters.select(Facet::Source, "X");

        let view = recompute(&records, &mut filters, SortState::default());
        assert!(filters.selected(Facet::Source).is_empty());
        assert!(filters.selected(Facet::Category).contains("B"));
        assert_eq!(view.rows, vec![1]);
    }

    #[test]
    fn tier_options_sort_numerically() {
        let records = vec![
            record("Ten", 10, "Standard", "core"),
            record("Two", 2, "Standard", "core"),
            record("One", 1, "Standard", "core"),
        ];
        let mut filters = FilterState::new();
        let view = recompute(&records, &mut filters, SortState::default());
        assert_eq!(view.tier_options, vec!["1", "2", "10"]);
    }

    #[test]
    fn tier_sort_is_stable() {
        // Inserted [C, A, B] all at tier 2: relative order survives.
        let records = vec![
            record("C", 2, "Standard", "core"),
            record("A", 2, "Standard", "core"),
            record("B", 2, "Standard", "core"),
        ];
        let mut filters = FilterState::new();
        let view = recompute(&records, &mut filters, SortState::default());
        assert_eq!(view.rows, vec![0, 1, 2]);
    }

    #[test]
    fn descending_sort_flips_direction_only() {
        let records = vec![
            record("Low", 1, "Standard", "core"),
            record("High", 3, "Standard", "core"),
            record("Mid", 2, "Standard", "core"),
        ];
        let mut filters = FilterState::new();
        let sort = SortState {
            field: SortField::Tier,
            direction: SortDirection::Descending,
        };
        let view = recompute(&records, &mut filters, sort);
        assert_eq!(view.rows, vec![1, 2, 0]);
    }

    #[test]
    fn name_sort_is_case_sensitive_text() {
        let records = vec![
            record("banshee", 1, "Standard", "core"),
            record("Azer", 1, "Standard", "core"),
            record("Bandit", 1, "Standard", "core"),
        ];
        let mut filters = FilterState::new();
        let sort = SortState {
            field: SortField::Name,
            direction: SortDirection::Ascending,
        };
        let view = recompute(&records, &mut filters, sort);
        // Uppercase sorts before lowercase in a case-sensitive compare.
        assert_eq!(view.rows, vec![1, 2, 0]);
    }

    #[test]
    fn toggle_and_clear() {
        let mut filters = FilterState::new();
        assert!(filters.toggle(Facet::Tier, "1"));
        assert!(!filters.toggle(Facet::Tier, "1"));
        filters.select(Facet::Tier, "2");
        filters.clear(Facet::Tier);
        assert!(filters.selected(Facet::Tier).is_empty());
    }
}

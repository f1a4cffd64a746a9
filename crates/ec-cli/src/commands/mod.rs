//! Shared plumbing for the subcommands.

pub mod add;
pub mod export;
pub mod import;
pub mod list;
pub mod pull;
pub mod push;
pub mod remove;
pub mod show;

use std::path::{Path, PathBuf};

use clap::Args;

pub use add::AddArgs;
use colored::Colorize;
use ec_core::{
    Catalog, CatalogConfig, Facet, FileStore, RecordKind, SortDirection, SortField, SortState,
};

/// Parse a `--kind` value.
pub fn parse_kind(s: &str) -> Result<RecordKind, String> {
    RecordKind::parse(s).ok_or_else(|| format!("unknown kind \"{s}\". Use: adversary, environment"))
}

/// Open the catalog for a kind, printing any recoverable warnings (healed
/// storage, coerced kinds) to stderr.
pub fn open_catalog(data_dir: &Path, kind: RecordKind) -> Catalog {
    let store = FileStore::new(data_dir);
    let (catalog, warnings) = Catalog::open(CatalogConfig::for_kind(kind), Box::new(store));
    for warning in warnings {
        eprintln!("  {} {warning}", "warning:".yellow().bold());
    }
    catalog
}

/// The shared JSON file standing in for the hosted remote table.
pub fn remote_path(data_dir: &Path, remote: Option<&Path>) -> PathBuf {
    match remote {
        Some(path) => path.to_path_buf(),
        None => data_dir.join("shared_codex.json"),
    }
}

/// Filter flags shared by `list` and `export`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Case-insensitive name search.
    #[arg(long)]
    pub search: Option<String>,

    /// Restrict to a tier (repeatable).
    #[arg(long = "tier")]
    pub tiers: Vec<String>,

    /// Restrict to a category (repeatable). "Cluster" matches the whole
    /// cluster family.
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Restrict to a source tag (repeatable).
    #[arg(long = "source")]
    pub sources: Vec<String>,
}

/// Apply filter flags to a freshly opened catalog. The catalog opens with
/// its default source selection; the CLI starts from "show everything"
/// and narrows by the given flags only.
pub fn apply_filters(catalog: &mut Catalog, args: &FilterArgs) {
    catalog.clear_facet(Facet::Source);
    if let Some(term) = &args.search {
        catalog.set_search(term.clone());
    }
    for tier in &args.tiers {
        catalog.toggle_facet(Facet::Tier, tier);
    }
    for category in &args.categories {
        catalog.toggle_facet(Facet::Category, category);
    }
    for source in &args.sources {
        catalog.toggle_facet(Facet::Source, source);
    }
}

/// Apply `--sort` / `--desc` flags. The flags name an exact state, so the
/// sort is set outright rather than through the header-click toggle
/// (which would flip direction for the already-active default field).
pub fn apply_sort(catalog: &mut Catalog, sort: Option<&str>, desc: bool) -> Result<(), String> {
    let field = match sort {
        Some(field_str) => SortField::parse(field_str).ok_or_else(|| {
            format!("unknown sort field \"{field_str}\". Use: name, tier, category, source, difficulty")
        })?,
        None => catalog.sort().field,
    };
    let direction = if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    catalog.set_sort_state(SortState { field, direction });
    Ok(())
}

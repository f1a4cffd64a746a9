//! The `list` subcommand: filtered, sorted catalog table.

use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use ec_core::Facet;

use super::FilterArgs;

/// Run `ec list`.
pub fn run(
    data_dir: &Path,
    kind: &str,
    filters: &FilterArgs,
    sort: Option<&str>,
    desc: bool,
) -> Result<(), String> {
    let kind = super::parse_kind(kind)?;
    let mut catalog = super::open_catalog(data_dir, kind);
    super::apply_filters(&mut catalog, filters);
    super::apply_sort(&mut catalog, sort, desc)?;

    let rows = catalog.filtered_records();
    if rows.is_empty() {
        println!("  No records match.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Tier", "Category", "Source", "Difficulty"]);
    for record in &rows {
        table.add_row(vec![
            record.name.clone(),
            record.tier.to_string(),
            record.category.clone(),
            record.source.clone(),
            record.difficulty.clone().unwrap_or_else(|| "—".to_string()),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} of {} records", rows.len(), catalog.len());

    let view = catalog.view();
    for facet in Facet::ALL {
        println!("  {facet}s available: {}", view.options(facet).join(", "));
    }

    Ok(())
}

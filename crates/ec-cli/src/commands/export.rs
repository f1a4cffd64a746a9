//! The `export` subcommand: write the record list as pretty JSON.

use std::path::Path;

use super::FilterArgs;

/// Run `ec export`. With filter flags the export covers the filtered
/// view; otherwise the whole catalog.
pub fn run(
    data_dir: &Path,
    kind: &str,
    filters: &FilterArgs,
    output: Option<&Path>,
) -> Result<(), String> {
    let kind = super::parse_kind(kind)?;
    let mut catalog = super::open_catalog(data_dir, kind);

    let filtered = filters.search.is_some()
        || !filters.tiers.is_empty()
        || !filters.categories.is_empty()
        || !filters.sources.is_empty();

    let content = if filtered {
        super::apply_filters(&mut catalog, filters);
        catalog.export_filtered().map_err(|e| e.to_string())?
    } else {
        catalog.export_all().map_err(|e| e.to_string())?
    };

    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
            println!("  Exported to {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

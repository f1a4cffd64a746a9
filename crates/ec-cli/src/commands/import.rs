//! The `import` subcommand: merge a JSON array of records from a file.

use std::fs;
use std::path::Path;

use colored::Colorize;
use ec_core::parse_batch;

/// Run `ec import`.
pub fn run(data_dir: &Path, kind: &str, file: &Path) -> Result<(), String> {
    let kind = super::parse_kind(kind)?;

    let text = fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    // Parse before touching the catalog: a malformed payload aborts with
    // the store unchanged.
    let batch = parse_batch(&text).map_err(|e| e.to_string())?;

    // The file stem tags records that carry no source of their own.
    let default_source = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("import")
        .to_string();

    let mut catalog = super::open_catalog(data_dir, kind);
    let report =
        ec_sync::merge(&mut catalog, batch, &default_source).map_err(|e| e.to_string())?;

    println!("  Import complete: {report}");
    if report.skipped > 0 {
        eprintln!(
            "  {} {} record(s) were of the wrong kind for this catalog",
            "note:".yellow().bold(),
            report.skipped
        );
    }
    Ok(())
}

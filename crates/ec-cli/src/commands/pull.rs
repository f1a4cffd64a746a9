//! The `pull` subcommand: fetch the remote snapshot and merge it in.

use std::path::Path;

use ec_sync::FileRemote;

/// Run `ec pull`.
pub fn run(data_dir: &Path, kind: &str, remote: Option<&Path>) -> Result<(), String> {
    let kind = super::parse_kind(kind)?;
    let mut catalog = super::open_catalog(data_dir, kind);
    let remote = FileRemote::new(super::remote_path(data_dir, remote));

    let report = ec_sync::pull(&mut catalog, &remote).map_err(|e| e.to_string())?;
    println!("  Pull complete: {report}");
    Ok(())
}

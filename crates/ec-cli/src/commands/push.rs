//! The `push` subcommand: upload locally owned records.

use std::path::Path;

use ec_core::UserId;
use ec_sync::FileRemote;

/// Run `ec push`.
pub fn run(data_dir: &Path, kind: &str, user: &str, remote: Option<&Path>) -> Result<(), String> {
    let kind = super::parse_kind(kind)?;
    let mut catalog = super::open_catalog(data_dir, kind);
    let mut remote = FileRemote::new(super::remote_path(data_dir, remote));
    let identity = UserId::new(user);

    let report = ec_sync::push(&mut catalog, &mut remote, &identity).map_err(|e| e.to_string())?;
    if report.pushed == 0 {
        println!("  Nothing to push (built-in and foreign-owned records stay local).");
    } else {
        println!("  Pushed {} record(s)", report.pushed);
    }
    Ok(())
}

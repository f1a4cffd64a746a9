//! The `remove` subcommand: local delete with optional remote cascade.

use std::path::Path;

use colored::Colorize;
use ec_core::UserId;
use ec_sync::FileRemote;

/// Run `ec remove`.
///
/// The local delete always happens. The cascade to the remote store runs
/// only for records owned by `--user`, and a failed remote delete is a
/// warning, never a rollback of the local delete.
pub fn run(
    data_dir: &Path,
    kind: &str,
    name: &str,
    cascade: bool,
    user: Option<&str>,
    remote: Option<&Path>,
) -> Result<(), String> {
    let kind = super::parse_kind(kind)?;
    let mut catalog = super::open_catalog(data_dir, kind);

    let index = catalog
        .find_by_name(name)
        .ok_or_else(|| format!("no {kind} named \"{name}\""))?;
    let removed = catalog.remove(index).map_err(|e| e.to_string())?;
    println!("  Removed {}", removed.name.bold());

    if !cascade {
        return Ok(());
    }

    let Some(user) = user else {
        return Err("--cascade requires --user".to_string());
    };
    let identity = UserId::new(user);

    if removed.owner_id.as_ref() != Some(&identity) {
        // Never issue a remote delete for a record someone else published.
        eprintln!(
            "  {} \"{}\" is not owned by {user}; remote copy left alone",
            "note:".yellow().bold(),
            removed.name
        );
        return Ok(());
    }

    let mut remote = FileRemote::new(super::remote_path(data_dir, remote));
    match ec_sync::delete_remote(&removed, &mut remote, &identity) {
        Ok(()) => println!("  Remote copy deleted"),
        Err(e) => eprintln!(
            "  {} remote delete failed ({e}); the local delete stands",
            "warning:".yellow().bold()
        ),
    }
    Ok(())
}

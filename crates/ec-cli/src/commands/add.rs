//! The `add` subcommand: quick record creation.

use std::path::Path;

use colored::Colorize;
use ec_core::Record;

/// Flags describing the new record.
#[derive(Debug, Clone, clap::Args)]
pub struct AddArgs {
    /// Record name.
    #[arg(long)]
    pub name: String,

    /// Tier.
    #[arg(long, default_value = "1")]
    pub tier: u32,

    /// Category label.
    #[arg(long, default_value = "Standard")]
    pub category: String,

    /// Difficulty value.
    #[arg(long)]
    pub difficulty: Option<String>,

    /// Maximum hit points.
    #[arg(long, default_value = "0")]
    pub hp: u32,

    /// Maximum stress.
    #[arg(long, default_value = "0")]
    pub stress: u32,

    /// Description text.
    #[arg(long)]
    pub description: Option<String>,
}

/// Run `ec add`.
pub fn run(data_dir: &Path, kind: &str, args: &AddArgs) -> Result<(), String> {
    let kind = super::parse_kind(kind)?;
    let mut catalog = super::open_catalog(data_dir, kind);

    if catalog.find_by_name(&args.name).is_some() {
        eprintln!(
            "  {} a record named \"{}\" already exists; adding another",
            "note:".yellow().bold(),
            args.name
        );
    }

    let mut record = Record::new(kind, args.name.clone());
    record.tier = args.tier;
    record.category = args.category.clone();
    record.difficulty = args.difficulty.clone();
    record.hit_points = args.hp;
    record.stress = args.stress;
    record.description = args.description.clone();

    catalog
        .upsert(record, None)
        .map_err(|e| format!("saved in memory but not to disk: {e}"))?;

    println!("  Added {} ({})", args.name.bold(), kind);
    Ok(())
}

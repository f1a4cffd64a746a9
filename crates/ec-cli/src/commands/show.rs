//! The `show` subcommand: one record in detail.

use std::path::Path;

use colored::Colorize;
use ec_core::Record;

/// Run `ec show`.
pub fn run(data_dir: &Path, kind: &str, name: &str) -> Result<(), String> {
    let kind = super::parse_kind(kind)?;
    let catalog = super::open_catalog(data_dir, kind);

    let index = catalog
        .find_by_name(name)
        .ok_or_else(|| format!("no {kind} named \"{name}\""))?;
    print_record(&catalog.records()[index]);
    Ok(())
}

fn print_record(record: &Record) {
    println!();
    println!("  {}", record.name.bold());
    println!(
        "  Tier {} {} · {}",
        record.tier,
        record.category,
        record.source.dimmed()
    );

    if let Some(difficulty) = &record.difficulty {
        println!("  Difficulty {difficulty}");
    }
    match (&record.major_threshold, &record.severe_threshold) {
        (None, None) => {}
        (major, severe) => println!(
            "  Thresholds {} / {}",
            major.as_deref().unwrap_or("—"),
            severe.as_deref().unwrap_or("—")
        ),
    }
    if record.hit_points > 0 || record.stress > 0 {
        println!("  HP {} · Stress {}", record.hit_points, record.stress);
    }

    if let Some(attack) = &record.attack {
        println!(
            "  Attack {} | {}: {} | {} {}",
            attack.modifier.as_deref().unwrap_or("—"),
            attack.weapon.as_deref().unwrap_or("—"),
            attack.range.as_deref().unwrap_or("—"),
            attack.damage.as_deref().unwrap_or("—"),
            attack.damage_type.as_deref().unwrap_or(""),
        );
    }

    if let Some(text) = &record.description {
        println!();
        println!("  {text}");
    }
    if let Some(text) = &record.motives_and_tactics {
        println!("  {} {text}", "Motives & tactics:".bold());
    }
    if let Some(text) = &record.tendency {
        println!("  {} {text}", "Tendency:".bold());
    }
    if let Some(text) = &record.potential_adversaries {
        println!("  {} {text}", "Potential adversaries:".bold());
    }

    for t in &record.traits {
        println!();
        println!("  {} — {}", t.name.bold(), t.trait_type.italic());
        println!("    {}", t.description);
        if let Some(question) = &t.question {
            println!("    {}", question.italic());
        }
    }

    if let Some(owner) = &record.owner_id {
        println!();
        println!("  {} owned by {owner}", "linked:".dimmed());
    }
}

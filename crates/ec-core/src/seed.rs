//! Built-in seed records, loaded when a catalog's storage slot is empty.

use crate::record::{AttackProfile, Record, RecordKind, Trait};

/// Provenance tag stamped on seed records.
pub const SEED_SOURCE: &str = "core";

fn adversary(
    name: &str,
    tier: u32,
    category: &str,
    difficulty: &str,
    hit_points: u32,
    stress: u32,
) -> Record {
    let mut r = Record::new(RecordKind::Adversary, name);
    r.tier = tier;
    r.category = category.to_string();
    r.source = SEED_SOURCE.to_string();
    r.difficulty = Some(difficulty.to_string());
    r.hit_points = hit_points;
    r.stress = stress;
    r
}

fn environment(name: &str, tier: u32, category: &str, difficulty: &str) -> Record {
    let mut r = Record::new(RecordKind::Environment, name);
    r.tier = tier;
    r.category = category.to_string();
    r.source = SEED_SOURCE.to_string();
    r.difficulty = Some(difficulty.to_string());
    r
}

/// The built-in record set for a kind. Each call stamps fresh IDs; the
/// catalog persists the set immediately on first run, so the IDs are
/// generated once per installation and stable from then on.
pub fn seed_records(kind: RecordKind) -> Vec<Record> {
    match kind {
        RecordKind::Adversary => adversary_seeds(),
        RecordKind::Environment => environment_seeds(),
    }
}

fn adversary_seeds() -> Vec<Record> {
    let mut bandit = adversary("Bandit Cutthroat", 1, "Standard", "12", 4, 3);
    bandit.motives_and_tactics = Some("Ambush, intimidate, take the purse and run".to_string());
    bandit.attack = Some(AttackProfile {
        modifier: Some("+1".to_string()),
        weapon: Some("Notched Dagger".to_string()),
        range: Some("Melee".to_string()),
        damage: Some("1d6+2".to_string()),
        damage_type: Some("physical".to_string()),
    });
    bandit.traits.push(Trait {
        name: "Opportunist".to_string(),
        trait_type: "Passive".to_string(),
        description: "Deals +2 damage to targets already marked this round.".to_string(),
        question: None,
    });

    let mut archer = adversary("Hillside Archer", 1, "Ranged", "13", 3, 2);
    archer.attack = Some(AttackProfile {
        modifier: Some("+2".to_string()),
        weapon: Some("Shortbow".to_string()),
        range: Some("Far".to_string()),
        damage: Some("1d8+1".to_string()),
        damage_type: Some("physical".to_string()),
    });

    let mut ogre = adversary("Cave Ogre", 2, "Bruiser", "15", 8, 4);
    ogre.major_threshold = Some("9".to_string());
    ogre.severe_threshold = Some("17".to_string());
    ogre.attack = Some(AttackProfile {
        modifier: Some("+3".to_string()),
        weapon: Some("Club".to_string()),
        range: Some("Very Close".to_string()),
        damage: Some("2d10".to_string()),
        damage_type: Some("physical".to_string()),
    });
    ogre.traits.push(Trait {
        name: "Bone-Shattering Blow".to_string(),
        trait_type: "Action".to_string(),
        description: "Spend a Fear to knock a target within Very Close range prone.".to_string(),
        question: None,
    });

    let mut rats = adversary("Rat Swarm", 1, "Cluster (Vermin)", "10", 5, 0);
    rats.motives_and_tactics = Some("Surround, gnaw, scatter when scorched".to_string());
    rats.traits.push(Trait {
        name: "Teeming Mass".to_string(),
        trait_type: "Passive".to_string(),
        description: "The swarm takes one fewer Hit Point of damage from single-target attacks."
            .to_string(),
        question: None,
    });

    vec![bandit, archer, ogre, rats]
}

fn environment_seeds() -> Vec<Record> {
    let mut river = environment("Raging River", 1, "Traversal", "12");
    river.description = Some("A swollen river of snowmelt, fast enough to sweep a mule away.".to_string());
    river.tendency = Some("Drag the unprepared downstream".to_string());
    river.traits.push(Trait {
        name: "Treacherous Crossing".to_string(),
        trait_type: "Passive".to_string(),
        description: "Crossing without rope or raft requires an Agility roll against the difficulty."
            .to_string(),
        question: Some("What did the river already take from someone who tried?".to_string()),
    });

    let mut warcamp = environment("Goblin Warcamp", 1, "Exploration", "13");
    warcamp.potential_adversaries = Some("Bandit Cutthroat, Hillside Archer".to_string());
    warcamp.tendency = Some("Raise the alarm, overwhelm with numbers".to_string());

    let mut market = environment("Harvest Market", 1, "Social", "10");
    market.description = Some("Stalls, livestock, rumor, and at least one pickpocket.".to_string());
    market.traits.push(Trait {
        name: "Word Travels Fast".to_string(),
        trait_type: "Action".to_string(),
        description: "Anything said loudly here reaches interested ears by sundown.".to_string(),
        question: Some("Who is watching the party from behind a stall?".to_string()),
    });

    vec![river, warcamp, market]
}

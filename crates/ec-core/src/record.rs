//! Entity records, identifiers, and the normalization write path.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The sentinel source tag for user-created records.
pub const CUSTOM_SOURCE: &str = "custom";

/// Provenance tags whose records are built-in and never uploaded.
pub const PROTECTED_SOURCES: [&str; 2] = ["core", "void"];

/// Legacy keys that older payloads persisted inside records. They are
/// transient presentation state and are stripped on every write path;
/// the live equivalents now live in [`crate::overlay::RuntimeOverlay`].
pub const LEGACY_RUNTIME_FIELDS: [&str; 3] = ["_currentHp", "_currentStress", "_note"];

/// Unique identifier for a catalog record. Assigned once at first
/// creation and never regenerated; the sole merge key for reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Generate a new random (v4) record ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The nil ID, used as the serde default so that payloads lacking an
    /// `id` field can be detected and healed by [`normalize`].
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Returns true if this is the nil placeholder ID.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// The kind discriminant separating the two catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// An enemy or NPC stat block.
    Adversary,
    /// A scene, hazard, or setting stat block.
    Environment,
}

impl RecordKind {
    /// Try to parse a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "adversary" => Some(Self::Adversary),
            "environment" => Some(Self::Environment),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adversary => write!(f, "adversary"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// Opaque identity of a remote author. Produced by the external auth
/// boundary; the engine only ever compares these for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Wrap an identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named trait block on a record (feature, action, reaction...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    /// Trait name.
    #[serde(default)]
    pub name: String,
    /// Trait type label ("Action", "Passive", "Reaction", ...).
    #[serde(default)]
    pub trait_type: String,
    /// Markdown-lite body text, rendered by the consumer.
    #[serde(default)]
    pub description: String,
    /// Optional prompt question (used by environment traits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
}

/// The attack line of an adversary record. Every part is optional; the
/// consumer renders whatever is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    /// Attack modifier, e.g. "+2".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    /// Weapon or attack name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<String>,
    /// Attack range band.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Damage expression, e.g. "1d8+3".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    /// Damage type label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<String>,
}

fn default_tier() -> u32 {
    1
}

fn default_category() -> String {
    "Standard".to_string()
}

/// One catalog item: an adversary or environment definition.
///
/// Every field except `name` is defaulted on deserialization, so payloads
/// from older versions (or hand-edited files) load without rejection;
/// unknown fields are preserved in `extra` and written back unchanged.
/// Transient runtime state (current hp/stress, notes) is deliberately
/// *not* part of this struct; see [`crate::overlay`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Stable merge key. Serde-defaults to nil so [`normalize`] can detect
    /// and heal payloads that lack one.
    #[serde(default = "RecordId::nil")]
    pub id: RecordId,
    /// Kind discriminant. Absent in legacy payloads; healed on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RecordKind>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Tier (small positive integer).
    #[serde(default = "default_tier")]
    pub tier: u32,
    /// Category label ("Standard", "Bruiser", "Cluster (Vermin)", ...).
    #[serde(default = "default_category")]
    pub category: String,
    /// Provenance tag. Never empty after normalization.
    #[serde(default)]
    pub source: String,
    /// Difficulty value, shown as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Major damage threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_threshold: Option<String>,
    /// Severe damage threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severe_threshold: Option<String>,
    /// Maximum hit points.
    #[serde(default)]
    pub hit_points: u32,
    /// Maximum stress.
    #[serde(default)]
    pub stress: u32,
    /// Attack line, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<AttackProfile>,
    /// Motives & tactics flavor text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motives_and_tactics: Option<String>,
    /// Free-text description / introduction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tendency text (environments).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tendency: Option<String>,
    /// Suggested adversaries (environments).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_adversaries: Option<String>,
    /// Experience tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub experiences: Vec<String>,
    /// Trait blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traits: Vec<Trait>,
    /// Primary key of the row in the remote store. Absent until the first
    /// successful push; untouched by local edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<RecordId>,
    /// Identity of the remote author. Absent for purely local records. A
    /// record owned by someone else is read-only for upload and
    /// deletion-cascade purposes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
    /// Unknown fields from older or newer payload shapes, preserved
    /// verbatim across load/save.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Record {
    /// Create a minimal record of the given kind, with a fresh ID and the
    /// custom source tag.
    pub fn new(kind: RecordKind, name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            kind: Some(kind),
            name: name.into(),
            tier: default_tier(),
            category: default_category(),
            source: CUSTOM_SOURCE.to_string(),
            difficulty: None,
            major_threshold: None,
            severe_threshold: None,
            hit_points: 0,
            stress: 0,
            attack: None,
            motives_and_tactics: None,
            description: None,
            tendency: None,
            potential_adversaries: None,
            experiences: Vec::new(),
            traits: Vec::new(),
            remote_id: None,
            owner_id: None,
            extra: BTreeMap::new(),
        }
    }

    /// Returns true if this record's source is a protected built-in tag.
    pub fn is_protected(&self) -> bool {
        PROTECTED_SOURCES.contains(&self.source.as_str())
    }

    /// Returns true if the record is owned by a different identity than
    /// the given one (foreign records are never uploaded or
    /// cascade-deleted).
    pub fn is_foreign_to(&self, identity: &UserId) -> bool {
        match &self.owner_id {
            Some(owner) => owner != identity,
            None => false,
        }
    }
}

/// What [`normalize`] had to heal. All healing is silent by policy; this
/// report exists so the consumer can mention it if it wants to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// The kind was absent or did not match the owning catalog.
    pub kind_coerced: bool,
    /// A fresh ID was assigned because none was present.
    pub id_assigned: bool,
    /// The empty source was replaced with the custom sentinel.
    pub source_defaulted: bool,
    /// Legacy transient keys that were stripped from `extra`.
    pub stripped: Vec<String>,
}

impl NormalizeReport {
    /// Returns true if nothing needed healing.
    pub fn is_clean(&self) -> bool {
        !self.kind_coerced && !self.id_assigned && !self.source_defaulted && self.stripped.is_empty()
    }
}

/// Heal a record for the catalog that owns it. Pure: returns a corrected
/// copy and a report of what changed.
///
/// - `kind` is forced to `expected_kind` (a foreign kind is coerced, never
///   dropped).
/// - A nil `id` gets a fresh UUID; an existing `id` is never regenerated,
///   so running this twice yields the same identifier both times.
/// - An empty `source` becomes [`CUSTOM_SOURCE`].
/// - Legacy transient fields are stripped from `extra`.
pub fn normalize(record: Record, expected_kind: RecordKind) -> (Record, NormalizeReport) {
    let mut record = record;
    let mut report = NormalizeReport::default();

    if record.kind != Some(expected_kind) {
        report.kind_coerced = true;
        record.kind = Some(expected_kind);
    }

    if record.id.is_nil() {
        report.id_assigned = true;
        record.id = RecordId::new();
    }

    if record.source.is_empty() {
        report.source_defaulted = true;
        record.source = CUSTOM_SOURCE.to_string();
    }

    for key in LEGACY_RUNTIME_FIELDS {
        if record.extra.remove(key).is_some() {
            report.stripped.push(key.to_string());
        }
    }

    (record, report)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn record_id_display_shows_short_form() {
        let id = RecordId(Uuid::parse_str("a3f2b1c8-1234-5678-9abc-def012345678").unwrap());
        assert_eq!(id.to_string(), "a3f2b1c8");
    }

    #[test]
    fn normalize_assigns_id_once() {
        let mut record = Record::new(RecordKind::Adversary, "Goblin");
        record.id = RecordId::nil();

        let (first, report) = normalize(record, RecordKind::Adversary);
        assert!(report.id_assigned);
        assert!(!first.id.is_nil());

        let (second, report) = normalize(first.clone(), RecordKind::Adversary);
        assert!(!report.id_assigned);
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn normalize_coerces_foreign_kind() {
        let record = Record::new(RecordKind::Environment, "Raging River");
        let (healed, report) = normalize(record, RecordKind::Adversary);
        assert!(report.kind_coerced);
        assert_eq!(healed.kind, Some(RecordKind::Adversary));
    }

    #[test]
    fn normalize_defaults_empty_source() {
        let mut record = Record::new(RecordKind::Adversary, "Goblin");
        record.source = String::new();
        let (healed, report) = normalize(record, RecordKind::Adversary);
        assert!(report.source_defaulted);
        assert_eq!(healed.source, CUSTOM_SOURCE);
    }

    #[test]
    fn normalize_strips_legacy_runtime_fields() {
        let mut record = Record::new(RecordKind::Adversary, "Goblin");
        record
            .extra
            .insert("_currentHp".to_string(), Value::from(3));
        record
            .extra
            .insert("_note".to_string(), Value::from("half dead"));
        record
            .extra
            .insert("homebrew_rating".to_string(), Value::from(5));

        let (healed, report) = normalize(record, RecordKind::Adversary);
        assert_eq!(report.stripped, vec!["_currentHp", "_note"]);
        assert!(!healed.extra.contains_key("_currentHp"));
        assert!(!healed.extra.contains_key("_note"));
        // Unknown but non-legacy fields survive.
        assert!(healed.extra.contains_key("homebrew_rating"));
    }

    #[test]
    fn normalize_is_clean_for_healthy_record() {
        let record = Record::new(RecordKind::Adversary, "Goblin");
        let (_, report) = normalize(record, RecordKind::Adversary);
        assert!(report.is_clean());
    }

    #[test]
    fn permissive_deserialization_fills_defaults() {
        let record: Record = serde_json::from_str(r#"{"name": "Mystery"}"#).unwrap();
        assert!(record.id.is_nil());
        assert!(record.kind.is_none());
        assert_eq!(record.tier, 1);
        assert_eq!(record.category, "Standard");
        assert!(record.source.is_empty());
    }

    #[test]
    fn unknown_fields_round_trip_through_extra() {
        let record: Record =
            serde_json::from_str(r#"{"name": "Mystery", "hoard_value": 250}"#).unwrap();
        assert_eq!(record.extra["hoard_value"], Value::from(250));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["hoard_value"], Value::from(250));
    }

    #[test]
    fn protected_sources() {
        let mut record = Record::new(RecordKind::Adversary, "Goblin");
        assert!(!record.is_protected());
        record.source = "core".to_string();
        assert!(record.is_protected());
        record.source = "void".to_string();
        assert!(record.is_protected());
    }

    #[test]
    fn foreign_ownership() {
        let mut record = Record::new(RecordKind::Adversary, "Goblin");
        let me = UserId::new("u1");
        assert!(!record.is_foreign_to(&me));
        record.owner_id = Some(UserId::new("u2"));
        assert!(record.is_foreign_to(&me));
        record.owner_id = Some(me.clone());
        assert!(!record.is_foreign_to(&me));
    }

    proptest! {
        #[test]
        fn normalize_id_is_idempotent(name in ".{0,24}") {
            let mut record = Record::new(RecordKind::Adversary, name);
            record.id = RecordId::nil();
            let (once, _) = normalize(record, RecordKind::Adversary);
            let (twice, _) = normalize(once.clone(), RecordKind::Adversary);
            prop_assert_eq!(once.id, twice.id);
            prop_assert_eq!(once, twice);
        }
    }
}

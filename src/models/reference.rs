//! Reference dataset documents.
//!
//! One [`FactionDocument`] per faction, one index of [`FactionSummary`]
//! entries, and one list of core [`Stratagem`]s. Produced by the builder and
//! only ever read by the viewer.

use serde::{Deserialize, Serialize};

/// Per-model stat row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelStats {
    pub name: String,
    pub m: String,
    pub t: String,
    pub sv: String,
    pub inv_sv: Option<String>,
    pub w: String,
    pub ld: String,
    pub oc: String,
}

/// One profile of a weapon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponProfile {
    pub name: String,
    pub range: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub a: String,
    pub bs_ws: String,
    pub s: String,
    pub ap: String,
    pub d: String,
    pub desc: Option<String>,
}

/// A weapon with one or more profiles sharing a wargear line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    /// "Ranged" or "Melee"
    #[serde(rename = "type")]
    pub kind: String,
    pub profiles: Vec<WeaponProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Cost for a given model count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsRow {
    pub models: String,
    pub cost: String,
}

/// Authoritative record for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasheet {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub loadout: Option<String>,
    pub transport: Option<String>,
    pub damaged_w: Option<String>,
    pub damaged_description: Option<String>,
    pub leader_footer: Option<String>,
    pub is_forge_world: bool,
    pub is_legends: bool,
    pub models: Vec<ModelStats>,
    pub weapons: Vec<Weapon>,
    pub abilities: Vec<Ability>,
    pub keywords: Vec<String>,
    pub faction_keywords: Vec<String>,
    pub composition: Vec<String>,
    pub points: Vec<PointsRow>,
    /// Ids of datasheets this one can lead
    pub can_lead: Vec<String>,
    /// Ids of datasheets that can lead this one
    pub led_by: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetachmentRule {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enhancement {
    pub name: String,
    pub description: String,
    pub cost: String,
}

/// A stratagem, either detachment-bound or core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stratagem {
    pub name: String,
    /// Classification, e.g. "Battle Tactic Stratagem"
    #[serde(rename = "type")]
    pub kind: String,
    /// Command point cost
    pub cost: String,
    /// "{turn} – {phase}" when the stratagem has a timing
    pub when: Option<String>,
    pub description: String,
}

/// A detachment with its rules, enhancements and stratagems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detachment {
    pub name: String,
    pub rules: Vec<DetachmentRule>,
    pub enhancements: Vec<Enhancement>,
    pub stratagems: Vec<Stratagem>,
}

impl Detachment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            enhancements: Vec::new(),
            stratagems: Vec::new(),
        }
    }
}

/// Everything known about one faction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionDocument {
    pub id: String,
    pub name: String,
    pub last_update: Option<String>,
    pub detachments: Vec<Detachment>,
    pub datasheets: Vec<Datasheet>,
}

/// Index entry for one faction document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactionSummary {
    pub id: String,
    pub name: String,
    pub datasheet_count: usize,
    pub detachment_count: usize,
}

impl FactionSummary {
    /// Summary with zero counts, for lookups where counts do not matter.
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            datasheet_count: 0,
            detachment_count: 0,
        }
    }
}

impl From<&FactionDocument> for FactionSummary {
    fn from(doc: &FactionDocument) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            datasheet_count: doc.datasheets.len(),
            detachment_count: doc.detachments.len(),
        }
    }
}

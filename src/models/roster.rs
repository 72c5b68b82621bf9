//! Assembled roster model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Profile, Rule};

/// A game unit flattened out of one top-level selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Selection id from the export
    pub id: String,

    /// Unit name
    pub name: String,

    /// Player-assigned name, if any
    pub custom_name: Option<String>,

    /// Points cost
    pub cost: u32,

    /// Unit stat-lines
    pub stats: Vec<Profile>,

    pub ranged: Vec<Profile>,

    pub melee: Vec<Profile>,

    pub abilities: Vec<Profile>,

    /// Category keywords on the unit's own selection
    pub keywords: Vec<String>,

    /// Starting wounds per model
    pub max_wounds: u32,

    pub is_character: bool,

    /// Position in the roster's unit list
    pub original_index: usize,
}

impl Unit {
    /// Name to show: the custom name when set, otherwise the unit name.
    pub fn display_name(&self) -> &str {
        self.custom_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Check if the unit carries a keyword (exact match).
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }
}

/// A parsed roster, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    /// e.g. "2000pts Adeptus Custodes"
    pub army_name: String,

    /// Catalogue identifier from the exporting tool
    pub catalogue_name: String,

    pub detachment_name: Option<String>,

    /// Total points spent
    pub total_points: u32,

    pub units: Vec<Unit>,

    /// Lower-cased rule name to rule text, collected across the whole tree
    pub rules: BTreeMap<String, String>,

    /// Army-wide rules declared on the force
    pub army_rules: Vec<Rule>,
}

impl Roster {
    /// Find a unit by selection id.
    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Get unit names for display.
    pub fn unit_names(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.name.as_str()).collect()
    }
}

//! Profiles, characteristics and rule text attached to selections.

use serde::{Deserialize, Serialize};

/// A single named value on a profile, e.g. `W = "3"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    #[serde(default, deserialize_with = "super::lenient::text")]
    pub name: String,

    /// Exported as `$text`
    #[serde(rename = "$text", default, deserialize_with = "super::lenient::text")]
    pub text: String,
}

/// The profile categories the viewer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Unit stat-line (M, T, SV, W, LD, OC)
    Unit,
    Ranged,
    Melee,
    Abilities,
}

impl ProfileKind {
    /// Map an exported `typeName` onto a known kind.
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        match type_name {
            "Unit" => Some(ProfileKind::Unit),
            "Ranged Weapons" => Some(ProfileKind::Ranged),
            "Melee Weapons" => Some(ProfileKind::Melee),
            "Abilities" => Some(ProfileKind::Abilities),
            _ => None,
        }
    }

    /// The exported `typeName` for this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            ProfileKind::Unit => "Unit",
            ProfileKind::Ranged => "Ranged Weapons",
            ProfileKind::Melee => "Melee Weapons",
            ProfileKind::Abilities => "Abilities",
        }
    }
}

/// A named stat-line or ability block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, deserialize_with = "super::lenient::text")]
    pub name: String,

    #[serde(default, deserialize_with = "super::lenient::text")]
    pub type_name: String,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub characteristics: Vec<Characteristic>,
}

impl Profile {
    /// Create a profile of the given kind with no characteristics.
    pub fn new(name: impl Into<String>, kind: ProfileKind) -> Self {
        Self {
            name: name.into(),
            type_name: kind.type_name().to_string(),
            characteristics: Vec::new(),
        }
    }

    /// Builder method to append a characteristic.
    pub fn with_characteristic(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.characteristics.push(Characteristic {
            name: name.into(),
            text: text.into(),
        });
        self
    }

    pub fn kind(&self) -> Option<ProfileKind> {
        ProfileKind::from_type_name(&self.type_name)
    }

    /// Text of the named characteristic, if present.
    pub fn characteristic(&self, name: &str) -> Option<&str> {
        self.characteristics
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.text.as_str())
    }
}

/// A named block of rule text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default, deserialize_with = "super::lenient::text")]
    pub name: String,

    #[serde(default, deserialize_with = "super::lenient::text")]
    pub description: String,
}

impl Rule {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

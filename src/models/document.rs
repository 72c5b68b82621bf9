//! Raw roster export shapes (BattleScribe / NewRecruit JSON).
//!
//! These mirror the uploaded document closely. Every field other than the
//! root `roster.forces` list is optional in practice, so everything here
//! defaults when absent and numeric fields accept whatever the exporting
//! tool happened to write.

use serde::{Deserialize, Serialize};

use super::{Profile, Rule};

/// Top-level uploaded document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterDocument {
    pub roster: RawRoster,
}

/// The `roster` object of an export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRoster {
    #[serde(default, deserialize_with = "super::lenient::list")]
    pub costs: Vec<Cost>,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub cost_limits: Vec<CostLimit>,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub forces: Vec<Force>,
}

/// A named cost entry, e.g. `{ "name": "pts", "value": 100 }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cost {
    #[serde(default, deserialize_with = "super::lenient::text")]
    pub name: String,

    #[serde(default, deserialize_with = "super::lenient::number")]
    pub value: Option<f64>,
}

/// A roster cost limit (the game size).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CostLimit {
    #[serde(default, deserialize_with = "super::lenient::number")]
    pub value: Option<f64>,
}

/// A category tag on a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "super::lenient::text")]
    pub name: String,
}

/// A force block: one army within the roster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Force {
    #[serde(default, deserialize_with = "super::lenient::optional_text")]
    pub catalogue_name: Option<String>,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub selections: Vec<Selection>,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub rules: Vec<Rule>,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub forces: Vec<Force>,
}

/// One node of the selection tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default, deserialize_with = "super::lenient::text")]
    pub id: String,

    #[serde(default, deserialize_with = "super::lenient::text")]
    pub name: String,

    #[serde(default, deserialize_with = "super::lenient::optional_text")]
    pub custom_name: Option<String>,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub categories: Vec<Category>,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub costs: Vec<Cost>,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub profiles: Vec<Profile>,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub rules: Vec<Rule>,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub selections: Vec<Selection>,

    #[serde(default, deserialize_with = "super::lenient::list")]
    pub forces: Vec<Force>,
}

impl Selection {
    /// Create an empty selection with the given id and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder method to add a category tag.
    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.categories.push(Category { name: name.into() });
        self
    }

    /// Builder method to add a named cost.
    pub fn with_cost(mut self, name: impl Into<String>, value: f64) -> Self {
        self.costs.push(Cost {
            name: name.into(),
            value: Some(value),
        });
        self
    }

    /// Builder method to add a profile.
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Builder method to add a rule.
    pub fn with_rule(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.rules.push(Rule::new(name, description));
        self
    }

    /// Builder method to add a child selection.
    pub fn with_child(mut self, child: Selection) -> Self {
        self.selections.push(child);
        self
    }

    /// Whether this selection carries the given category tag.
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    /// Value of the named cost entry, if present and numeric.
    pub fn cost(&self, name: &str) -> Option<f64> {
        self.costs
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selection_defaults_missing_fields() {
        let sel: Selection = serde_json::from_value(json!({ "name": "Custodian Guard" })).unwrap();

        assert_eq!(sel.name, "Custodian Guard");
        assert!(sel.id.is_empty());
        assert!(sel.profiles.is_empty());
        assert!(sel.selections.is_empty());
        assert!(sel.custom_name.is_none());
    }

    #[test]
    fn test_lenient_cost_values() {
        let costs: Vec<Cost> = serde_json::from_value(json!([
            { "name": "pts", "value": 100 },
            { "name": "pts", "value": "85" },
            { "name": "pts", "value": "lots" },
            { "name": "pts", "value": null },
            { "name": "pts" }
        ]))
        .unwrap();

        let values: Vec<_> = costs.iter().map(|c| c.value).collect();
        assert_eq!(values, vec![Some(100.0), Some(85.0), None, None, None]);
    }

    #[test]
    fn test_selection_null_fields_default() {
        let sel: Selection = serde_json::from_value(json!({
            "id": 7,
            "name": "Custodian Guard",
            "customName": null,
            "categories": null,
            "costs": null,
            "profiles": null,
            "rules": null,
            "selections": null,
            "forces": null
        }))
        .unwrap();

        assert_eq!(sel.id, "7");
        assert_eq!(sel.name, "Custodian Guard");
        assert!(sel.custom_name.is_none());
        assert!(sel.categories.is_empty());
        assert!(sel.costs.is_empty());
        assert_eq!(sel.cost("pts"), None);
    }

    #[test]
    fn test_selection_named_cost_lookup() {
        let sel = Selection::new("1", "Unit")
            .with_cost("CP", 1.0)
            .with_cost("pts", 120.0);

        assert_eq!(sel.cost("pts"), Some(120.0));
        assert_eq!(sel.cost("PL"), None);
    }

    #[test]
    fn test_roster_document_camel_case() {
        let doc: RosterDocument = serde_json::from_value(json!({
            "roster": {
                "costLimits": [{ "value": 2000 }],
                "forces": [{ "catalogueName": "Imperium - Adeptus Custodes", "selections": [] }]
            }
        }))
        .unwrap();

        assert_eq!(doc.roster.cost_limits[0].value, Some(2000.0));
        assert_eq!(
            doc.roster.forces[0].catalogue_name.as_deref(),
            Some("Imperium - Adeptus Custodes")
        );
    }
}

//! Turn a parsed export into a [`Roster`].

use tracing::debug;

use super::collect::{gather_force_rules, gather_keywords, gather_profiles};
use crate::models::{Force, Profile, RawRoster, Roster, Selection, Unit};

/// Name (and category) of the configuration entry holding the detachment.
pub const DETACHMENT_MARKER: &str = "Detachment";

/// Category of selections that configure the army rather than field models.
pub const CONFIGURATION_CATEGORY: &str = "Configuration";

/// Keyword that marks a unit as a character.
pub const CHARACTER_KEYWORD: &str = "Character";

/// Cost entry holding the points value.
pub const POINTS_COST: &str = "pts";

pub const UNKNOWN_CATALOGUE: &str = "Unknown";
pub const UNKNOWN_POINT_LIMIT: &str = "???";

/// Assemble a roster from the first force. `None` when there is no force.
pub fn assemble_roster(raw: &RawRoster) -> Option<Roster> {
    let force = raw.forces.first()?;

    let catalogue_name = force
        .catalogue_name
        .clone()
        .unwrap_or_else(|| UNKNOWN_CATALOGUE.to_string());

    let point_limit = raw
        .cost_limits
        .first()
        .and_then(|l| l.value)
        .filter(|v| v.is_finite())
        .map(format_points)
        .unwrap_or_else(|| UNKNOWN_POINT_LIMIT.to_string());

    let total_points = raw
        .costs
        .first()
        .and_then(|c| c.value)
        .map(to_points)
        .unwrap_or(0);

    let units = assemble_units(force);
    let detachment_name = detachment_name(force);

    debug!(
        "Assembled {} units for {} (detachment: {})",
        units.len(),
        catalogue_name,
        detachment_name.as_deref().unwrap_or("none")
    );

    Some(Roster {
        army_name: format!("{}pts {}", point_limit, catalogue_name),
        catalogue_name,
        detachment_name,
        total_points,
        units,
        rules: gather_force_rules(force),
        army_rules: force.rules.clone(),
    })
}

/// First child of the top-level "Detachment" selection.
pub fn detachment_name(force: &Force) -> Option<String> {
    force
        .selections
        .iter()
        .find(|s| s.name == DETACHMENT_MARKER)?
        .selections
        .first()
        .map(|s| s.name.clone())
}

/// Build units from the force's top-level selections, skipping
/// configuration entries and selections without combat profiles.
pub fn assemble_units(force: &Force) -> Vec<Unit> {
    force
        .selections
        .iter()
        .filter(|sel| !sel.has_category(CONFIGURATION_CATEGORY))
        .filter_map(|sel| {
            let profiles = gather_profiles(sel);
            profiles.has_combat_profiles().then_some((sel, profiles))
        })
        .enumerate()
        .map(|(index, (sel, profiles))| {
            let keywords = gather_keywords(sel);
            let max_wounds = max_wounds(&profiles.unit);
            let is_character = keywords.iter().any(|k| k == CHARACTER_KEYWORD);

            Unit {
                id: sel.id.clone(),
                name: sel.name.clone(),
                custom_name: sel.custom_name.clone(),
                cost: unit_cost(sel),
                stats: profiles.unit,
                ranged: profiles.ranged,
                melee: profiles.melee,
                abilities: profiles.abilities,
                keywords,
                max_wounds,
                is_character,
                original_index: index,
            }
        })
        .collect()
}

fn unit_cost(selection: &Selection) -> u32 {
    selection.cost(POINTS_COST).map(to_points).unwrap_or(0)
}

/// Wounds from the "W" characteristic of the first stat-line; 1 if absent
/// or not a number.
pub fn max_wounds(stats: &[Profile]) -> u32 {
    stats
        .first()
        .and_then(|p| p.characteristic("W"))
        .and_then(parse_leading_int)
        .unwrap_or(1)
}

/// Parse the leading run of digits, so `"6"` and `"6+"` both yield 6.
fn parse_leading_int(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn to_points(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

/// Render a cost value the way it appears in the export (no ".0").
fn format_points(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostLimit, Cost, ProfileKind, Rule};
    use pretty_assertions::assert_eq;

    fn stat_line(name: &str, wounds: Option<&str>) -> Profile {
        let p = Profile::new(name, ProfileKind::Unit).with_characteristic("T", "6");
        match wounds {
            Some(w) => p.with_characteristic("W", w),
            None => p,
        }
    }

    fn custodian_guard() -> Selection {
        Selection::new("cg-1", "Custodian Guard")
            .with_category("Infantry")
            .with_category("Battleline")
            .with_cost("pts", 100.0)
            .with_profile(stat_line("Custodian Guard", Some("3")))
            .with_child(
                Selection::new("cg-1-w", "Guardian spear")
                    .with_profile(Profile::new("Guardian spear", ProfileKind::Ranged))
                    .with_profile(Profile::new("Guardian spear", ProfileKind::Melee)),
            )
    }

    fn detachment_config() -> Selection {
        Selection::new("det", DETACHMENT_MARKER)
            .with_category(CONFIGURATION_CATEGORY)
            .with_child(Selection::new("det-1", "Shield Host"))
    }

    fn roster(selections: Vec<Selection>) -> RawRoster {
        RawRoster {
            costs: vec![Cost {
                name: "pts".to_string(),
                value: Some(100.0),
            }],
            cost_limits: vec![CostLimit {
                value: Some(2000.0),
            }],
            forces: vec![Force {
                catalogue_name: Some("Adeptus Custodes".to_string()),
                selections,
                rules: vec![Rule::new("Martial Ka'tah", "Pick a stance.")],
                forces: Vec::new(),
            }],
        }
    }

    #[test]
    fn test_assemble_custodes_roster() {
        let raw = roster(vec![detachment_config(), custodian_guard()]);
        let parsed = assemble_roster(&raw).unwrap();

        assert_eq!(parsed.army_name, "2000pts Adeptus Custodes");
        assert_eq!(parsed.catalogue_name, "Adeptus Custodes");
        assert_eq!(parsed.detachment_name.as_deref(), Some("Shield Host"));
        assert_eq!(parsed.total_points, 100);
        assert_eq!(parsed.units.len(), 1);

        let unit = &parsed.units[0];
        assert_eq!(unit.name, "Custodian Guard");
        assert_eq!(unit.cost, 100);
        assert_eq!(unit.max_wounds, 3);
        assert!(!unit.is_character);
        assert_eq!(unit.keywords, vec!["Infantry", "Battleline"]);
        assert_eq!(unit.ranged.len(), 1);
        assert_eq!(unit.melee.len(), 1);
        assert_eq!(parsed.army_rules.len(), 1);
        assert!(parsed.rules.contains_key("martial ka'tah"));
    }

    #[test]
    fn test_missing_force_yields_none() {
        assert!(assemble_roster(&RawRoster::default()).is_none());
    }

    #[test]
    fn test_placeholders_for_missing_catalogue_and_limit() {
        let mut raw = roster(vec![custodian_guard()]);
        raw.cost_limits.clear();
        raw.costs.clear();
        raw.forces[0].catalogue_name = None;

        let parsed = assemble_roster(&raw).unwrap();
        assert_eq!(parsed.army_name, "???pts Unknown");
        assert_eq!(parsed.catalogue_name, "Unknown");
        assert_eq!(parsed.total_points, 0);
    }

    #[test]
    fn test_configuration_selection_is_not_a_unit() {
        let config = Selection::new("cfg", "Battle Size")
            .with_category(CONFIGURATION_CATEGORY)
            .with_child(
                Selection::new("cfg-1", "Strike Force")
                    .with_profile(stat_line("Not a unit", Some("9"))),
            );

        let raw = roster(vec![config, custodian_guard()]);
        let parsed = assemble_roster(&raw).unwrap();

        assert_eq!(parsed.unit_names(), vec!["Custodian Guard"]);
    }

    #[test]
    fn test_selection_without_combat_profiles_is_skipped() {
        let abilities_only = Selection::new("x", "Enhancement Holder")
            .with_profile(Profile::new("Some Ability", ProfileKind::Abilities));

        let raw = roster(vec![abilities_only, custodian_guard()]);
        let parsed = assemble_roster(&raw).unwrap();

        assert_eq!(parsed.units.len(), 1);
        assert_eq!(parsed.units[0].original_index, 0);
    }

    #[test]
    fn test_original_index_follows_unit_order() {
        let mut second = custodian_guard();
        second.id = "cg-2".to_string();
        let raw = roster(vec![custodian_guard(), detachment_config(), second]);
        let parsed = assemble_roster(&raw).unwrap();

        let indices: Vec<_> = parsed.units.iter().map(|u| u.original_index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_max_wounds_parsing() {
        assert_eq!(max_wounds(&[stat_line("a", Some("6"))]), 6);
        assert_eq!(max_wounds(&[stat_line("a", Some("D6"))]), 1);
        assert_eq!(max_wounds(&[stat_line("a", None)]), 1);
        assert_eq!(max_wounds(&[]), 1);
        assert_eq!(max_wounds(&[stat_line("a", Some(" 12 "))]), 12);
    }

    #[test]
    fn test_max_wounds_uses_first_stat_line() {
        let stats = vec![stat_line("Sergeant", Some("4")), stat_line("Trooper", Some("2"))];
        assert_eq!(max_wounds(&stats), 4);
    }

    #[test]
    fn test_missing_points_cost_defaults_to_zero() {
        let mut unit = custodian_guard();
        unit.costs.clear();
        let raw = roster(vec![unit]);

        assert_eq!(assemble_roster(&raw).unwrap().units[0].cost, 0);
    }

    #[test]
    fn test_character_flag_from_keywords() {
        let champion = Selection::new("bc", "Blade Champion")
            .with_category("Infantry")
            .with_category(CHARACTER_KEYWORD)
            .with_profile(stat_line("Blade Champion", Some("6")));

        let raw = roster(vec![champion]);
        let unit = &assemble_roster(&raw).unwrap().units[0];
        assert!(unit.is_character);
        assert_eq!(unit.max_wounds, 6);
    }

    #[test]
    fn test_detachment_absent() {
        let raw = roster(vec![custodian_guard()]);
        assert!(assemble_roster(&raw).unwrap().detachment_name.is_none());

        let empty_marker = Selection::new("det", DETACHMENT_MARKER);
        assert!(detachment_name(&Force {
            catalogue_name: None,
            selections: vec![empty_marker],
            rules: Vec::new(),
            forces: Vec::new(),
        })
        .is_none());
    }

    #[test]
    fn test_fractional_point_limit_is_rendered() {
        let mut raw = roster(vec![custodian_guard()]);
        raw.cost_limits[0].value = Some(1000.5);
        assert_eq!(assemble_roster(&raw).unwrap().army_name, "1000.5pts Adeptus Custodes");
    }

    #[test]
    fn test_non_finite_point_limit_is_unknown() {
        let mut raw = roster(vec![custodian_guard()]);
        raw.cost_limits[0].value = Some(f64::NAN);
        assert_eq!(assemble_roster(&raw).unwrap().army_name, "???pts Adeptus Custodes");

        raw.cost_limits[0].value = Some(f64::INFINITY);
        assert_eq!(assemble_roster(&raw).unwrap().army_name, "???pts Adeptus Custodes");
    }
}

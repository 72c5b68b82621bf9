//! Joining datasheet rows with their child tables.

use std::collections::{HashMap, HashSet};

use super::csv::{field, optional_field, Row};
use super::tables::{group_by, index_by, SourceTable, SourceTables};
use crate::models::{Ability, Datasheet, ModelStats, PointsRow, Weapon, WeaponProfile};

/// Leader relations, indexed from both ends.
///
/// Both indices are built from the same leader table; neither endpoint owns
/// the relation.
#[derive(Debug, Default)]
pub struct LeaderIndex<'a> {
    /// leader datasheet id -> ids it can be attached to
    by_leader: HashMap<&'a str, Vec<&'a str>>,
    /// attached datasheet id -> ids of leaders it accepts
    by_attached: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> LeaderIndex<'a> {
    pub fn build(rows: &'a [Row]) -> Self {
        let mut index = LeaderIndex::default();
        for row in rows {
            let leader = field(row, "leaderId");
            let attached = field(row, "attachedId");
            index.by_leader.entry(leader).or_default().push(attached);
            index.by_attached.entry(attached).or_default().push(leader);
        }
        index
    }

    pub fn can_lead(&self, datasheet_id: &str) -> Vec<String> {
        Self::ids(&self.by_leader, datasheet_id)
    }

    pub fn led_by(&self, datasheet_id: &str) -> Vec<String> {
        Self::ids(&self.by_attached, datasheet_id)
    }

    fn ids(map: &HashMap<&'a str, Vec<&'a str>>, key: &str) -> Vec<String> {
        map.get(key)
            .map(|ids| ids.iter().map(|id| id.to_string()).collect())
            .unwrap_or_default()
    }
}

/// Source books flagged as Forge World or Legends content.
#[derive(Debug, Default)]
pub struct SourceClassification<'a> {
    forge_world: HashSet<&'a str>,
    legends: HashSet<&'a str>,
}

impl<'a> SourceClassification<'a> {
    pub fn build(rows: &'a [Row]) -> Self {
        let mut class = SourceClassification::default();
        for row in rows {
            let id = field(row, "id");
            let name = field(row, "name");
            if name.ends_with("(Forge World)") {
                class.forge_world.insert(id);
            }
            if name.ends_with("(Warhammer Legends)") || name.starts_with("Legends:") {
                class.legends.insert(id);
            }
        }
        class
    }

    pub fn is_forge_world(&self, source_id: &str) -> bool {
        self.forge_world.contains(source_id)
    }

    pub fn is_legends(&self, source_id: &str) -> bool {
        self.legends.contains(source_id)
    }
}

/// Lookup indices over every datasheet child table.
pub struct DatasheetJoin<'a> {
    abilities_by_id: HashMap<&'a str, &'a Row>,
    models: HashMap<&'a str, Vec<&'a Row>>,
    wargear: HashMap<&'a str, Vec<&'a Row>>,
    abilities: HashMap<&'a str, Vec<&'a Row>>,
    keywords: HashMap<&'a str, Vec<&'a Row>>,
    composition: HashMap<&'a str, Vec<&'a Row>>,
    costs: HashMap<&'a str, Vec<&'a Row>>,
    leaders: LeaderIndex<'a>,
    sources: SourceClassification<'a>,
}

impl<'a> DatasheetJoin<'a> {
    pub fn build(tables: &'a SourceTables) -> Self {
        const SHEET: &str = "datasheetId";
        Self {
            abilities_by_id: index_by(tables.rows(SourceTable::Abilities), "id"),
            models: group_by(tables.rows(SourceTable::DatasheetsModels), SHEET),
            wargear: group_by(tables.rows(SourceTable::DatasheetsWargear), SHEET),
            abilities: group_by(tables.rows(SourceTable::DatasheetsAbilities), SHEET),
            keywords: group_by(tables.rows(SourceTable::DatasheetsKeywords), SHEET),
            composition: group_by(tables.rows(SourceTable::DatasheetsUnitComposition), SHEET),
            costs: group_by(tables.rows(SourceTable::DatasheetsModelsCost), SHEET),
            leaders: LeaderIndex::build(tables.rows(SourceTable::DatasheetsLeader)),
            sources: SourceClassification::build(tables.rows(SourceTable::Source)),
        }
    }

    /// Build the full datasheet for one datasheet row.
    pub fn datasheet(&self, row: &Row) -> Datasheet {
        let id = field(row, "id");
        let source_id = field(row, "sourceId");

        Datasheet {
            id: id.to_string(),
            name: field(row, "name").to_string(),
            role: optional_field(row, "role"),
            loadout: optional_field(row, "loadout"),
            transport: optional_field(row, "transport"),
            damaged_w: optional_field(row, "damagedW"),
            damaged_description: optional_field(row, "damagedDescription"),
            leader_footer: optional_field(row, "leaderFooter"),
            is_forge_world: self.sources.is_forge_world(source_id),
            is_legends: self.sources.is_legends(source_id),
            models: self.models(id),
            weapons: self.weapons(id),
            abilities: self.abilities(id),
            keywords: self.keywords(id, false),
            faction_keywords: self.keywords(id, true),
            composition: self
                .composition
                .get(id)
                .into_iter()
                .flatten()
                .map(|r| field(r, "description").to_string())
                .collect(),
            points: self
                .costs
                .get(id)
                .into_iter()
                .flatten()
                .map(|r| PointsRow {
                    models: field(r, "description").to_string(),
                    cost: field(r, "cost").to_string(),
                })
                .collect(),
            can_lead: self.leaders.can_lead(id),
            led_by: self.leaders.led_by(id),
        }
    }

    fn models(&self, id: &str) -> Vec<ModelStats> {
        self.models
            .get(id)
            .into_iter()
            .flatten()
            .map(|m| ModelStats {
                name: field(m, "name").to_string(),
                m: field(m, "m").to_string(),
                t: field(m, "t").to_string(),
                sv: field(m, "sv").to_string(),
                inv_sv: optional_field(m, "invSv"),
                w: field(m, "w").to_string(),
                ld: field(m, "ld").to_string(),
                oc: field(m, "oc").to_string(),
            })
            .collect()
    }

    /// Wargear rows sharing a `line` form one weapon, in first-seen order.
    fn weapons(&self, id: &str) -> Vec<Weapon> {
        let mut lines: Vec<(&str, Vec<WeaponProfile>)> = Vec::new();

        for row in self.wargear.get(id).into_iter().flatten() {
            let profile = WeaponProfile {
                name: field(row, "name").to_string(),
                range: field(row, "range").to_string(),
                kind: field(row, "type").to_string(),
                a: field(row, "a").to_string(),
                bs_ws: field(row, "bsWs").to_string(),
                s: field(row, "s").to_string(),
                ap: field(row, "ap").to_string(),
                d: field(row, "d").to_string(),
                desc: optional_field(row, "description"),
            };

            let line = field(row, "line");
            match lines.iter_mut().find(|(l, _)| *l == line) {
                Some((_, profiles)) => profiles.push(profile),
                None => lines.push((line, vec![profile])),
            }
        }

        lines
            .into_iter()
            .map(|(_, profiles)| Weapon {
                name: profiles[0].name.clone(),
                kind: profiles[0].kind.clone(),
                profiles,
            })
            .collect()
    }

    /// Abilities either reference the shared ability table or are inline.
    /// Rows that resolve to neither are dropped.
    fn abilities(&self, id: &str) -> Vec<Ability> {
        self.abilities
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|row| {
                let kind = field(row, "type").to_string();
                let ability_id = field(row, "abilityId");

                if !ability_id.is_empty() {
                    let shared = self.abilities_by_id.get(ability_id)?;
                    return Some(Ability {
                        name: field(shared, "name").to_string(),
                        description: field(shared, "description").to_string(),
                        kind,
                    });
                }

                let name = field(row, "name");
                (!name.is_empty()).then(|| Ability {
                    name: name.to_string(),
                    description: field(row, "description").to_string(),
                    kind,
                })
            })
            .collect()
    }

    fn keywords(&self, id: &str, faction: bool) -> Vec<String> {
        self.keywords
            .get(id)
            .into_iter()
            .flatten()
            .filter(|k| (field(k, "isFactionKeyword") == "true") == faction)
            .map(|k| field(k, "keyword").to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn tables() -> SourceTables {
        SourceTables::new()
            .with(
                SourceTable::Source,
                vec![
                    row(&[("id", "s1"), ("name", "Codex: Adeptus Custodes")]),
                    row(&[("id", "s2"), ("name", "Imperial Armour (Forge World)")]),
                    row(&[("id", "s3"), ("name", "Legends: Imperium")]),
                ],
            )
            .with(
                SourceTable::DatasheetsModels,
                vec![row(&[
                    ("datasheetId", "cg"),
                    ("name", "Custodian Guard"),
                    ("m", "6\""),
                    ("t", "6"),
                    ("sv", "2+"),
                    ("invSv", "4+"),
                    ("w", "3"),
                    ("ld", "6+"),
                    ("oc", "2"),
                ])],
            )
            .with(
                SourceTable::DatasheetsWargear,
                vec![
                    row(&[("datasheetId", "cg"), ("line", "1"), ("name", "Guardian spear"), ("type", "Ranged")]),
                    row(&[("datasheetId", "cg"), ("line", "2"), ("name", "Guardian spear"), ("type", "Melee")]),
                    row(&[("datasheetId", "cg"), ("line", "3"), ("name", "Misericordia ➤ strike"), ("type", "Melee")]),
                    row(&[("datasheetId", "cg"), ("line", "3"), ("name", "Misericordia ➤ sweep"), ("type", "Melee")]),
                ],
            )
            .with(
                SourceTable::Abilities,
                vec![row(&[("id", "a1"), ("name", "Deep Strike"), ("description", "Reserves.")])],
            )
            .with(
                SourceTable::DatasheetsAbilities,
                vec![
                    row(&[("datasheetId", "cg"), ("abilityId", "a1"), ("type", "Core")]),
                    row(&[("datasheetId", "cg"), ("name", "Stand Vigil"), ("description", "Reroll."), ("type", "Datasheet")]),
                    row(&[("datasheetId", "cg"), ("abilityId", "missing"), ("type", "Core")]),
                    row(&[("datasheetId", "cg"), ("type", "Datasheet")]),
                ],
            )
            .with(
                SourceTable::DatasheetsKeywords,
                vec![
                    row(&[("datasheetId", "cg"), ("keyword", "Infantry"), ("isFactionKeyword", "false")]),
                    row(&[("datasheetId", "cg"), ("keyword", "Adeptus Custodes"), ("isFactionKeyword", "true")]),
                    row(&[("datasheetId", "cg"), ("keyword", "Battleline"), ("isFactionKeyword", "false")]),
                ],
            )
            .with(
                SourceTable::DatasheetsUnitComposition,
                vec![row(&[("datasheetId", "cg"), ("description", "4-10 Custodian Guard")])],
            )
            .with(
                SourceTable::DatasheetsModelsCost,
                vec![
                    row(&[("datasheetId", "cg"), ("description", "4 models"), ("cost", "170")]),
                    row(&[("datasheetId", "cg"), ("description", "5 models"), ("cost", "215")]),
                ],
            )
            .with(
                SourceTable::DatasheetsLeader,
                vec![
                    row(&[("leaderId", "bc"), ("attachedId", "cg")]),
                    row(&[("leaderId", "sc"), ("attachedId", "cg")]),
                ],
            )
    }

    #[test]
    fn test_build_full_datasheet() {
        let tables = tables();
        let join = DatasheetJoin::build(&tables);
        let ds = join.datasheet(&row(&[
            ("id", "cg"),
            ("name", "Custodian Guard"),
            ("sourceId", "s1"),
            ("role", "Battleline"),
            ("loadout", ""),
        ]));

        assert_eq!(ds.name, "Custodian Guard");
        assert_eq!(ds.role.as_deref(), Some("Battleline"));
        assert_eq!(ds.loadout, None);
        assert!(!ds.is_forge_world);
        assert!(!ds.is_legends);

        assert_eq!(ds.models.len(), 1);
        assert_eq!(ds.models[0].inv_sv.as_deref(), Some("4+"));

        let weapons: Vec<_> = ds.weapons.iter().map(|w| (w.name.as_str(), w.profiles.len())).collect();
        assert_eq!(
            weapons,
            vec![
                ("Guardian spear", 1),
                ("Guardian spear", 1),
                ("Misericordia ➤ strike", 2)
            ]
        );
        assert_eq!(ds.weapons[2].kind, "Melee");

        let abilities: Vec<_> = ds.abilities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(abilities, vec!["Deep Strike", "Stand Vigil"]);
        assert_eq!(ds.abilities[0].kind, "Core");

        assert_eq!(ds.keywords, vec!["Infantry", "Battleline"]);
        assert_eq!(ds.faction_keywords, vec!["Adeptus Custodes"]);
        assert_eq!(ds.composition, vec!["4-10 Custodian Guard"]);
        assert_eq!(ds.points.len(), 2);
        assert_eq!(ds.points[1].cost, "215");

        assert!(ds.can_lead.is_empty());
        assert_eq!(ds.led_by, vec!["bc", "sc"]);
    }

    #[test]
    fn test_leader_index_both_directions() {
        let tables = tables();
        let leaders = LeaderIndex::build(tables.rows(SourceTable::DatasheetsLeader));

        assert_eq!(leaders.can_lead("bc"), vec!["cg"]);
        assert_eq!(leaders.led_by("cg"), vec!["bc", "sc"]);
        assert!(leaders.can_lead("cg").is_empty());
    }

    #[test]
    fn test_source_classification() {
        let tables = tables();
        let sources = SourceClassification::build(tables.rows(SourceTable::Source));

        assert!(sources.is_forge_world("s2"));
        assert!(sources.is_legends("s3"));
        assert!(!sources.is_forge_world("s1"));
        assert!(!sources.is_legends("s1"));
    }

    #[test]
    fn test_datasheet_without_children() {
        let tables = SourceTables::new();
        let join = DatasheetJoin::build(&tables);
        let ds = join.datasheet(&row(&[("id", "x"), ("name", "Lonely")]));

        assert!(ds.models.is_empty());
        assert!(ds.weapons.is_empty());
        assert!(ds.abilities.is_empty());
        assert!(ds.can_lead.is_empty());
    }
}

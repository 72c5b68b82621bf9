//! The set of source tables the reference build joins.

use std::collections::HashMap;

use super::csv::{field, Row};

/// Source tables published by the reference data site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceTable {
    Factions,
    Source,
    Datasheets,
    DatasheetsAbilities,
    DatasheetsKeywords,
    DatasheetsModels,
    DatasheetsWargear,
    DatasheetsUnitComposition,
    DatasheetsModelsCost,
    DatasheetsLeader,
    DatasheetsStratagems,
    DatasheetsEnhancements,
    DatasheetsDetachmentAbilities,
    Abilities,
    Stratagems,
    Enhancements,
    DetachmentAbilities,
    LastUpdate,
}

impl SourceTable {
    pub const ALL: [SourceTable; 18] = [
        SourceTable::Factions,
        SourceTable::Source,
        SourceTable::Datasheets,
        SourceTable::DatasheetsAbilities,
        SourceTable::DatasheetsKeywords,
        SourceTable::DatasheetsModels,
        SourceTable::DatasheetsWargear,
        SourceTable::DatasheetsUnitComposition,
        SourceTable::DatasheetsModelsCost,
        SourceTable::DatasheetsLeader,
        SourceTable::DatasheetsStratagems,
        SourceTable::DatasheetsEnhancements,
        SourceTable::DatasheetsDetachmentAbilities,
        SourceTable::Abilities,
        SourceTable::Stratagems,
        SourceTable::Enhancements,
        SourceTable::DetachmentAbilities,
        SourceTable::LastUpdate,
    ];

    /// Remote file name.
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceTable::Factions => "Factions.csv",
            SourceTable::Source => "Source.csv",
            SourceTable::Datasheets => "Datasheets.csv",
            SourceTable::DatasheetsAbilities => "Datasheets_abilities.csv",
            SourceTable::DatasheetsKeywords => "Datasheets_keywords.csv",
            SourceTable::DatasheetsModels => "Datasheets_models.csv",
            SourceTable::DatasheetsWargear => "Datasheets_wargear.csv",
            SourceTable::DatasheetsUnitComposition => "Datasheets_unit_composition.csv",
            SourceTable::DatasheetsModelsCost => "Datasheets_models_cost.csv",
            SourceTable::DatasheetsLeader => "Datasheets_leader.csv",
            SourceTable::DatasheetsStratagems => "Datasheets_stratagems.csv",
            SourceTable::DatasheetsEnhancements => "Datasheets_enhancements.csv",
            SourceTable::DatasheetsDetachmentAbilities => "Datasheets_detachment_abilities.csv",
            SourceTable::Abilities => "Abilities.csv",
            SourceTable::Stratagems => "Stratagems.csv",
            SourceTable::Enhancements => "Enhancements.csv",
            SourceTable::DetachmentAbilities => "Detachment_abilities.csv",
            SourceTable::LastUpdate => "Last_update.csv",
        }
    }

    /// Local cache file name: lower-case, dash separated.
    pub fn cache_name(&self) -> String {
        self.file_name().to_lowercase().replace('_', "-")
    }
}

/// Parsed rows for every source table.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    tables: HashMap<SourceTable, Vec<Row>>,
}

impl SourceTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: SourceTable, rows: Vec<Row>) {
        self.tables.insert(table, rows);
    }

    /// Builder method to add a table.
    pub fn with(mut self, table: SourceTable, rows: Vec<Row>) -> Self {
        self.insert(table, rows);
        self
    }

    /// Rows of a table; empty if the table was not loaded.
    pub fn rows(&self, table: SourceTable) -> &[Row] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, table: SourceTable) -> bool {
        self.tables.contains_key(&table)
    }

    /// Tables from [`SourceTable::ALL`] that have not been loaded.
    pub fn missing(&self) -> Vec<SourceTable> {
        SourceTable::ALL
            .iter()
            .copied()
            .filter(|t| !self.contains(*t))
            .collect()
    }
}

/// Rows grouped by the value of one column, preserving row order.
pub fn group_by<'a>(rows: &'a [Row], key: &str) -> HashMap<&'a str, Vec<&'a Row>> {
    rows.iter().fold(HashMap::new(), |mut acc, row| {
        acc.entry(field(row, key)).or_insert_with(Vec::new).push(row);
        acc
    })
}

/// Rows keyed by the value of one column; later rows replace earlier ones.
pub fn index_by<'a>(rows: &'a [Row], key: &str) -> HashMap<&'a str, &'a Row> {
    rows.iter().map(|row| (field(row, key), row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_cache_names() {
        assert_eq!(SourceTable::Factions.cache_name(), "factions.csv");
        assert_eq!(
            SourceTable::DatasheetsUnitComposition.cache_name(),
            "datasheets-unit-composition.csv"
        );
    }

    #[test]
    fn test_missing_tables() {
        let tables = SourceTables::new().with(SourceTable::Factions, Vec::new());
        let missing = tables.missing();

        assert_eq!(missing.len(), SourceTable::ALL.len() - 1);
        assert!(!missing.contains(&SourceTable::Factions));
        assert!(tables.rows(SourceTable::Datasheets).is_empty());
    }

    #[test]
    fn test_group_by_preserves_order() {
        let rows = vec![
            row(&[("datasheetId", "1"), ("line", "a")]),
            row(&[("datasheetId", "2"), ("line", "b")]),
            row(&[("datasheetId", "1"), ("line", "c")]),
        ];
        let grouped = group_by(&rows, "datasheetId");

        let lines: Vec<_> = grouped["1"].iter().map(|r| field(r, "line")).collect();
        assert_eq!(lines, vec!["a", "c"]);
        assert_eq!(grouped["2"].len(), 1);
    }

    #[test]
    fn test_index_by_last_wins() {
        let rows = vec![
            row(&[("id", "x"), ("name", "first")]),
            row(&[("id", "x"), ("name", "second")]),
        ];
        let index = index_by(&rows, "id");
        assert_eq!(field(index["x"], "name"), "second");
    }
}

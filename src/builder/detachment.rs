//! Reconstructing detachments from their rule, enhancement and stratagem rows.

use super::csv::{field, Row};
use super::tables::{SourceTable, SourceTables};
use crate::models::{Detachment, DetachmentRule, Enhancement, Stratagem};

/// Stratagem from a stratagem row.
pub fn stratagem(row: &Row) -> Stratagem {
    let turn = field(row, "turn");
    let when = (!turn.is_empty()).then(|| format!("{} – {}", turn, field(row, "phase")));

    Stratagem {
        name: field(row, "name").to_string(),
        kind: field(row, "type").to_string(),
        cost: field(row, "cpCost").to_string(),
        when,
        description: field(row, "description").to_string(),
    }
}

/// Stratagems that belong to no faction.
pub fn core_stratagems(tables: &SourceTables) -> Vec<Stratagem> {
    tables
        .rows(SourceTable::Stratagems)
        .iter()
        .filter(|row| field(row, "factionId").trim().is_empty())
        .map(stratagem)
        .collect()
}

/// All detachments of one faction, sorted by name.
///
/// Rows without a detachment name are skipped.
pub fn build_detachments(tables: &SourceTables, faction_id: &str) -> Vec<Detachment> {
    let mut detachments: Vec<Detachment> = Vec::new();

    for row in faction_rows(tables, SourceTable::DetachmentAbilities, faction_id) {
        if let Some(det) = slot(&mut detachments, row) {
            det.rules.push(DetachmentRule {
                name: field(row, "name").to_string(),
                description: field(row, "description").to_string(),
            });
        }
    }

    for row in faction_rows(tables, SourceTable::Enhancements, faction_id) {
        if let Some(det) = slot(&mut detachments, row) {
            det.enhancements.push(Enhancement {
                name: field(row, "name").to_string(),
                description: field(row, "description").to_string(),
                cost: field(row, "cost").to_string(),
            });
        }
    }

    for row in faction_rows(tables, SourceTable::Stratagems, faction_id) {
        if let Some(det) = slot(&mut detachments, row) {
            det.stratagems.push(stratagem(row));
        }
    }

    detachments.sort_by(|a, b| compare_names(&a.name, &b.name));
    detachments
}

fn faction_rows<'t>(
    tables: &'t SourceTables,
    table: SourceTable,
    faction_id: &'t str,
) -> impl Iterator<Item = &'t Row> + 't {
    tables
        .rows(table)
        .iter()
        .filter(move |row| field(row, "factionId") == faction_id)
}

/// The detachment a row belongs to, created on first sight.
fn slot<'d>(detachments: &'d mut Vec<Detachment>, row: &Row) -> Option<&'d mut Detachment> {
    let name = field(row, "detachment");
    if name.is_empty() {
        return None;
    }

    let pos = match detachments.iter().position(|d| d.name == name) {
        Some(pos) => pos,
        None => {
            detachments.push(Detachment::new(name));
            detachments.len() - 1
        }
    };
    detachments.get_mut(pos)
}

/// Case-insensitive name order, falling back to byte order.
pub fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

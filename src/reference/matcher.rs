//! Matching roster names against the reference dataset.
//!
//! The roster tool and the reference dataset are maintained independently,
//! so names diverge. Matching goes exact first, then alias, then partial,
//! and never fails: the worst outcome is "no match".

use std::collections::HashMap;

use crate::models::{Datasheet, Detachment, FactionDocument, FactionSummary};
use crate::normalize::normalize;

/// Normalized roster catalogue fragment -> normalized reference faction name.
///
/// Consulted in order, only when no reference faction name appears directly
/// in the catalogue name.
pub const CATALOGUE_ALIASES: &[(&str, &str)] = &[
    ("adeptusastartes", "spacemarines"),
    ("hereticsastartes", "chaosspacemarines"),
    ("craftworld", "aeldari"),
    ("drukhari", "drukhari"),
    ("genestealercults", "genestealercults"),
    ("adeptusmechanicus", "adeptusmechanicus"),
    ("adeptuscustodes", "adeptuscustodes"),
    ("adeptasororitas", "adeptasororitas"),
    ("astramilitarum", "astramilitarum"),
    ("greyknight", "greyknights"),
    ("deathguard", "deathguard"),
    ("thousandsons", "thousandsons"),
    ("worldeaters", "worldeaters"),
    ("emperorschildren", "emperorschildren"),
    ("chaosknights", "chaosknights"),
    ("imperialknights", "imperialknights"),
    ("chaosdaemons", "chaosdaemons"),
    ("leaguesofvotann", "leaguesofvotann"),
    ("tauempire", "tauempire"),
    ("tyranids", "tyranids"),
    ("necrons", "necrons"),
    ("orks", "orks"),
];

/// Pick the reference faction for a roster catalogue name.
///
/// Longer normalized faction names are tried first so "Chaos Space Marines"
/// wins over "Space Marines" when both appear in the catalogue name.
pub fn resolve_faction<'a>(
    catalogue_name: &str,
    factions: &'a [FactionSummary],
) -> Option<&'a FactionSummary> {
    let catalogue = normalize(catalogue_name);

    let mut by_length: Vec<(&FactionSummary, String)> =
        factions.iter().map(|f| (f, normalize(&f.name))).collect();
    // Stable sort: equal lengths keep index order
    by_length.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let direct = by_length
        .iter()
        .find(|(_, name)| catalogue.contains(name.as_str()))
        .map(|(faction, _)| *faction);
    if direct.is_some() {
        return direct;
    }

    CATALOGUE_ALIASES
        .iter()
        .filter(|(fragment, _)| catalogue.contains(fragment))
        .find_map(|(_, target)| factions.iter().find(|f| normalize(&f.name) == *target))
}

/// Normalized datasheet name -> position in the document's datasheet list.
///
/// Built once per faction document. Later datasheets with the same
/// normalized name replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_name: HashMap<String, usize>,
}

impl NameIndex {
    pub fn build(document: &FactionDocument) -> Self {
        let by_name = document
            .datasheets
            .iter()
            .enumerate()
            .map(|(i, ds)| (normalize(&ds.name), i))
            .collect();
        Self { by_name }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Exact normalized-name lookup.
    pub fn lookup_unit<'a>(
        &self,
        document: &'a FactionDocument,
        unit_name: &str,
    ) -> Option<&'a Datasheet> {
        self.by_name
            .get(&normalize(unit_name))
            .and_then(|&i| document.datasheets.get(i))
    }
}

/// Find a detachment by exact normalized name, then by containment in
/// either direction ("Gladius Task Force" and "Gladius" match each other).
pub fn lookup_detachment<'a>(
    document: &'a FactionDocument,
    detachment_name: &str,
) -> Option<&'a Detachment> {
    let wanted = normalize(detachment_name);
    if wanted.is_empty() {
        return None;
    }

    document
        .detachments
        .iter()
        .find(|d| normalize(&d.name) == wanted)
        .or_else(|| {
            document.detachments.iter().find(|d| {
                let name = normalize(&d.name);
                !name.is_empty() && (name.contains(&wanted) || wanted.contains(&name))
            })
        })
}

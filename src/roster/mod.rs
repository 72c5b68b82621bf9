//! Roster parsing.
//!
//! Flattens an uploaded roster export into a [`Roster`]. Parsing is
//! permissive: missing or malformed fields fall back to defaults. Only two
//! things are errors, an unreadable file and a document that is not a
//! roster at all.

pub mod assemble;
pub mod collect;
pub mod rules;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Roster, RosterDocument};

pub use assemble::assemble_roster;
pub use collect::{gather_keywords, gather_profiles, gather_rules, ProfileSet};
pub use rules::{clean_rule_text, find_rule};

/// Errors that can occur while reading an uploaded roster.
#[derive(Debug, Error)]
pub enum RosterError {
    /// The file is not valid JSON.
    #[error("Could not read the file. Is it valid JSON? ({0})")]
    Unreadable(#[from] serde_json::Error),

    /// The JSON is not shaped like a roster export.
    #[error("Invalid roster format. Please upload a BattleScribe or NewRecruit JSON export.")]
    InvalidFormat,
}

/// Parse an uploaded roster file.
pub fn parse_roster_str(text: &str) -> Result<Roster, RosterError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    parse_roster_value(value)
}

/// Parse an already-decoded JSON document.
pub fn parse_roster_value(value: serde_json::Value) -> Result<Roster, RosterError> {
    let document: RosterDocument = serde_json::from_value(value).map_err(|e| {
        warn!("Document is not a roster export: {}", e);
        RosterError::InvalidFormat
    })?;

    let roster = assemble_roster(&document.roster).ok_or_else(|| {
        warn!("Roster export has no forces");
        RosterError::InvalidFormat
    })?;

    info!(
        "Parsed roster '{}' with {} units",
        roster.army_name,
        roster.units.len()
    );
    Ok(roster)
}

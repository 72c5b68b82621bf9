//! In-memory viewing session.
//!
//! Holds the current roster, the leader attachments the user has made, and
//! the reference data loaded for it. Nothing here is persisted; a new upload
//! resets the whole session.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::models::{Datasheet, Detachment, Roster, Theme, Unit};
use crate::reference::FactionReference;
use crate::roster::{parse_roster_str, RosterError};

const VEHICLE_KEYWORD: &str = "Vehicle";
const INFANTRY_KEYWORD: &str = "Infantry";

/// Leader unit id to the id of the unit it is attached to.
///
/// Values are never mutated in place; every change yields a new map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    links: BTreeMap<String, String>,
}

impl Attachments {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy with `leader_id` attached to `target_id`, replacing any
    /// previous attachment of that leader.
    pub fn with_attached(&self, leader_id: &str, target_id: &str) -> Self {
        let mut links = self.links.clone();
        links.insert(leader_id.to_string(), target_id.to_string());
        Self { links }
    }

    /// A copy with `leader_id` detached.
    pub fn without(&self, leader_id: &str) -> Self {
        let mut links = self.links.clone();
        links.remove(leader_id);
        Self { links }
    }

    pub fn target_of(&self, leader_id: &str) -> Option<&str> {
        self.links.get(leader_id).map(String::as_str)
    }

    /// Whether the unit is attached to another unit as a leader.
    pub fn is_attached(&self, unit_id: &str) -> bool {
        self.links.contains_key(unit_id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// A unit as listed, with the leaders currently attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayUnit<'a> {
    pub unit: &'a Unit,
    pub attached_leaders: Vec<&'a Unit>,
}

/// Units to list: attached leaders are folded into the unit they lead.
pub fn display_units<'a>(units: &'a [Unit], attachments: &Attachments) -> Vec<DisplayUnit<'a>> {
    units
        .iter()
        .filter(|unit| !attachments.is_attached(&unit.id))
        .map(|unit| DisplayUnit {
            unit,
            attached_leaders: units
                .iter()
                .filter(|leader| attachments.target_of(&leader.id) == Some(unit.id.as_str()))
                .collect(),
        })
        .collect()
}

/// Units a leader may be attached to: non-characters that are not vehicles,
/// unless they are also infantry.
pub fn attachable_targets(units: &[Unit]) -> Vec<&Unit> {
    units
        .iter()
        .filter(|u| {
            !u.is_character
                && (!u.has_keyword(VEHICLE_KEYWORD) || u.has_keyword(INFANTRY_KEYWORD))
        })
        .collect()
}

/// A listed unit with its reference datasheet, when one matched.
#[derive(Debug, Clone)]
pub struct EnrichedUnit<'a> {
    pub unit: &'a Unit,
    pub attached_leaders: Vec<&'a Unit>,
    pub datasheet: Option<&'a Datasheet>,
}

/// Everything a front end needs to render a roster.
#[derive(Debug, Clone)]
pub struct RosterView<'a> {
    pub roster: &'a Roster,
    pub units: Vec<EnrichedUnit<'a>>,
    pub detachment: Option<&'a Detachment>,
    pub theme: Theme,
    pub reference_loaded: bool,
}

impl RosterView<'_> {
    /// Number of listed units that found a reference datasheet.
    pub fn matched_units(&self) -> usize {
        self.units.iter().filter(|u| u.datasheet.is_some()).count()
    }
}

/// Combine a roster with optional reference data.
///
/// Without reference data every unit is still listed, just without a
/// datasheet.
pub fn build_view<'a>(
    roster: &'a Roster,
    attachments: &Attachments,
    reference: Option<&'a FactionReference>,
    theme: Theme,
) -> RosterView<'a> {
    let units = display_units(&roster.units, attachments)
        .into_iter()
        .map(|listed| {
            let name = listed.unit.name.as_str();
            let datasheet = reference.and_then(|r| r.unit(name));
            if reference.is_some() && datasheet.is_none() {
                debug!("No datasheet for unit '{}'", name);
            }
            EnrichedUnit {
                unit: listed.unit,
                attached_leaders: listed.attached_leaders,
                datasheet,
            }
        })
        .collect();

    let detachment = reference.and_then(|r| {
        roster
            .detachment_name
            .as_deref()
            .and_then(|name| r.detachment(name))
    });

    RosterView {
        roster,
        units,
        detachment,
        theme,
        reference_loaded: reference.is_some(),
    }
}

/// Current session state.
#[derive(Debug, Default)]
pub struct Session {
    generation: u64,
    roster: Option<Roster>,
    attachments: Attachments,
    reference: Option<Arc<FactionReference>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every upload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn attachments(&self) -> &Attachments {
        &self.attachments
    }

    pub fn reference(&self) -> Option<&FactionReference> {
        self.reference.as_deref()
    }

    /// Replace the session with a newly uploaded roster.
    ///
    /// Returns the generation a reference load for this roster must carry.
    /// A failed parse still clears the previous roster.
    pub fn load_roster(&mut self, text: &str) -> Result<u64, RosterError> {
        self.generation += 1;
        self.roster = None;
        self.attachments = Attachments::new();
        self.reference = None;

        self.roster = Some(parse_roster_str(text)?);
        Ok(self.generation)
    }

    /// Install reference data loaded for `generation`.
    ///
    /// Results for an older upload are dropped; returns whether the result
    /// was applied.
    pub fn apply_reference(
        &mut self,
        generation: u64,
        reference: Option<Arc<FactionReference>>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                "Discarding reference result for generation {} (current {})",
                generation, self.generation
            );
            return false;
        }
        if let Some(r) = &reference {
            info!("Reference faction {} applied", r.id());
        }
        self.reference = reference;
        true
    }

    /// Attach a leader to a target unit. Both must be distinct units of the
    /// current roster.
    pub fn attach(&mut self, leader_id: &str, target_id: &str) -> bool {
        let Some(roster) = &self.roster else {
            return false;
        };
        if leader_id == target_id || roster.unit(leader_id).is_none() || roster.unit(target_id).is_none() {
            return false;
        }
        self.attachments = self.attachments.with_attached(leader_id, target_id);
        true
    }

    pub fn detach(&mut self, leader_id: &str) {
        self.attachments = self.attachments.without(leader_id);
    }

    /// Render-ready view of the current roster.
    pub fn view(&self, theme_override: Option<Theme>) -> Option<RosterView<'_>> {
        let roster = self.roster.as_ref()?;
        let theme = theme_override
            .unwrap_or_else(|| Theme::for_catalogue(Some(roster.catalogue_name.as_str())));
        Some(build_view(
            roster,
            &self.attachments,
            self.reference.as_deref(),
            theme,
        ))
    }
}

//! Recursive collection over a selection tree.
//!
//! Every collector is a pure function of the subtree: each call builds its
//! own result and children are folded in, so sibling branches never share
//! an accumulator.

use std::collections::BTreeMap;

use crate::models::{Force, Profile, ProfileKind, Rule, Selection};

/// Category names that mark administrative groupings rather than keywords.
pub const EXCLUDED_CATEGORIES: &[&str] = &["Configuration", "Uncategorized"];

/// Profiles of a subtree, split by kind and deduplicated by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSet {
    pub unit: Vec<Profile>,
    pub ranged: Vec<Profile>,
    pub melee: Vec<Profile>,
    pub abilities: Vec<Profile>,
}

impl ProfileSet {
    fn bucket_mut(&mut self, kind: ProfileKind) -> &mut Vec<Profile> {
        match kind {
            ProfileKind::Unit => &mut self.unit,
            ProfileKind::Ranged => &mut self.ranged,
            ProfileKind::Melee => &mut self.melee,
            ProfileKind::Abilities => &mut self.abilities,
        }
    }

    /// Add a profile unless one with the same name is already in its bucket.
    /// Profiles of unknown kinds are ignored.
    pub fn with(mut self, profile: &Profile) -> Self {
        if let Some(kind) = profile.kind() {
            let bucket = self.bucket_mut(kind);
            if !bucket.iter().any(|p| p.name == profile.name) {
                bucket.push(profile.clone());
            }
        }
        self
    }

    /// Append `other` after `self`, keeping the first profile of each name.
    pub fn merge(self, other: ProfileSet) -> Self {
        other
            .unit
            .iter()
            .chain(&other.ranged)
            .chain(&other.melee)
            .chain(&other.abilities)
            .fold(self, |acc, p| acc.with(p))
    }

    /// Whether any unit, ranged or melee profile was found.
    pub fn has_combat_profiles(&self) -> bool {
        !self.unit.is_empty() || !self.ranged.is_empty() || !self.melee.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_combat_profiles() && self.abilities.is_empty()
    }
}

/// Collect profiles depth-first, self before children. First name wins.
pub fn gather_profiles(selection: &Selection) -> ProfileSet {
    let own = selection
        .profiles
        .iter()
        .fold(ProfileSet::default(), |acc, p| acc.with(p));

    selection
        .selections
        .iter()
        .fold(own, |acc, child| acc.merge(gather_profiles(child)))
}

/// Keywords from the selection's own categories, in order, without duplicates.
pub fn gather_keywords(selection: &Selection) -> Vec<String> {
    selection
        .categories
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| !EXCLUDED_CATEGORIES.contains(name))
        .fold(Vec::new(), |mut acc, name| {
            if !acc.iter().any(|k| k == name) {
                acc.push(name.to_string());
            }
            acc
        })
}

fn rule_map(rules: &[Rule]) -> BTreeMap<String, String> {
    rules
        .iter()
        .map(|r| (r.name.to_lowercase(), r.description.clone()))
        .collect()
}

/// Later maps override earlier ones.
fn overlay(mut base: BTreeMap<String, String>, later: BTreeMap<String, String>) -> BTreeMap<String, String> {
    base.extend(later);
    base
}

/// Collect rule text depth-first: own rules, then child selections, then
/// nested forces. Keys are lower-cased names; the last rule visited wins.
pub fn gather_rules(selection: &Selection) -> BTreeMap<String, String> {
    let with_children = selection
        .selections
        .iter()
        .fold(rule_map(&selection.rules), |acc, child| {
            overlay(acc, gather_rules(child))
        });

    selection
        .forces
        .iter()
        .fold(with_children, |acc, force| overlay(acc, gather_force_rules(force)))
}

/// Same traversal as [`gather_rules`], rooted at a force block.
pub fn gather_force_rules(force: &Force) -> BTreeMap<String, String> {
    let with_selections = force
        .selections
        .iter()
        .fold(rule_map(&force.rules), |acc, child| {
            overlay(acc, gather_rules(child))
        });

    force
        .forces
        .iter()
        .fold(with_selections, |acc, nested| {
            overlay(acc, gather_force_rules(nested))
        })
}

//! Faction display themes.
//!
//! Presentation concern only: the core never reads this, the view layer
//! receives it as read-only configuration.

use serde::{Deserialize, Serialize};

/// Named colour palette for a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Ultramarines,
    BlackTemplars,
    ImperialFists,
    BloodAngels,
    Necrons,
    Tyranids,
    Chaos,
    Aeldari,
    Tau,
    Orks,
    Custodes,
    #[default]
    Default,
}

/// Ordered substring rules; first hit wins.
const THEME_RULES: &[(&[&str], Theme)] = &[
    (&["ultramarine"], Theme::Ultramarines),
    (&["black templar"], Theme::BlackTemplars),
    (&["imperial fist"], Theme::ImperialFists),
    (&["blood angel", "flesh tearer"], Theme::BloodAngels),
    (&["death guard"], Theme::Necrons),
    (&["world eater"], Theme::Chaos),
    (&["necron"], Theme::Necrons),
    (&["tyranid"], Theme::Tyranids),
    (&["chaos", "thousand sons"], Theme::Chaos),
    (&["aeldari", "eldar"], Theme::Aeldari),
    (&["tau", "t'au"], Theme::Tau),
    (&["ork"], Theme::Orks),
    (&["custodes"], Theme::Custodes),
];

impl Theme {
    /// Pick a theme from a catalogue name.
    pub fn for_catalogue(catalogue_name: Option<&str>) -> Self {
        let Some(name) = catalogue_name else {
            return Theme::Default;
        };
        let lower = name.to_lowercase();

        THEME_RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
            .map(|(_, theme)| *theme)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Theme::Ultramarines => "ultramarines",
            Theme::BlackTemplars => "black_templars",
            Theme::ImperialFists => "imperial_fists",
            Theme::BloodAngels => "blood_angels",
            Theme::Necrons => "necrons",
            Theme::Tyranids => "tyranids",
            Theme::Chaos => "chaos",
            Theme::Aeldari => "aeldari",
            Theme::Tau => "tau",
            Theme::Orks => "orks",
            Theme::Custodes => "custodes",
            Theme::Default => "default",
        };
        write!(f, "{}", name)
    }
}

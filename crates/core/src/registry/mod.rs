//! Static catalog of the six canonical narrative structures.
//!
//! The catalog is plain `'static` data built at compile time; lookups never
//! allocate beyond the error path and there is nothing to synchronise.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{NarrativeVizError, Result};

/// Three-colour scheme attached to a narrative structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
}

/// Geometric shape used to place a structure's stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    Circular,
    Grid,
    Concentric,
    Triangular,
    Linear,
    Scattered,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 6] = [
        LayoutKind::Circular,
        LayoutKind::Grid,
        LayoutKind::Concentric,
        LayoutKind::Triangular,
        LayoutKind::Linear,
        LayoutKind::Scattered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutKind::Circular => "circular",
            LayoutKind::Grid => "grid",
            LayoutKind::Concentric => "concentric",
            LayoutKind::Triangular => "triangular",
            LayoutKind::Linear => "linear",
            LayoutKind::Scattered => "scattered",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = NarrativeVizError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| NarrativeVizError::UnknownLayoutType {
                name: s.to_string(),
                valid: Self::ALL.iter().map(|kind| kind.as_str()).collect(),
            })
    }
}

/// Formal model of a narrative structure.
///
/// `connections` holds `(source, target)` pairs of indices into `stages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NarrativeModel {
    pub name: &'static str,
    pub display_name: &'static str,
    pub stages: &'static [&'static str],
    pub layout: LayoutKind,
    pub palette: Palette,
    pub connections: &'static [(usize, usize)],
    pub description: &'static str,
}

impl NarrativeModel {
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

static MODELS: [NarrativeModel; 6] = [
    NarrativeModel {
        name: "heros_journey",
        display_name: "The Hero's Journey",
        stages: &[
            "ordinary_world",
            "call_to_adventure",
            "refusal_of_the_call",
            "meeting_the_mentor",
            "crossing_the_threshold",
            "tests_allies_enemies",
            "approach_inmost_cave",
            "ordeal",
            "reward",
            "the_road_back",
            "resurrection",
            "return_with_elixir",
        ],
        layout: LayoutKind::Circular,
        palette: Palette {
            primary: "#c9a227",
            secondary: "#5c3d2e",
            accent: "#2d5aa0",
        },
        // Closed ring: the last stage links back to the first.
        connections: &[
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 8),
            (8, 9),
            (9, 10),
            (10, 11),
            (11, 0),
        ],
        description: "Campbell's monomyth: a circular journey of departure, initiation, and return",
    },
    NarrativeModel {
        name: "kishotenketsu",
        display_name: "Kishōtenketsu",
        stages: &[
            "ki_introduction",
            "sho_development",
            "ten_twist",
            "ketsu_reconciliation",
        ],
        layout: LayoutKind::Grid,
        palette: Palette {
            primary: "#1a1a1a",
            secondary: "#f5f0e8",
            accent: "#d4453b",
        },
        connections: &[(0, 1), (1, 2), (2, 3)],
        description:
            "Four-act structure without conflict: introduction, development, twist, reconciliation",
    },
    NarrativeModel {
        name: "ring_composition",
        display_name: "Ring Composition",
        stages: &[
            "opening_frame",
            "first_elaboration",
            "deepening",
            "central_pivot",
            "mirror_deepening",
            "mirror_elaboration",
            "closing_frame",
        ],
        layout: LayoutKind::Concentric,
        palette: Palette {
            primary: "#4a1d6b",
            secondary: "#c0c0c0",
            accent: "#b8860b",
        },
        connections: &[(0, 6), (1, 5), (2, 4)],
        description: "Palindromic narrative where the ending mirrors the beginning",
    },
    NarrativeModel {
        name: "freytags_pyramid",
        display_name: "Freytag's Pyramid",
        stages: &[
            "exposition",
            "rising_action",
            "climax",
            "falling_action",
            "denouement",
        ],
        layout: LayoutKind::Triangular,
        palette: Palette {
            primary: "#4a4a5a",
            secondary: "#cc3333",
            accent: "#3366cc",
        },
        connections: &[(0, 1), (1, 2), (2, 3), (3, 4)],
        description: "Five-act dramatic structure with rising tension, climax, and resolution",
    },
    NarrativeModel {
        name: "three_act",
        display_name: "Three-Act Structure",
        stages: &["act_i_setup", "act_ii_confrontation", "act_iii_resolution"],
        layout: LayoutKind::Linear,
        palette: Palette {
            primary: "#2d8244",
            secondary: "#d4a017",
            accent: "#8b1a1a",
        },
        connections: &[(0, 1), (1, 2)],
        description: "Classical dramatic structure: setup, confrontation, resolution",
    },
    NarrativeModel {
        name: "in_medias_res",
        display_name: "In Medias Res",
        stages: &[
            "mid_action_opening",
            "flashback_origin",
            "flashback_development",
            "return_to_present",
            "continuation",
            "resolution",
        ],
        layout: LayoutKind::Scattered,
        palette: Palette {
            primary: "#7b4bb3",
            secondary: "#a0845c",
            accent: "#00a8b5",
        },
        connections: &[(0, 3), (1, 2), (2, 3), (3, 4), (4, 5)],
        description:
            "Beginning in the middle of the action, with temporal displacement as narrative device",
    },
];

/// Returns the full catalog in its canonical order.
pub fn models() -> &'static [NarrativeModel] {
    &MODELS
}

/// Looks up a model by its snake_case name.
pub fn get_model(name: &str) -> Result<&'static NarrativeModel> {
    MODELS
        .iter()
        .find(|model| model.name == name)
        .ok_or_else(|| NarrativeVizError::UnknownModel {
            name: name.to_string(),
            valid: list_models(),
        })
}

pub fn list_models() -> Vec<&'static str> {
    MODELS.iter().map(|model| model.name).collect()
}

pub fn model_count() -> usize {
    MODELS.len()
}

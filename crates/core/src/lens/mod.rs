//! Presentation transforms applied on top of a computed layout.
//!
//! A lens never moves a stage or renames it; it only decides how the stage
//! looks. Output records keep the universal drawing fields in [`LensedStage`]
//! and the per-lens extras in the [`LensAttributes`] variant.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{layout::StagePosition, NarrativeVizError, Result};

const TOPOGRAPHIC_STROKE: &str = "#888";

/// One of the four built-in lenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LensKind {
    Chromatic,
    Topographic,
    Temporal,
    Relational,
}

impl LensKind {
    pub const ALL: [LensKind; 4] = [
        LensKind::Chromatic,
        LensKind::Topographic,
        LensKind::Temporal,
        LensKind::Relational,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LensKind::Chromatic => "chromatic",
            LensKind::Topographic => "topographic",
            LensKind::Temporal => "temporal",
            LensKind::Relational => "relational",
        }
    }

    pub fn config(self) -> &'static LensParameters {
        match self {
            LensKind::Chromatic => &LENS_CONFIGS[0],
            LensKind::Topographic => &LENS_CONFIGS[1],
            LensKind::Temporal => &LENS_CONFIGS[2],
            LensKind::Relational => &LENS_CONFIGS[3],
        }
    }
}

impl fmt::Display for LensKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LensKind {
    type Err = NarrativeVizError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| NarrativeVizError::UnknownLens {
                name: s.to_string(),
                valid: available_lenses(),
            })
    }
}

/// Visual knobs for a lens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LensParameters {
    pub name: LensKind,
    pub description: &'static str,
    pub saturation_boost: f64,
    pub opacity_base: f64,
    pub stroke_weight: f64,
    pub animation_duration: f64,
}

impl LensParameters {
    /// Parameters with the shared defaults (1.0, 0.85, 1.5, 3.0).
    pub const fn new(name: LensKind, description: &'static str) -> Self {
        Self {
            name,
            description,
            saturation_boost: 1.0,
            opacity_base: 0.85,
            stroke_weight: 1.5,
            animation_duration: 3.0,
        }
    }
}

static LENS_CONFIGS: [LensParameters; 4] = [
    LensParameters {
        saturation_boost: 1.4,
        opacity_base: 0.9,
        ..LensParameters::new(
            LensKind::Chromatic,
            "Maximizes color variation; structures distinguished by hue and saturation",
        )
    },
    LensParameters {
        saturation_boost: 0.8,
        opacity_base: 0.75,
        stroke_weight: 2.0,
        ..LensParameters::new(
            LensKind::Topographic,
            "Maps narrative tension to visual elevation with contour lines",
        )
    },
    LensParameters {
        animation_duration: 5.0,
        opacity_base: 0.6,
        ..LensParameters::new(
            LensKind::Temporal,
            "Animates the structure through time; duration and pacing become visible",
        )
    },
    LensParameters {
        stroke_weight: 3.0,
        opacity_base: 0.7,
        ..LensParameters::new(
            LensKind::Relational,
            "Emphasizes connections between stages with weighted edges",
        )
    },
];

pub fn available_lenses() -> Vec<&'static str> {
    LensKind::ALL.iter().map(|kind| kind.as_str()).collect()
}

pub fn get_lens_config(name: &str) -> Result<&'static LensParameters> {
    Ok(name.parse::<LensKind>()?.config())
}

/// Lens-specific presentation data, tagged by the lens that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "lens", rename_all = "snake_case")]
pub enum LensAttributes {
    Chromatic {
        hue_shift: f64,
        saturation_boost: f64,
    },
    Topographic {
        elevation: f64,
    },
    Temporal {
        animation_delay: f64,
        animation_duration: f64,
    },
    Relational,
}

impl LensAttributes {
    pub fn kind(&self) -> LensKind {
        match self {
            LensAttributes::Chromatic { .. } => LensKind::Chromatic,
            LensAttributes::Topographic { .. } => LensKind::Topographic,
            LensAttributes::Temporal { .. } => LensKind::Temporal,
            LensAttributes::Relational => LensKind::Relational,
        }
    }
}

/// A stage position enriched with presentation attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LensedStage {
    pub name: String,
    /// Text drawn under the node.
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
    pub opacity: f64,
    pub stroke_color: String,
    pub connection_opacity: f64,
    #[serde(flatten)]
    pub attributes: LensAttributes,
}

impl LensedStage {
    fn from_position(
        position: &StagePosition,
        radius: f64,
        opacity: f64,
        stroke_color: &str,
        connection_opacity: f64,
        attributes: LensAttributes,
    ) -> Self {
        Self {
            name: position.name.clone(),
            label: position.display_label(),
            x: position.x,
            y: position.y,
            radius,
            color: position.color.clone(),
            opacity,
            stroke_color: stroke_color.to_string(),
            connection_opacity,
            attributes,
        }
    }

    pub fn lens(&self) -> LensKind {
        self.attributes.kind()
    }

    pub fn elevation(&self) -> Option<f64> {
        match self.attributes {
            LensAttributes::Topographic { elevation } => Some(elevation),
            _ => None,
        }
    }

    pub fn animation_delay(&self) -> Option<f64> {
        match self.attributes {
            LensAttributes::Temporal {
                animation_delay, ..
            } => Some(animation_delay),
            _ => None,
        }
    }
}

/// Applies the lens named `name` to `positions`.
pub fn apply_lens_by_name(name: &str, positions: &[StagePosition]) -> Result<Vec<LensedStage>> {
    Ok(apply_lens(name.parse()?, positions))
}

/// Applies `lens` to every position. Length and order are preserved.
pub fn apply_lens(lens: LensKind, positions: &[StagePosition]) -> Vec<LensedStage> {
    tracing::debug!(%lens, stages = positions.len(), "applying lens");
    let config = lens.config();
    match lens {
        LensKind::Chromatic => chromatic(positions, config),
        LensKind::Topographic => topographic(positions, config),
        LensKind::Temporal => temporal(positions, config),
        LensKind::Relational => relational(positions, config),
    }
}

/// Position of `index` within a sequence of `count`, in `[0, 1)`.
fn progress(index: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        index as f64 / count as f64
    }
}

/// Rounds to `places` decimals, sending exact ties to the even neighbour
/// (`0.625` becomes `0.62`).
fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

fn chromatic(positions: &[StagePosition], config: &LensParameters) -> Vec<LensedStage> {
    let n = positions.len();
    positions
        .iter()
        .enumerate()
        .map(|(i, position)| {
            LensedStage::from_position(
                position,
                position.radius * 1.1,
                config.opacity_base,
                &position.color,
                0.3,
                LensAttributes::Chromatic {
                    hue_shift: (360.0 * i as f64 / n as f64) % 360.0,
                    saturation_boost: config.saturation_boost,
                },
            )
        })
        .collect()
}

/// Lower on the canvas means lower elevation.
fn topographic(positions: &[StagePosition], config: &LensParameters) -> Vec<LensedStage> {
    if positions.is_empty() {
        return Vec::new();
    }

    let min_y = positions.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = positions
        .iter()
        .map(|p| p.y)
        .fold(f64::NEG_INFINITY, f64::max);
    let span = if max_y > min_y { max_y - min_y } else { 1.0 };

    positions
        .iter()
        .map(|position| {
            let elevation = 1.0 - (position.y - min_y) / span;
            LensedStage::from_position(
                position,
                position.radius * (0.8 + 0.4 * elevation),
                config.opacity_base + 0.15 * elevation,
                TOPOGRAPHIC_STROKE,
                0.5,
                LensAttributes::Topographic {
                    elevation: round_to(elevation, 3),
                },
            )
        })
        .collect()
}

fn temporal(positions: &[StagePosition], config: &LensParameters) -> Vec<LensedStage> {
    let n = positions.len();
    positions
        .iter()
        .enumerate()
        .map(|(i, position)| {
            let t = progress(i, n);
            LensedStage::from_position(
                position,
                position.radius,
                config.opacity_base + 0.3 * t,
                &position.color,
                0.2 + 0.3 * t,
                LensAttributes::Temporal {
                    animation_delay: round_to(config.animation_duration * i as f64 / n as f64, 2),
                    animation_duration: config.animation_duration,
                },
            )
        })
        .collect()
}

/// Shrinks nodes so the edges carry the picture.
fn relational(positions: &[StagePosition], config: &LensParameters) -> Vec<LensedStage> {
    positions
        .iter()
        .map(|position| {
            LensedStage::from_position(
                position,
                position.radius * 0.7,
                config.opacity_base,
                &position.color,
                0.7,
                LensAttributes::Relational,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;

    fn layout(name: &str) -> Vec<StagePosition> {
        LayoutEngine::default().compute_layout(name).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn catalog_lists_four_lenses() {
        assert_eq!(
            available_lenses(),
            vec!["chromatic", "topographic", "temporal", "relational"]
        );
        for name in available_lenses() {
            assert_eq!(get_lens_config(name).unwrap().name.as_str(), name);
        }
    }

    #[test]
    fn lens_parameters_carry_overrides_and_defaults() {
        let chromatic = get_lens_config("chromatic").unwrap();
        assert_eq!(chromatic.saturation_boost, 1.4);
        assert_eq!(chromatic.opacity_base, 0.9);
        assert_eq!(chromatic.stroke_weight, 1.5);
        assert_eq!(chromatic.animation_duration, 3.0);

        let temporal = get_lens_config("temporal").unwrap();
        assert_eq!(temporal.animation_duration, 5.0);
        assert_eq!(temporal.saturation_boost, 1.0);

        assert_eq!(get_lens_config("relational").unwrap().stroke_weight, 3.0);
        assert_eq!(get_lens_config("topographic").unwrap().stroke_weight, 2.0);
    }

    #[test]
    fn unknown_lens_lists_alternatives() {
        let err = get_lens_config("nonexistent").unwrap_err();
        assert!(matches!(err, NarrativeVizError::UnknownLens { .. }));
        let message = err.to_string();
        assert!(message.contains("nonexistent"));
        assert!(message.contains("chromatic, topographic, temporal, relational"));
        assert!(apply_lens_by_name("sepia", &layout("three_act")).is_err());
    }

    #[test]
    fn lenses_preserve_position_and_identity() {
        let positions = layout("ring_composition");
        for lens in LensKind::ALL {
            let lensed = apply_lens(lens, &positions);
            assert_eq!(lensed.len(), positions.len());
            for (out, original) in lensed.iter().zip(&positions) {
                assert_eq!(out.name, original.name);
                assert_eq!(out.x, original.x);
                assert_eq!(out.y, original.y);
                assert_eq!(out.color, original.color);
                assert_eq!(out.lens(), lens);
            }
        }
    }

    #[test]
    fn chromatic_spreads_hues_and_enlarges_nodes() {
        let positions = layout("heros_journey");
        let lensed = apply_lens(LensKind::Chromatic, &positions);
        assert_eq!(lensed.len(), 12);
        for (i, stage) in lensed.iter().enumerate() {
            match stage.attributes {
                LensAttributes::Chromatic {
                    hue_shift,
                    saturation_boost,
                } => {
                    assert!(approx(hue_shift, 30.0 * i as f64));
                    assert_eq!(saturation_boost, 1.4);
                }
                ref other => panic!("unexpected attributes {other:?}"),
            }
            assert!(approx(stage.radius, positions[i].radius * 1.1));
            assert_eq!(stage.stroke_color, positions[i].color);
            assert_eq!(stage.connection_opacity, 0.3);
            assert_eq!(stage.opacity, 0.9);
        }
    }

    #[test]
    fn topographic_elevation_is_normalised() {
        let positions = layout("freytags_pyramid");
        let lensed = apply_lens(LensKind::Topographic, &positions);
        for stage in &lensed {
            let elevation = stage.elevation().expect("topographic output has elevation");
            assert!((0.0..=1.0).contains(&elevation));
            assert_eq!(stage.stroke_color, "#888");
            assert_eq!(stage.connection_opacity, 0.5);
        }
        assert_eq!(lensed[2].elevation(), Some(1.0));
        assert_eq!(lensed[0].elevation(), Some(0.0));
        assert!(approx(lensed[2].radius, 20.0 * 1.2));
        assert!(approx(lensed[2].opacity, 0.75 + 0.15));
    }

    #[test]
    fn topographic_handles_flat_and_empty_input() {
        assert!(apply_lens(LensKind::Topographic, &[]).is_empty());

        let flat = layout("three_act");
        let lensed = apply_lens(LensKind::Topographic, &flat);
        assert!(lensed.iter().all(|s| s.elevation() == Some(1.0)));
    }

    #[test]
    fn temporal_delays_never_decrease() {
        for model in crate::registry::models() {
            let lensed = apply_lens(LensKind::Temporal, &layout(model.name));
            let delays: Vec<f64> = lensed.iter().filter_map(|s| s.animation_delay()).collect();
            assert_eq!(delays.len(), lensed.len());
            assert!(delays.windows(2).all(|w| w[0] <= w[1]), "{}", model.name);
            assert_eq!(delays[0], 0.0);
        }
    }

    #[test]
    fn temporal_rounds_delays_to_hundredths() {
        let lensed = apply_lens(LensKind::Temporal, &layout("three_act"));
        let delays: Vec<f64> = lensed.iter().filter_map(|s| s.animation_delay()).collect();
        assert_eq!(delays, vec![0.0, 1.67, 3.33]);
        assert!(approx(lensed[2].connection_opacity, 0.2 + 0.3 * 2.0 / 3.0));
        assert!(approx(lensed[1].opacity, 0.6 + 0.1));
    }

    #[test]
    fn relational_shrinks_every_node() {
        let positions = layout("kishotenketsu");
        let lensed = apply_lens(LensKind::Relational, &positions);
        for (out, original) in lensed.iter().zip(&positions) {
            assert!(out.radius < original.radius);
            assert_eq!(out.connection_opacity, 0.7);
            assert_eq!(out.opacity, 0.7);
        }
    }

    #[test]
    fn serialised_record_is_tagged_by_lens() {
        let lensed = apply_lens(LensKind::Chromatic, &layout("three_act"));
        let value = serde_json::to_value(&lensed[1]).unwrap();
        assert_eq!(value["lens"], "chromatic");
        assert_eq!(value["name"], "act_ii_confrontation");
        assert_eq!(value["hue_shift"], 120.0);
        assert_eq!(value["saturation_boost"], 1.4);
    }

    #[test]
    fn serialised_parameters_are_keyed_by_name() {
        let value = serde_json::to_value(get_lens_config("topographic").unwrap()).unwrap();
        assert_eq!(value["name"], "topographic");
        assert_eq!(value["stroke_weight"], 2.0);
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn rounding_sends_ties_to_even() {
        assert_eq!(round_to(0.625, 2), 0.62);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(1.666_666, 2), 1.67);
    }

    #[test]
    fn temporal_delay_on_a_tie_rounds_to_even() {
        let stages = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let positions: Vec<StagePosition> = stages
            .iter()
            .map(|name| StagePosition::new(*name, 0.0, 0.0, "#fff"))
            .collect();
        let lensed = apply_lens(LensKind::Temporal, &positions);
        // 5.0 * 1 / 8 = 0.625
        assert_eq!(lensed[1].animation_delay(), Some(0.62));
    }

    #[test]
    fn lensed_stages_carry_display_labels() {
        let lensed = apply_lens(LensKind::Relational, &layout("three_act"));
        assert_eq!(lensed[0].label, "act i setup");
    }
}

//! Deterministic placement of narrative stages on a 2D canvas.
//!
//! Each [`LayoutKind`] maps to one closed-form algorithm parameterised only by
//! the stage list, the palette and the canvas size. Nothing is cached; every
//! call produces fresh [`StagePosition`] values.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::{
    config::CanvasConfig,
    registry::{self, LayoutKind, NarrativeModel, Palette},
    Result,
};

const DEFAULT_RADIUS: f64 = 20.0;
const GRID_RADIUS: f64 = 30.0;
const LINEAR_RADIUS: f64 = 35.0;
const MARGIN_FRACTION: f64 = 0.1;

/// Fractional canvas offsets for the scattered layout. The sequence is
/// deliberately non-monotonic in x so reading order does not follow story order.
const SCATTER_OFFSETS: [(f64, f64); 6] = [
    (0.6, 0.3),
    (0.15, 0.7),
    (0.35, 0.55),
    (0.65, 0.5),
    (0.8, 0.4),
    (0.5, 0.2),
];

/// Computed position for a single narrative stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagePosition {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl StagePosition {
    pub fn new(name: impl Into<String>, x: f64, y: f64, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            radius: DEFAULT_RADIUS,
            color: color.into(),
            label: None,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Text shown under the node: the explicit label, or the stage name with
    /// underscores turned into spaces.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => self.name.replace('_', " "),
        }
    }
}

/// Maps narrative structures onto a fixed-size canvas.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    canvas: CanvasConfig,
}

impl LayoutEngine {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    /// Looks up `name` in the registry and lays it out with its declared shape.
    pub fn compute_layout(&self, name: &str) -> Result<Vec<StagePosition>> {
        let model = registry::get_model(name)?;
        Ok(self.layout_model(model))
    }

    /// Lays out `name` using a layout tag other than the one the model declares.
    pub fn compute_layout_as(&self, name: &str, layout: &str) -> Result<Vec<StagePosition>> {
        let model = registry::get_model(name)?;
        let kind = layout.parse::<LayoutKind>()?;
        Ok(self.layout_stages(kind, model.stages, &model.palette))
    }

    pub fn layout_model(&self, model: &NarrativeModel) -> Vec<StagePosition> {
        self.layout_stages(model.layout, model.stages, &model.palette)
    }

    pub fn layout_stages(
        &self,
        kind: LayoutKind,
        stages: &[&str],
        palette: &Palette,
    ) -> Vec<StagePosition> {
        tracing::debug!(layout = %kind, stages = stages.len(), "computing layout");
        match kind {
            LayoutKind::Circular => self.circular(stages, palette),
            LayoutKind::Grid => self.grid(stages, palette),
            LayoutKind::Concentric => self.concentric(stages, palette),
            LayoutKind::Triangular => self.triangular(stages, palette),
            LayoutKind::Linear => self.linear(stages, palette),
            LayoutKind::Scattered => self.scattered(stages, palette),
        }
    }

    fn size(&self) -> (f64, f64) {
        (self.canvas.width_f(), self.canvas.height_f())
    }

    /// Evenly around a circle, clockwise from twelve o'clock.
    fn circular(&self, stages: &[&str], palette: &Palette) -> Vec<StagePosition> {
        let (width, height) = self.size();
        let (cx, cy) = (width / 2.0, height / 2.0);
        let radius = width.min(height) * 0.35;
        let n = stages.len();

        stages
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                let angle = 2.0 * PI * i as f64 / n as f64 - FRAC_PI_2;
                let color = if i < n / 2 {
                    palette.primary
                } else {
                    palette.accent
                };
                StagePosition::new(
                    *stage,
                    cx + radius * angle.cos(),
                    cy + radius * angle.sin(),
                    color,
                )
            })
            .collect()
    }

    fn grid(&self, stages: &[&str], palette: &Palette) -> Vec<StagePosition> {
        const QUADRANTS: [(usize, usize); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

        let (width, height) = self.size();
        let (cell_w, cell_h) = (width / 3.0, height / 3.0);

        stages
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                let (col, row) = QUADRANTS.get(i).copied().unwrap_or((i % 2, i / 2));
                // Index 2 is the twist.
                let color = if i == 2 {
                    palette.accent
                } else {
                    palette.primary
                };
                StagePosition::new(
                    *stage,
                    cell_w + col as f64 * cell_w,
                    cell_h + row as f64 * cell_h,
                    color,
                )
                .with_radius(GRID_RADIUS)
            })
            .collect()
    }

    /// Mirrored stages share a ring; the pivot sits on the innermost ring.
    fn concentric(&self, stages: &[&str], palette: &Palette) -> Vec<StagePosition> {
        let (width, height) = self.size();
        let (cx, cy) = (width / 2.0, height / 2.0);
        let n = stages.len();
        let mid = n / 2;
        let max_radius = width.min(height) * 0.4;

        stages
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                let distance_from_center = i.abs_diff(mid);
                let ring = max_radius * (distance_from_center + 1) as f64 / (mid + 1) as f64;
                let base = if i <= mid { FRAC_PI_2 } else { -FRAC_PI_2 };
                let angle = base + i as f64 * 0.3;
                let color = if i == mid {
                    palette.accent
                } else {
                    palette.primary
                };
                StagePosition::new(
                    *stage,
                    cx + ring * angle.cos(),
                    cy + ring * angle.sin(),
                    color,
                )
            })
            .collect()
    }

    /// Rising to the climax at `n / 2`, then falling back toward the base line.
    fn triangular(&self, stages: &[&str], palette: &Palette) -> Vec<StagePosition> {
        let (width, height) = self.size();
        let n = stages.len();
        let peak_y = height * 0.2;
        let base_y = height * 0.75;
        let climax = n / 2;
        let falling_steps = n.saturating_sub(1 + climax);

        stages
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                let x = spread_x(width, i, n);
                let y = if i <= climax {
                    let progress = if climax > 0 {
                        i as f64 / climax as f64
                    } else {
                        0.0
                    };
                    base_y - (base_y - peak_y) * progress
                } else {
                    let progress = if falling_steps > 0 {
                        (i - climax) as f64 / falling_steps as f64
                    } else {
                        0.0
                    };
                    peak_y + (base_y - peak_y) * progress
                };
                let color = if i == climax {
                    palette.secondary
                } else {
                    palette.primary
                };
                StagePosition::new(*stage, x, y, color)
            })
            .collect()
    }

    fn linear(&self, stages: &[&str], palette: &Palette) -> Vec<StagePosition> {
        let (width, height) = self.size();
        let n = stages.len();
        let cycle = [palette.primary, palette.secondary, palette.accent];

        stages
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                StagePosition::new(*stage, spread_x(width, i, n), height / 2.0, cycle[i % 3])
                    .with_radius(LINEAR_RADIUS)
            })
            .collect()
    }

    fn scattered(&self, stages: &[&str], palette: &Palette) -> Vec<StagePosition> {
        let (width, height) = self.size();

        stages
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                let (ox, oy) = SCATTER_OFFSETS.get(i).copied().unwrap_or((0.5, 0.5));
                let color = if i == 0 {
                    palette.accent
                } else {
                    palette.primary
                };
                StagePosition::new(*stage, width * ox, height * oy, color)
            })
            .collect()
    }
}

/// Equal spacing across the width minus a 10% margin on each side. A lone
/// stage is centred.
fn spread_x(width: f64, index: usize, count: usize) -> f64 {
    if count <= 1 {
        return width / 2.0;
    }
    let margin = width * MARGIN_FRACTION;
    let usable = width - 2.0 * margin;
    margin + usable * index as f64 / (count - 1) as f64
}

use serde::{Deserialize, Serialize};

use crate::{layout::LayoutEngine, registry, Result};

/// Structured snapshot of a model and its layout, suitable for D3-style
/// front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterchangeDocument {
    pub name: String,
    pub display_name: String,
    pub layout_type: String,
    pub palette: InterchangePalette,
    pub stages: Vec<InterchangeStage>,
    pub connections: Vec<InterchangeConnection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterchangePalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

/// Coordinates are rounded to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterchangeStage {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterchangeConnection {
    pub source: usize,
    pub target: usize,
}

pub fn to_interchange(engine: &LayoutEngine, name: &str) -> Result<InterchangeDocument> {
    let model = registry::get_model(name)?;
    let positions = engine.layout_model(model);

    Ok(InterchangeDocument {
        name: model.name.to_string(),
        display_name: model.display_name.to_string(),
        layout_type: model.layout.as_str().to_string(),
        palette: InterchangePalette {
            primary: model.palette.primary.to_string(),
            secondary: model.palette.secondary.to_string(),
            accent: model.palette.accent.to_string(),
        },
        stages: positions
            .into_iter()
            .map(|position| InterchangeStage {
                name: position.name,
                x: round_tenth(position.x),
                y: round_tenth(position.y),
                color: position.color,
            })
            .collect(),
        connections: model
            .connections
            .iter()
            .map(|&(source, target)| InterchangeConnection { source, target })
            .collect(),
    })
}

/// Pretty-printed JSON form of [`to_interchange`].
pub fn to_json(engine: &LayoutEngine, name: &str) -> Result<String> {
    let document = to_interchange(engine, name)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

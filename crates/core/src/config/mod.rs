use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
}

impl AppConfig {
    /// Parses a configuration document. Missing fields fall back to defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Drawing surface shared by every layout and renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 900,
            background: "#0d1117".to_string(),
        }
    }
}

impl CanvasConfig {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub(crate) fn width_f(&self) -> f64 {
        f64::from(self.width)
    }

    pub(crate) fn height_f(&self) -> f64 {
        f64::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_canvas() {
        let canvas = CanvasConfig::default();
        assert_eq!(canvas.width, 1400);
        assert_eq!(canvas.height, 900);
        assert_eq!(canvas.background, "#0d1117");
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = AppConfig::from_json_str(r#"{ "canvas": { "width": 800 } }"#).unwrap();
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.canvas.height, 900);
        assert_eq!(config.canvas.background, "#0d1117");
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = AppConfig::from_json_str("{ canvas").unwrap_err();
        assert!(matches!(err, crate::NarrativeVizError::Json(_)));
    }
}

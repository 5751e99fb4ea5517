//! Core library for the Narrative Lens renderer.
//!
//! Narrative structures flow through a fixed pipeline: the [`registry`] holds
//! the six canonical models, the [`layout`] engine turns a model into stage
//! positions, an optional [`lens`] re-skins those positions, and the
//! [`render`] and [`export`] modules serialise the result as SVG or JSON.
//! Layout decides where stages go; lenses only decide how they look.

pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod lens;
pub mod registry;
pub mod render;

pub use config::{AppConfig, CanvasConfig};
pub use error::{NarrativeVizError, Result};
pub use export::{to_interchange, to_json, InterchangeDocument};
pub use layout::{LayoutEngine, StagePosition};
pub use lens::{
    apply_lens, apply_lens_by_name, available_lenses, get_lens_config, LensAttributes, LensKind,
    LensParameters, LensedStage,
};
pub use registry::{get_model, list_models, model_count, LayoutKind, NarrativeModel, Palette};
pub use render::Renderer;

use std::fmt::Write as _;

use crate::{
    config::CanvasConfig,
    layout::{LayoutEngine, StagePosition},
    lens::{self, LensAttributes, LensKind, LensedStage},
    registry::{self, NarrativeModel},
    NarrativeVizError, Result,
};

const NODE_OPACITY: f64 = 0.85;
const EDGE_WIDTH: f64 = 1.5;
const EDGE_OPACITY: f64 = 0.5;
const LABEL_COLOR: &str = "#c9d1d9";
const LABEL_OFFSET: f64 = 14.0;
const FONT_FAMILY: &str = "Inter, sans-serif";

/// SVG backend. Every method recomputes the layout from the registry, so a
/// renderer can be shared freely between callers.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    layout: LayoutEngine,
}

impl Renderer {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self {
            layout: LayoutEngine::new(canvas),
        }
    }

    pub fn canvas(&self) -> &CanvasConfig {
        self.layout.canvas()
    }

    pub fn layout_engine(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Renders one model as a `<g>` fragment: edges first, then labelled nodes.
    pub fn render_model(&self, name: &str) -> Result<String> {
        let model = registry::get_model(name)?;
        let positions = self.layout.layout_model(model);
        Ok(model_group(model, &positions, None))
    }

    /// Renders `names` side by side, one equal-width column per model.
    pub fn render_comparison<S: AsRef<str>>(&self, names: &[S]) -> Result<String> {
        if names.is_empty() {
            return Err(NarrativeVizError::EmptyInput(
                "at least one model name is required",
            ));
        }

        let column_width = self.canvas().width_f() / names.len() as f64;
        let column = LayoutEngine::new(CanvasConfig {
            width: column_width as u32,
            ..self.canvas().clone()
        });

        let mut svg = String::from("<g id=\"comparison\">");
        for (i, name) in names.iter().enumerate() {
            let model = registry::get_model(name.as_ref())?;
            let positions = column.layout_model(model);
            let offset = (i as f64 * column_width) as u32;
            let transform = format!("translate({offset}, 0)");
            svg.push_str(&model_group(model, &positions, Some(&transform)));
        }
        svg.push_str("</g>");
        Ok(svg)
    }

    /// Wraps [`Renderer::render_model`] in a standalone SVG document.
    pub fn generate_document(&self, name: &str) -> Result<String> {
        let model = registry::get_model(name)?;
        let fragment = self.render_model(name)?;
        let canvas = self.canvas();
        let (width, height) = (canvas.width, canvas.height);

        let mut svg = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {width} {height}\" width=\"{width}\" height=\"{height}\">"
        );
        let _ = write!(
            svg,
            "<rect width=\"{width}\" height=\"{height}\" fill=\"{}\" />",
            escape_xml(&canvas.background)
        );
        let _ = write!(
            svg,
            "<title>Narrative Visualization — {}</title>",
            escape_xml(model.display_name)
        );
        svg.push_str(&fragment);
        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Renders `model_name` through the lens named `lens_name`.
    pub fn render_with_lens(&self, model_name: &str, lens_name: &str) -> Result<String> {
        let lens: LensKind = lens_name.parse()?;
        let model = registry::get_model(model_name)?;
        let positions = self.layout.layout_model(model);
        let lensed = lens::apply_lens(lens, &positions);
        Ok(lensed_group(model, lens, &lensed))
    }
}

fn model_group(model: &NarrativeModel, positions: &[StagePosition], transform: Option<&str>) -> String {
    let mut svg = format!(
        "<g id=\"narrative-{}\" class=\"narrative-model\"",
        escape_xml(model.name)
    );
    if let Some(transform) = transform {
        let _ = write!(svg, " transform=\"{transform}\"");
    }
    svg.push('>');

    for (source, target) in connected_pairs(model, positions) {
        let _ = write!(
            svg,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" opacity=\"{}\" />",
            fmt_num(source.x),
            fmt_num(source.y),
            fmt_num(target.x),
            fmt_num(target.y),
            escape_xml(model.palette.secondary),
            fmt_num(EDGE_WIDTH),
            fmt_num(EDGE_OPACITY),
        );
    }

    for position in positions {
        let _ = write!(
            svg,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" opacity=\"{}\" />",
            fmt_num(position.x),
            fmt_num(position.y),
            fmt_num(position.radius),
            escape_xml(&position.color),
            fmt_num(NODE_OPACITY),
        );
        write_label(
            &mut svg,
            position.x,
            position.y,
            position.radius,
            &position.display_label(),
        );
    }

    svg.push_str("</g>");
    svg
}

fn lensed_group(model: &NarrativeModel, lens: LensKind, stages: &[LensedStage]) -> String {
    let config = lens.config();
    let mut svg = format!(
        "<g id=\"lens-{lens}-{}\" class=\"lens-{lens}\">",
        escape_xml(model.name)
    );

    for (source, target) in connected_pairs(model, stages) {
        let _ = write!(
            svg,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\" opacity=\"{}\" />",
            fmt_num(source.x),
            fmt_num(source.y),
            fmt_num(target.x),
            fmt_num(target.y),
            escape_xml(&source.stroke_color),
            fmt_num(config.stroke_weight),
            fmt_num(source.connection_opacity),
        );
    }

    for stage in stages {
        let _ = write!(
            svg,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" opacity=\"{}\"",
            fmt_num(stage.x),
            fmt_num(stage.y),
            fmt_num(stage.radius),
            escape_xml(&stage.color),
            fmt_num(stage.opacity),
        );
        if let LensAttributes::Temporal {
            animation_delay,
            animation_duration,
        } = stage.attributes
        {
            let _ = write!(
                svg,
                " style=\"animation-delay: {}s; animation-duration: {}s\"",
                fmt_num(animation_delay),
                fmt_num(animation_duration),
            );
        }
        svg.push_str(" />");
        write_label(&mut svg, stage.x, stage.y, stage.radius, &stage.label);
    }

    svg.push_str("</g>");
    svg
}

/// Stage name centred under a node of radius `radius` at `(x, y)`.
fn write_label(svg: &mut String, x: f64, y: f64, radius: f64, label: &str) {
    let _ = write!(
        svg,
        "<text x=\"{}\" y=\"{}\" text-anchor=\"middle\" fill=\"{LABEL_COLOR}\" font-size=\"9\" font-family=\"{FONT_FAMILY}\">{}</text>",
        fmt_num(x),
        fmt_num(y + radius + LABEL_OFFSET),
        escape_xml(label),
    );
}

/// Endpoint pairs for the model's connections. Pairs that point past the end
/// of `items` are skipped.
fn connected_pairs<'a, T>(
    model: &'a NarrativeModel,
    items: &'a [T],
) -> impl Iterator<Item = (&'a T, &'a T)> + 'a {
    model
        .connections
        .iter()
        .filter_map(move |&(source, target)| match (items.get(source), items.get(target)) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => {
                tracing::warn!(
                    model = model.name,
                    source,
                    target,
                    stages = items.len(),
                    "skipping out-of-range connection"
                );
                None
            }
        })
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
fn fmt_num(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{LayoutKind, Palette};

    fn renderer() -> Renderer {
        Renderer::new(CanvasConfig::with_size(1400, 900))
    }

    #[test]
    fn model_fragment_is_an_identified_group() {
        let svg = renderer().render_model("heros_journey").unwrap();
        assert!(svg.starts_with("<g id=\"narrative-heros_journey\" class=\"narrative-model\">"));
        assert!(svg.ends_with("</g>"));
        assert_eq!(svg.matches("<circle").count(), 12);
        assert_eq!(svg.matches("<line").count(), 12);
        assert_eq!(svg.matches("<text").count(), 12);
    }

    #[test]
    fn edges_are_drawn_behind_nodes() {
        let svg = renderer().render_model("kishotenketsu").unwrap();
        assert_eq!(svg.matches("<circle").count(), 4);
        let last_line = svg.rfind("<line").unwrap();
        let first_circle = svg.find("<circle").unwrap();
        assert!(last_line < first_circle);
        assert!(svg.contains("stroke=\"#f5f0e8\""));
    }

    #[test]
    fn labels_replace_underscores() {
        let svg = renderer().render_model("three_act").unwrap();
        assert!(svg.contains(">act ii confrontation</text>"));
    }

    #[test]
    fn out_of_range_connections_are_skipped() {
        static BROKEN: NarrativeModel = NarrativeModel {
            name: "broken",
            display_name: "Broken",
            stages: &["a", "b"],
            layout: LayoutKind::Linear,
            palette: Palette {
                primary: "#000000",
                secondary: "#111111",
                accent: "#222222",
            },
            connections: &[(0, 1), (1, 5), (7, 0)],
            description: "",
        };
        let positions = LayoutEngine::default().layout_model(&BROKEN);
        let svg = model_group(&BROKEN, &positions, None);
        assert_eq!(svg.matches("<line").count(), 1);
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn comparison_translates_each_column() {
        let svg = renderer()
            .render_comparison(&["heros_journey", "kishotenketsu"])
            .unwrap();
        assert!(svg.starts_with("<g id=\"comparison\">"));
        assert_eq!(svg.matches("class=\"narrative-model\"").count(), 2);
        assert!(svg.contains("transform=\"translate(0, 0)\""));
        assert!(svg.contains("transform=\"translate(700, 0)\""));
    }

    #[test]
    fn comparison_requires_models() {
        let empty: [&str; 0] = [];
        let err = renderer().render_comparison(&empty).unwrap_err();
        assert!(matches!(err, NarrativeVizError::EmptyInput(_)));
        assert!(err.to_string().contains("at least one model"));
    }

    #[test]
    fn comparison_rejects_unknown_models() {
        let err = renderer()
            .render_comparison(&["three_act", "sonnet"])
            .unwrap_err();
        assert!(matches!(err, NarrativeVizError::UnknownModel { .. }));
    }

    #[test]
    fn document_wraps_fragment_with_background_and_title() {
        let svg = renderer().generate_document("freytags_pyramid").unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("viewBox=\"0 0 1400 900\""));
        assert!(svg.contains("fill=\"#0d1117\""));
        assert!(svg.contains("<title>Narrative Visualization — Freytag&apos;s Pyramid</title>"));
        assert!(svg.contains("id=\"narrative-freytags_pyramid\""));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn lens_group_names_lens_and_model() {
        let svg = renderer()
            .render_with_lens("heros_journey", "chromatic")
            .unwrap();
        assert!(svg.starts_with("<g id=\"lens-chromatic-heros_journey\" class=\"lens-chromatic\">"));
        assert_eq!(svg.matches("<circle").count(), 12);
        assert!(svg.contains("opacity=\"0.3\""));
    }

    #[test]
    fn lens_render_labels_every_stage() {
        let renderer = renderer();
        let plain = renderer.render_model("three_act").unwrap();
        let lensed = renderer.render_with_lens("three_act", "chromatic").unwrap();
        assert_eq!(lensed.matches("<text").count(), 3);
        assert_eq!(lensed.matches("<text").count(), plain.matches("<text").count());
        assert!(lensed.contains(">act ii confrontation</text>"));
        // chromatic radius is 35 * 1.1, so the label sits at 450 + 38.5 + 14
        assert!(lensed.contains("y=\"502.5\""));
        let last_circle = lensed.rfind("<circle").unwrap();
        assert!(lensed.rfind("<text").unwrap() > last_circle);
    }

    #[test]
    fn temporal_lens_emits_animation_timing() {
        let svg = renderer().render_with_lens("three_act", "temporal").unwrap();
        assert!(svg.contains("animation-delay: 0s; animation-duration: 5s"));
        assert!(svg.contains("animation-delay: 3.33s"));
    }

    #[test]
    fn lens_rendering_validates_names() {
        let renderer = renderer();
        assert!(matches!(
            renderer.render_with_lens("three_act", "xray").unwrap_err(),
            NarrativeVizError::UnknownLens { .. }
        ));
        assert!(matches!(
            renderer.render_with_lens("sonnet", "temporal").unwrap_err(),
            NarrativeVizError::UnknownModel { .. }
        ));
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(fmt_num(700.0), "700");
        assert_eq!(fmt_num(466.666_666), "466.67");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(-0.0001), "0");
    }
}

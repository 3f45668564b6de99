use label_placer::placement_dump::PlacementDump;
use label_placer::{Config, StepStrategy, Theme, place_labels, render_svg};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    strategy: Option<StepStrategy>,
    max_iteration_count: Option<usize>,
}

fn build_config(options: PlaceOptions) -> Config {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("classic") || options.theme.as_deref() == Some("default") {
        config.theme = Theme::classic();
    }
    config.render.background = config.theme.background.clone();

    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    if let Some(strategy) = options.strategy {
        config.solver.strategy = strategy;
    }
    if let Some(max_iteration_count) = options.max_iteration_count {
        config.solver.max_iteration_count = max_iteration_count;
    }
    config
}

fn parse_options(options_json: Option<String>) -> Result<PlaceOptions, JsValue> {
    match options_json {
        Some(raw_options) => serde_json::from_str::<PlaceOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(PlaceOptions::default()),
    }
}

/// Solves the JSON5 problem and returns the placed labels as SVG.
#[wasm_bindgen]
pub fn place_labels_svg(problem: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = build_config(parse_options(options_json)?);
    let (layout, _) =
        place_labels(problem, &config.solver).map_err(|error| JsValue::from_str(&error.to_string()))?;
    Ok(render_svg(&layout, &config.theme, &config.render))
}

/// Solves the JSON5 problem and returns the placement dump as JSON.
#[wasm_bindgen]
pub fn place_labels_json(problem: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = build_config(parse_options(options_json)?);
    let (layout, report) =
        place_labels(problem, &config.solver).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let dump = PlacementDump::from_layout(&layout, Some(report), None)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    serde_json::to_string(&dump).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use label_placer::{StepStrategy, place_labels, render_svg};

    use crate::{PlaceOptions, build_config};

    const CROWDED: &str = r#"{
      labels: [
        { anchor: [0, 0], width: 2, height: 1, text: "north" },
        { anchor: [0.6, 0.3], width: 2, height: 1, text: "south" },
      ],
      keepouts: [{ anchor: [-1.1, 0.2], width: 0.5, height: 0.5 }],
    }"#;

    #[test]
    fn places_and_renders_crowded_labels() {
        let config = build_config(PlaceOptions::default());
        let (layout, report) = place_labels(CROWDED, &config.solver).unwrap();
        assert!(report.iterations > 0);

        let svg = render_svg(&layout, &config.theme, &config.render);
        assert!(svg.contains("<svg"));
        assert!(svg.contains("north"));
        assert!(svg.contains("south"));
    }

    #[test]
    fn options_override_defaults() {
        let options: PlaceOptions = serde_json::from_str(
            r#"{"theme":"classic","width":640,"strategy":{"kind":"bisection"},"maxIterationCount":12}"#,
        )
        .unwrap();
        let config = build_config(options);
        assert_eq!(config.render.width, 640.0);
        assert_eq!(config.solver.strategy, StepStrategy::bisection());
        assert_eq!(config.solver.max_iteration_count, 12);
        assert_eq!(config.theme.label_fill, "#ECECFF");
    }
}

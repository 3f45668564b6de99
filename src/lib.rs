#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod parser;
pub mod placement;
pub mod placement_dump;
pub mod render;
pub mod solver;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, SolverConfig, StepStrategy, load_config};
pub use error::{EntityKind, PlacementError};
pub use geometry::{Point, Rectangle};
pub use parser::{Problem, parse_problem};
pub use placement::{Label, Layout};
pub use render::render_svg;
pub use solver::{SolveReport, Termination};
pub use theme::Theme;

/// Parses a problem file, solves it with `solver` (overridden by the file's
/// own `solver` block) and returns the moved layout.
pub fn place_labels(input: &str, solver: &SolverConfig) -> anyhow::Result<(Layout, SolveReport)> {
    let mut layout = parse_problem(input)?.into_layout(solver)?;
    let report = layout.run()?;
    Ok((layout, report))
}

/// One-shot placement straight to SVG.
pub fn place_and_render(input: &str, config: &Config) -> anyhow::Result<String> {
    let (layout, _) = place_labels(input, &config.solver)?;
    Ok(render_svg(&layout, &config.theme, &config.render))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_and_render_moves_overlapping_labels() {
        let input = r#"{ labels: [
            { anchor: [0, 0], width: 2, height: 1, text: "a" },
            { anchor: [0.5, 0.2], width: 2, height: 1, text: "b" },
        ] }"#;
        let (layout, report) = place_labels(input, &SolverConfig::default()).unwrap();
        assert!(report.iterations > 0);
        assert!(layout.total_overlap().unwrap() < 0.8);

        let svg = place_and_render(input, &Config::default()).unwrap();
        assert!(svg.contains(">a</text>"));
        assert!(svg.contains(">b</text>"));
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(place_labels("{ labels: [", &SolverConfig::default()).is_err());
    }
}

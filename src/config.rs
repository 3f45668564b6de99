use crate::error::{PlacementError, Result};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the solver picks a step length along the descent direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StepStrategy {
    #[default]
    /// Steepest descent whose movement grows while successive directions
    /// agree and is cut back when they diverge or a step fails to improve.
    Adaptive,
    /// Bisection on the step length, keeping the largest step whose actual
    /// cost change stays within `max_error` of the linear prediction.
    Bisection {
        #[serde(rename = "maxError", default = "default_max_error")]
        max_error: f64,
    },
}

fn default_max_error() -> f64 {
    0.1
}

impl StepStrategy {
    pub fn bisection() -> Self {
        Self::Bisection {
            max_error: default_max_error(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Adaptive => "adaptive",
            Self::Bisection { .. } => "bisection",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Weight on the squared overlap of two labels.
    pub penalty_intersection: f64,
    /// Weight on the squared overlap of a label with a keepout.
    pub penalty_keepout: f64,
    /// Finite-difference perturbation.
    pub delta: f64,
    pub min_movement: f64,
    pub max_movement: f64,
    pub max_iteration_count: usize,
    /// Shrink factor applied to the adaptive movement.
    pub cutback: f64,
    pub strategy: StepStrategy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            penalty_intersection: 1000.0,
            penalty_keepout: 1_000_000.0,
            delta: 1e-4,
            min_movement: 1e-6,
            max_movement: 1.0,
            max_iteration_count: 1000,
            cutback: 0.5,
            strategy: StepStrategy::Adaptive,
        }
    }
}

impl SolverConfig {
    /// Rejects settings the solver cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(PlacementError::InvalidConfig(msg));
        if !(self.penalty_intersection >= 0.0 && self.penalty_intersection.is_finite()) {
            return invalid(format!(
                "penaltyIntersection must be a non-negative number, got {}",
                self.penalty_intersection
            ));
        }
        if !(self.penalty_keepout >= 0.0 && self.penalty_keepout.is_finite()) {
            return invalid(format!(
                "penaltyKeepout must be a non-negative number, got {}",
                self.penalty_keepout
            ));
        }
        if !(self.delta > 0.0 && self.delta.is_finite()) {
            return invalid(format!("delta must be positive, got {}", self.delta));
        }
        if !(self.min_movement > 0.0) {
            return invalid(format!(
                "minMovement must be positive, got {}",
                self.min_movement
            ));
        }
        if !(self.max_movement >= self.min_movement && self.max_movement.is_finite()) {
            return invalid(format!(
                "maxMovement ({}) must be finite and at least minMovement ({})",
                self.max_movement, self.min_movement
            ));
        }
        if !(self.cutback > 0.0 && self.cutback < 1.0) {
            return invalid(format!("cutback must lie in (0, 1), got {}", self.cutback));
        }
        if let StepStrategy::Bisection { max_error } = self.strategy {
            if !(max_error > 0.0 && max_error < 1.0) {
                return invalid(format!("maxError must lie in (0, 1), got {max_error}"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    /// Margin around the layout bounds, in output pixels.
    pub padding: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 24.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub solver: SolverConfig,
    pub render: RenderConfig,
}

/// Partial solver settings, as found in config files and in the `solver`
/// block of a problem file. Present fields override a base config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfigFile {
    penalty_intersection: Option<f64>,
    penalty_keepout: Option<f64>,
    delta: Option<f64>,
    min_movement: Option<f64>,
    max_movement: Option<f64>,
    max_iteration_count: Option<usize>,
    cutback: Option<f64>,
    strategy: Option<StepStrategy>,
}

impl SolverConfigFile {
    pub fn apply(&self, config: &mut SolverConfig) {
        if let Some(v) = self.penalty_intersection {
            config.penalty_intersection = v;
        }
        if let Some(v) = self.penalty_keepout {
            config.penalty_keepout = v;
        }
        if let Some(v) = self.delta {
            config.delta = v;
        }
        if let Some(v) = self.min_movement {
            config.min_movement = v;
        }
        if let Some(v) = self.max_movement {
            config.max_movement = v;
        }
        if let Some(v) = self.max_iteration_count {
            config.max_iteration_count = v;
        }
        if let Some(v) = self.cutback {
            config.cutback = v;
        }
        if let Some(v) = self.strategy {
            config.strategy = v;
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    label_fill: Option<String>,
    label_border: Option<String>,
    label_text_color: Option<String>,
    keepout_fill: Option<String>,
    keepout_border: Option<String>,
    anchor_color: Option<String>,
    overlap_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    solver: Option<SolverConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        config.render.background = config.theme.background.clone();
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        } else if theme_name == "modern" {
            config.theme = Theme::modern();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.label_fill {
            config.theme.label_fill = v;
        }
        if let Some(v) = vars.label_border {
            config.theme.label_border = v;
        }
        if let Some(v) = vars.label_text_color {
            config.theme.label_text_color = v;
        }
        if let Some(v) = vars.keepout_fill {
            config.theme.keepout_fill = v;
        }
        if let Some(v) = vars.keepout_border {
            config.theme.keepout_border = v;
        }
        if let Some(v) = vars.anchor_color {
            config.theme.anchor_color = v;
        }
        if let Some(v) = vars.overlap_color {
            config.theme.overlap_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(solver) = parsed.solver {
        solver.apply(&mut config.solver);
    }
    config.solver.validate()?;

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "label-placer-{}-{}.json",
            name,
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_weight_keepouts_above_labels() {
        let config = SolverConfig::default();
        assert!(config.penalty_keepout > config.penalty_intersection);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.solver.max_iteration_count, 1000);
        assert_eq!(config.render.background, config.theme.background);
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let path = write_temp(
            "partial",
            r##"{
                "theme": "classic",
                "themeVariables": { "labelFill": "#123456" },
                "solver": { "penaltyKeepout": 5.0, "strategy": { "kind": "bisection" } },
                "render": { "width": 640 }
            }"##,
        );
        let config = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.theme.label_fill, "#123456");
        assert_eq!(config.theme.keepout_border, Theme::classic().keepout_border);
        assert_eq!(config.solver.penalty_keepout, 5.0);
        assert_eq!(config.solver.penalty_intersection, 1000.0);
        assert_eq!(config.solver.strategy, StepStrategy::bisection());
        assert_eq!(config.render.width, 640.0);
        assert_eq!(config.render.height, 800.0);
    }

    #[test]
    fn invalid_solver_settings_fail_to_load() {
        let path = write_temp("invalid", r#"{ "solver": { "delta": 0.0 } }"#);
        let result = load_config(Some(&path));
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_bad_ranges() {
        let mut config = SolverConfig::default();
        config.min_movement = 2.0;
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.cutback = 1.0;
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.strategy = StepStrategy::Bisection { max_error: 1.5 };
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.penalty_intersection = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn strategy_tags_round_trip() {
        let adaptive: StepStrategy = serde_json::from_str(r#"{"kind":"adaptive"}"#).unwrap();
        assert_eq!(adaptive, StepStrategy::Adaptive);
        let bisection: StepStrategy =
            serde_json::from_str(r#"{"kind":"bisection","maxError":0.25}"#).unwrap();
        assert_eq!(bisection, StepStrategy::Bisection { max_error: 0.25 });
    }
}

use crate::config::{SolverConfig, SolverConfigFile};
use crate::error::PlacementError;
use crate::geometry::Point;
use crate::placement::{Label, Layout};
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelSpec {
    pub anchor: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeepoutSpec {
    pub anchor: Point,
    pub width: f64,
    pub height: f64,
}

/// A placement problem as read from a JSON5 file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Problem {
    #[serde(default)]
    pub labels: Vec<LabelSpec>,
    #[serde(default)]
    pub keepouts: Vec<KeepoutSpec>,
    /// Overrides applied on top of the caller's solver settings.
    #[serde(default)]
    pub solver: Option<SolverConfigFile>,
}

pub fn parse_problem(input: &str) -> Result<Problem> {
    json5::from_str(input).map_err(|err| anyhow::anyhow!("invalid problem file: {err}"))
}

impl Problem {
    /// Builds a layout with every label on its anchor. The problem's own
    /// `solver` block wins over `base`.
    pub fn into_layout(self, base: &SolverConfig) -> std::result::Result<Layout, PlacementError> {
        let mut config = base.clone();
        if let Some(overrides) = &self.solver {
            overrides.apply(&mut config);
        }
        let labels = self
            .labels
            .into_iter()
            .map(|entry| Label::new(entry.anchor, entry.width, entry.height, entry.text));
        let keepouts = self
            .keepouts
            .into_iter()
            .map(|entry| Label::keepout(entry.anchor, entry.width, entry.height));
        Layout::new(labels, keepouts, config)
    }
}

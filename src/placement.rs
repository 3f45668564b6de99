// The mutable problem state: labels that move, keepouts that don't, and
// the solver settings that price their overlaps.

use crate::config::SolverConfig;
use crate::error::{EntityKind, PlacementError, Result};
use crate::geometry::{Point, Rectangle};
use crate::solver::cost::{self, CostBreakdown, OverlapReport};
use crate::solver::{self, SolveReport};
use std::fmt;

/// A rectangle of fixed size that prefers to sit centred on its `optimal`
/// anchor. Keepouts use the same type; the solver never moves them.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    optimal: Point,
    location: Point,
    width: f64,
    height: f64,
    text: String,
}

impl Label {
    pub fn new(optimal: Point, width: f64, height: f64, text: impl Into<String>) -> Self {
        Self {
            optimal,
            location: optimal,
            width,
            height,
            text: text.into(),
        }
    }

    pub fn keepout(anchor: Point, width: f64, height: f64) -> Self {
        Self::new(anchor, width, height, String::new())
    }

    pub fn optimal(&self) -> Point {
        self.optimal
    }

    pub fn location(&self) -> Point {
        self.location
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current footprint, derived from location and size on every call.
    pub fn rectangle(&self) -> Rectangle {
        Rectangle::centered(self.location, self.width, self.height)
    }

    fn validate(&self, kind: EntityKind, index: usize) -> Result<()> {
        if !self.optimal.is_finite() {
            return Err(PlacementError::NonFiniteCoordinate { kind, index });
        }
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(PlacementError::InvalidDimensions {
                kind,
                index,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Label(text={:?}, optimal={}, location={}, width={}, height={})",
            self.text, self.optimal, self.location, self.width, self.height
        )
    }
}

/// Labels, keepouts and solver settings for one placement problem.
///
/// The unknown vector is `[x0, y0, x1, y1, ...]` over the labels in
/// insertion order. Keepouts never appear in it.
#[derive(Debug, Clone)]
pub struct Layout {
    labels: Vec<Label>,
    keepouts: Vec<Label>,
    config: SolverConfig,
}

impl Layout {
    /// Validates every entity and the solver settings up front, so malformed
    /// input fails before any iteration runs.
    pub fn new(
        labels: impl IntoIterator<Item = Label>,
        keepouts: impl IntoIterator<Item = Label>,
        config: SolverConfig,
    ) -> Result<Self> {
        let labels: Vec<Label> = labels.into_iter().collect();
        let keepouts: Vec<Label> = keepouts.into_iter().collect();
        config.validate()?;
        for (index, label) in labels.iter().enumerate() {
            label.validate(EntityKind::Label, index)?;
        }
        for (index, keepout) in keepouts.iter().enumerate() {
            keepout.validate(EntityKind::Keepout, index)?;
        }
        Ok(Self {
            labels,
            keepouts,
            config,
        })
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn keepouts(&self) -> &[Label] {
        &self.keepouts
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SolverConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Length of the unknown vector, `2 x labels`.
    pub fn unknown_count(&self) -> usize {
        self.labels.len() * 2
    }

    pub fn unknowns(&self) -> Vec<f64> {
        self.labels
            .iter()
            .flat_map(|label| [label.location.x, label.location.y])
            .collect()
    }

    pub fn set_unknowns(&mut self, unknowns: &[f64]) -> Result<()> {
        if unknowns.len() != self.unknown_count() {
            return Err(PlacementError::UnknownCountMismatch {
                expected: self.unknown_count(),
                actual: unknowns.len(),
            });
        }
        self.write_unknowns(unknowns);
        Ok(())
    }

    /// Moves one coordinate: even indices are x, odd indices are y.
    pub fn adjust_unknown(&mut self, index: usize, amount: f64) -> Result<()> {
        let len = self.unknown_count();
        let label = self
            .labels
            .get_mut(index / 2)
            .ok_or(PlacementError::UnknownIndex { index, len })?;
        if index % 2 == 0 {
            label.location.x += amount;
        } else {
            label.location.y += amount;
        }
        Ok(())
    }

    /// Puts every label back on its anchor.
    pub fn reset(&mut self) {
        for label in &mut self.labels {
            label.location = label.optimal;
        }
    }

    /// Bounding box of every label and keepout rectangle.
    pub fn bounds(&self) -> Rectangle {
        self.labels
            .iter()
            .chain(self.keepouts.iter())
            .fold(Rectangle::empty(), |acc, entity| {
                acc.union(&entity.rectangle())
            })
    }

    /// Runs the configured solver to termination, moving labels in place.
    pub fn run(&mut self) -> Result<SolveReport> {
        solver::solve(self)
    }

    /// Finite-difference Hessian of the cost at the current locations.
    pub fn hessian(&mut self) -> Result<Vec<Vec<f64>>> {
        solver::hessian(self)
    }

    pub fn cost(&self, verbose: bool) -> Result<f64> {
        cost::cost(self, verbose)
    }

    pub fn cost_breakdown(&self) -> Result<CostBreakdown> {
        cost::cost_breakdown(self)
    }

    pub fn overlaps(&self) -> Result<Vec<OverlapReport>> {
        cost::overlaps(self)
    }

    /// Unweighted sum of every label/label and label/keepout overlap.
    pub fn total_overlap(&self) -> Result<f64> {
        Ok(self.overlaps()?.iter().map(|o| o.overlap).sum())
    }

    /// Cost with the given `(unknown, amount)` offsets applied. The layout is
    /// restored bit-for-bit before returning.
    pub fn cost_with_offsets(&mut self, offsets: &[(usize, f64)]) -> Result<f64> {
        self.trial(|layout| {
            for &(index, amount) in offsets {
                layout.adjust_unknown(index, amount)?;
            }
            Ok(())
        })
    }

    /// Cost after moving `step` along `direction`, without committing.
    pub fn cost_along(&mut self, direction: &[f64], step: f64) -> Result<f64> {
        self.trial(|layout| layout.apply_step(direction, step))
    }

    /// Moves every label by `step x direction`.
    pub fn apply_step(&mut self, direction: &[f64], step: f64) -> Result<()> {
        if direction.len() != self.unknown_count() {
            return Err(PlacementError::UnknownCountMismatch {
                expected: self.unknown_count(),
                actual: direction.len(),
            });
        }
        for (label, d) in self.labels.iter_mut().zip(direction.chunks_exact(2)) {
            label.location.x += step * d[0];
            label.location.y += step * d[1];
        }
        Ok(())
    }

    // Every trial evaluation goes through here: snapshot, perturb, evaluate,
    // restore from the snapshot even when the perturbation failed.
    fn trial<F>(&mut self, perturb: F) -> Result<f64>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let snapshot = self.unknowns();
        let result = perturb(self).and_then(|()| self.cost(false));
        self.write_unknowns(&snapshot);
        result
    }

    fn write_unknowns(&mut self, unknowns: &[f64]) {
        debug_assert_eq!(unknowns.len(), self.unknown_count());
        for (label, xy) in self.labels.iter_mut().zip(unknowns.chunks_exact(2)) {
            label.location = Point::new(xy[0], xy[1]);
        }
    }
}

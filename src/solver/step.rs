use crate::config::{SolverConfig, StepStrategy};
use crate::error::{PlacementError, Result};
use crate::placement::Layout;

use super::diff::dot;

/// Successive directions whose cosine falls below this are diverging.
const DIVERGING_TANGENCY: f64 = 0.9;
/// Above this the directions agree and the movement grows.
const AGREEING_TANGENCY: f64 = 0.95;
const MOVEMENT_GROWTH: f64 = 2.0;
const MAX_BISECTIONS: usize = 64;

/// What a step policy knows about the current iterate.
#[derive(Debug, Clone, Copy)]
pub struct StepProbe<'a> {
    /// Unit descent direction, `-gradient / |gradient|`.
    pub direction: &'a [f64],
    pub gradient_norm: f64,
    /// Cost at the committed layout.
    pub starting_cost: f64,
}

/// Chooses how far to move along the descent direction.
///
/// Implementations may evaluate trial steps through
/// [`Layout::cost_along`] but must leave the committed layout unchanged;
/// the solver applies the returned step itself. A step at or below the
/// configured minimum movement ends the run.
pub trait StepPolicy {
    fn choose_step(&mut self, layout: &mut Layout, probe: &StepProbe<'_>) -> Result<f64>;
}

/// Builds the policy selected by `config.strategy`.
pub fn policy_for(config: &SolverConfig) -> Box<dyn StepPolicy> {
    match config.strategy {
        StepStrategy::Adaptive => Box::new(AdaptiveDescent::new(config)),
        StepStrategy::Bisection { max_error } => Box::new(BisectionSearch::new(config, max_error)),
    }
}

/// Steepest descent with a movement that adapts to how consistently the
/// direction points the same way between iterations.
#[derive(Debug, Clone)]
pub struct AdaptiveDescent {
    movement: f64,
    min_movement: f64,
    max_movement: f64,
    cutback: f64,
    previous: Option<Vec<f64>>,
}

impl AdaptiveDescent {
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            movement: config.max_movement,
            min_movement: config.min_movement,
            max_movement: config.max_movement,
            cutback: config.cutback,
            previous: None,
        }
    }

    pub fn movement(&self) -> f64 {
        self.movement
    }
}

impl StepPolicy for AdaptiveDescent {
    fn choose_step(&mut self, layout: &mut Layout, probe: &StepProbe<'_>) -> Result<f64> {
        if let Some(previous) = &self.previous {
            let tangency = dot(previous, probe.direction);
            if tangency < DIVERGING_TANGENCY {
                self.movement *= self.cutback;
            } else if tangency > AGREEING_TANGENCY {
                self.movement = (self.movement * MOVEMENT_GROWTH).min(self.max_movement);
            }
        }
        self.previous = Some(probe.direction.to_vec());

        loop {
            if self.movement <= self.min_movement {
                self.movement = 0.0;
                return Ok(0.0);
            }
            let cost = layout.cost_along(probe.direction, self.movement)?;
            if cost < probe.starting_cost {
                return Ok(self.movement);
            }
            self.movement *= self.cutback;
        }
    }
}

/// Bisection on `[min_movement, max_movement]` for the longest step the
/// first-order model still predicts to within `max_error`.
#[derive(Debug, Clone)]
pub struct BisectionSearch {
    min_movement: f64,
    max_movement: f64,
    max_error: f64,
}

impl BisectionSearch {
    pub fn new(config: &SolverConfig, max_error: f64) -> Self {
        Self {
            min_movement: config.min_movement,
            max_movement: config.max_movement,
            max_error,
        }
    }
}

impl StepPolicy for BisectionSearch {
    fn choose_step(&mut self, layout: &mut Layout, probe: &StepProbe<'_>) -> Result<f64> {
        let mut lo = self.min_movement;
        let mut hi = self.max_movement;
        for _ in 0..MAX_BISECTIONS {
            if hi - lo <= self.min_movement {
                break;
            }
            let step = 0.5 * (lo + hi);
            let predicted = -probe.gradient_norm * step;
            if predicted == 0.0 {
                return Err(PlacementError::DegeneratePrediction { step });
            }
            let actual = layout.cost_along(probe.direction, step)? - probe.starting_cost;
            // With max_error < 1 an accepted step always lowers the cost.
            let error = 1.0 - actual / predicted;
            if error.abs() > self.max_error {
                hi = step;
            } else {
                lo = step;
            }
        }
        Ok(lo)
    }
}

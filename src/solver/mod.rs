// Descent loop over the layout's unknown vector.
//
// Each iteration estimates the gradient by central differences, asks the
// configured step policy how far to go along the unit descent direction and
// commits that move. The run ends at a stationary point, when the chosen
// step falls to the minimum movement, or when the iteration budget runs out.

pub mod cost;
pub mod diff;
pub mod step;

use crate::error::{PlacementError, Result};
use crate::placement::Layout;
use serde::Serialize;
use std::fmt;

pub use cost::{CostBreakdown, OverlapReport, OverlapTarget};
pub use diff::{gradient, hessian};
pub use step::{AdaptiveDescent, BisectionSearch, StepPolicy, StepProbe, policy_for};

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Termination {
    /// The gradient vanished exactly.
    StationaryPoint,
    /// The step policy could not find a step above the minimum movement.
    StepBelowMinimum,
    /// Ran out of iterations before converging.
    MaxIterations,
}

impl Termination {
    pub fn converged(self) -> bool {
        !matches!(self, Termination::MaxIterations)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::StationaryPoint => write!(f, "stationary point"),
            Termination::StepBelowMinimum => write!(f, "step below minimum movement"),
            Termination::MaxIterations => write!(f, "maximum iterations reached"),
        }
    }
}

/// One committed iteration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationRecord {
    pub iteration: usize,
    pub starting_cost: f64,
    pub final_cost: f64,
    pub gradient_norm: f64,
    pub step: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveReport {
    pub final_cost: f64,
    /// Number of committed steps.
    pub iterations: usize,
    pub converged: bool,
    pub termination: Termination,
    pub history: Vec<IterationRecord>,
}

/// Runs the strategy named in the layout's config to termination.
pub fn solve(layout: &mut Layout) -> Result<SolveReport> {
    let mut policy = policy_for(layout.config());
    solve_with(layout, policy.as_mut())
}

/// Runs the descent loop with a caller-supplied step policy.
pub fn solve_with(layout: &mut Layout, policy: &mut dyn StepPolicy) -> Result<SolveReport> {
    let config = layout.config().clone();
    let _span = tracing::debug_span!(
        "solve",
        labels = layout.labels().len(),
        keepouts = layout.keepouts().len(),
        strategy = config.strategy.name()
    )
    .entered();

    let mut history = Vec::new();
    let termination = loop {
        let iteration = history.len();
        if iteration >= config.max_iteration_count {
            break Termination::MaxIterations;
        }

        let starting_cost = layout.cost(false)?;
        let grad = gradient(layout)?;
        let gradient_norm = diff::norm(&grad);
        if gradient_norm == 0.0 {
            break Termination::StationaryPoint;
        }
        if !gradient_norm.is_finite() {
            return Err(PlacementError::NonFiniteGradient { iteration });
        }

        let direction: Vec<f64> = grad.iter().map(|g| -g / gradient_norm).collect();
        let probe = StepProbe {
            direction: &direction,
            gradient_norm,
            starting_cost,
        };
        let step = policy.choose_step(layout, &probe)?;
        if step <= config.min_movement {
            break Termination::StepBelowMinimum;
        }

        layout.apply_step(&direction, step)?;
        let final_cost = layout.cost(false)?;
        tracing::debug!(
            iteration,
            cost = final_cost,
            gradient_norm,
            step,
            "committed step"
        );
        history.push(IterationRecord {
            iteration,
            starting_cost,
            final_cost,
            gradient_norm,
            step,
        });
    };

    let final_cost = match history.last() {
        Some(record) => record.final_cost,
        None => layout.cost(false)?,
    };
    let report = SolveReport {
        final_cost,
        iterations: history.len(),
        converged: termination.converged(),
        termination,
        history,
    };
    tracing::info!(
        iterations = report.iterations,
        final_cost = report.final_cost,
        termination = %report.termination,
        "solver finished"
    );
    Ok(report)
}

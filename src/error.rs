use std::fmt;
use thiserror::Error;

/// Which input list a malformed entity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Label,
    Keepout,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Label => write!(f, "label"),
            EntityKind::Keepout => write!(f, "keepout"),
        }
    }
}

/// Errors raised by the placement engine.
///
/// Every variant is a setup or programming error. Running out of
/// iterations is reported through [`crate::solver::SolveReport`] instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("invalid interval: [{a}, {b}] and [{c}, {d}] must both be ordered")]
    InvalidInterval { a: f64, b: f64, c: f64, d: f64 },

    #[error("linear cost prediction is zero for step {step}")]
    DegeneratePrediction { step: f64 },

    #[error("gradient is not finite at iteration {iteration}")]
    NonFiniteGradient { iteration: usize },

    #[error("{kind} {index} has invalid size {width} x {height}")]
    InvalidDimensions {
        kind: EntityKind,
        index: usize,
        width: f64,
        height: f64,
    },

    #[error("{kind} {index} has a non-finite anchor")]
    NonFiniteCoordinate { kind: EntityKind, index: usize },

    #[error("unknown index {index} out of range (vector has {len} components)")]
    UnknownIndex { index: usize, len: usize },

    #[error("expected {expected} unknowns, got {actual}")]
    UnknownCountMismatch { expected: usize, actual: usize },

    #[error("invalid solver config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PlacementError>;

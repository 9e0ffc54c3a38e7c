//! Construction-time validation errors

use thiserror::Error;

use crate::tuning::TuningError;

/// Invariant violation detected while building an entity or a world.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("radius must be finite and non-negative, got {0}")]
    InvalidRadius(f32),

    #[error("speed must be finite and non-negative, got {0}")]
    InvalidSpeed(f32),

    #[error("direction must be zero or unit length, got length {length}")]
    NonUnitDirection { length: f32 },

    #[error("position must be finite, got ({x}, {y}, {z})")]
    NonFinitePosition { x: f32, y: f32, z: f32 },

    #[error(transparent)]
    Tuning(#[from] TuningError),
}

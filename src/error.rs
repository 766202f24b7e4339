//! Construction-time errors for physics components and configuration.

use thiserror::Error;

/// Errors raised while building colliders, bodies or the physics world.
///
/// The simulation itself never fails; everything here is rejected before
/// the first tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("mass must be finite and positive, got {0}")]
    InvalidMass(f32),

    #[error("{name} must be finite and positive, got {value}")]
    InvalidDimension { name: &'static str, value: f32 },

    #[error("polygon needs at least 3 finite vertices, got {0}")]
    InvalidPolygon(usize),

    #[error("unknown collider shape kind {0:?}")]
    UnknownShape(String),

    #[error("{name} out of range: {value}")]
    InvalidMaterial { name: &'static str, value: f32 },

    #[error("{name} must be in [0, 1), got {value}")]
    InvalidDrag { name: &'static str, value: f32 },

    #[error("max speed must be positive, got {0}")]
    InvalidMaxSpeed(f32),

    #[error("invalid physics config: {0}")]
    InvalidConfig(&'static str),
}

/// Result alias used by fallible constructors.
pub type Result<T> = std::result::Result<T, PhysicsError>;

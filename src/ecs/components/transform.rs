//! Transform component for 2D entities.

use glam::{Affine2, Vec2};

/// Entity transform. Position is the entity centre.
///
/// Physics writes `position` and `rotation`; `scale` is read-only to the
/// simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2d {
    pub position: Vec2,
    /// Rotation in radians. Cosmetic: collision bounds ignore it.
    pub rotation: f32,
    pub scale: Vec2,
}

impl Transform2d {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform from x/y coordinates.
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::from_position(Vec2::new(x, y))
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Convert to an affine matrix (translation * rotation * scale), for renderers.
    pub fn to_affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
    }
}

impl Default for Transform2d {
    fn default() -> Self {
        Self::identity()
    }
}

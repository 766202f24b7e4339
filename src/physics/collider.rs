//! World-space bounds projection for colliders.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, ColliderShape};
use crate::ecs::components::transform::Transform2d;

/// Axis-aligned bounding box used by every collision stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsAabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl PhysicsAabb {
    #[inline]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Test whether two AABBs overlap (touching counts).
    #[inline]
    pub fn overlaps(&self, other: &PhysicsAabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Closest point inside the box to `point`.
    #[inline]
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

impl Collider {
    /// World-space centre of the shape (transform position plus scaled offset).
    #[inline]
    pub fn world_center(&self, transform: &Transform2d) -> Vec2 {
        transform.position + self.offset * transform.scale
    }

    /// World-space radius of a circle collider; uniform scale uses the
    /// larger axis.
    #[inline]
    pub fn world_radius(&self, transform: &Transform2d) -> Option<f32> {
        match self.shape {
            ColliderShape::Circle { radius } => Some(radius * transform.scale.abs().max_element()),
            _ => None,
        }
    }

    /// Compute the world-space AABB. Rotation is ignored.
    pub fn bounds(&self, transform: &Transform2d) -> PhysicsAabb {
        let center = self.world_center(transform);
        let scale = transform.scale.abs();

        match &self.shape {
            ColliderShape::Rectangle { width, height } => PhysicsAabb::from_center_half_extents(
                center,
                Vec2::new(*width, *height) * 0.5 * scale,
            ),
            ColliderShape::Circle { radius } => {
                let world_radius = *radius * scale.max_element();
                PhysicsAabb::from_center_half_extents(center, Vec2::splat(world_radius))
            }
            ColliderShape::Polygon { vertices } => {
                if vertices.is_empty() {
                    return PhysicsAabb::new(center, center);
                }
                let mut min = Vec2::splat(f32::MAX);
                let mut max = Vec2::splat(f32::MIN);
                for v in vertices {
                    let wp = center + *v * transform.scale;
                    min = min.min(wp);
                    max = max.max(wp);
                }
                PhysicsAabb { min, max }
            }
        }
    }
}

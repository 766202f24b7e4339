//! Ray and region queries against collider bounds.

use glam::Vec2;
use tracing::trace;

use crate::ecs::components::physics::{Collider, CollisionLayers};
use crate::ecs::components::transform::Transform2d;

use super::collider::PhysicsAabb;
use super::narrowphase::CONTACT_EPSILON;

/// A ray with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    pub direction: Vec2,
}

impl Ray {
    /// Normalises `direction`. Returns `None` for a zero-length or
    /// non-finite direction.
    pub fn new(origin: Vec2, direction: Vec2) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }
}

/// Nearest hit returned by [`raycast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub entity: hecs::Entity,
    pub point: Vec2,
    /// Outward normal of the face that was hit.
    pub normal: Vec2,
    pub distance: f32,
}

/// Slab test. Returns the hit distance along the ray and the face normal.
///
/// A ray starting inside the box reports where it leaves.
pub fn ray_aabb(ray: &Ray, aabb: &PhysicsAabb, max_distance: f32) -> Option<(f32, Vec2)> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..2 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        let (lo, hi) = (aabb.min[axis], aabb.max[axis]);

        if dir == 0.0 {
            // Parallel to this slab
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let mut t1 = (lo - origin) * inv;
        let mut t2 = (hi - origin) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
    }

    if t_min > t_max || t_max < 0.0 {
        return None;
    }

    let t = if t_min < 0.0 { t_max } else { t_min };
    if t > max_distance {
        return None;
    }

    Some((t, face_normal(aabb, ray.at(t))))
}

/// Normal of the face `point` lies on.
///
/// A face within [`CONTACT_EPSILON`] wins, checked left, right, top, bottom.
/// Otherwise the nearest face is used.
fn face_normal(aabb: &PhysicsAabb, point: Vec2) -> Vec2 {
    let faces = [
        ((point.x - aabb.min.x).abs(), Vec2::NEG_X),
        ((point.x - aabb.max.x).abs(), Vec2::X),
        ((point.y - aabb.min.y).abs(), Vec2::NEG_Y),
        ((point.y - aabb.max.y).abs(), Vec2::Y),
    ];

    if let Some((_, normal)) = faces.iter().find(|(distance, _)| *distance < CONTACT_EPSILON) {
        return *normal;
    }

    let mut best = faces[0];
    for face in &faces[1..] {
        if face.0 < best.0 {
            best = *face;
        }
    }
    best.1
}

/// Nearest collider hit by the ray within `max_distance`.
///
/// Tests each collider's bounding box, not its exact shape. Only colliders
/// whose layer intersects `layer_mask` are considered; triggers are included.
/// Equal distances resolve to the lower entity.
pub fn raycast(
    world: &hecs::World,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
    layer_mask: CollisionLayers,
) -> Option<RaycastHit> {
    let Some(ray) = Ray::new(origin, direction) else {
        trace!(?direction, "degenerate ray direction");
        return None;
    };

    let mut nearest: Option<RaycastHit> = None;
    for (entity, (collider, transform)) in world.query::<(&Collider, &Transform2d)>().iter() {
        if !collider.layer.intersects(layer_mask) {
            continue;
        }
        let bounds = collider.bounds(transform);
        if !bounds.is_finite() {
            continue;
        }
        let Some((distance, normal)) = ray_aabb(&ray, &bounds, max_distance) else {
            continue;
        };

        let closer = match &nearest {
            None => true,
            Some(hit) => {
                distance < hit.distance || (distance == hit.distance && entity < hit.entity)
            }
        };
        if closer {
            nearest = Some(RaycastHit {
                entity,
                point: ray.at(distance),
                normal,
                distance,
            });
        }
    }
    nearest
}

/// Entities whose collider bounds overlap `region`, sorted by entity.
pub fn query_region(
    world: &hecs::World,
    region: &PhysicsAabb,
    layer_mask: CollisionLayers,
) -> Vec<hecs::Entity> {
    let mut found: Vec<hecs::Entity> = world
        .query::<(&Collider, &Transform2d)>()
        .iter()
        .filter(|(_, (collider, transform))| {
            collider.layer.intersects(layer_mask) && collider.bounds(transform).overlaps(region)
        })
        .map(|(entity, _)| entity)
        .collect();
    found.sort_unstable();
    found
}

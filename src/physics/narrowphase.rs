//! Narrowphase collision detection: exact tests per shape pair.
//!
//! Polygons are tested through their bounding box.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, ShapeKind};
use crate::ecs::components::transform::Transform2d;

use super::collider::PhysicsAabb;
use super::contact::ContactInfo;

/// Distance below which a point counts as lying on a box face. Fixed, not
/// scaled with shape size.
pub const CONTACT_EPSILON: f32 = 1e-4;

/// Signature shared by every entry of the dispatch table.
type TestFn = fn(&Collider, &Transform2d, &Collider, &Transform2d) -> Option<ContactInfo>;

/// Indexed by `[kind_a][kind_b]` in [`ShapeKind`] discriminant order.
const DISPATCH: [[TestFn; 3]; 3] = [
    // Rectangle vs Rectangle / Circle / Polygon
    [collide_box_box, collide_box_circle, collide_box_box],
    // Circle vs Rectangle / Circle / Polygon
    [collide_circle_box, collide_circle_circle, collide_circle_box],
    // Polygon vs Rectangle / Circle / Polygon
    [collide_box_box, collide_box_circle, collide_box_box],
];

/// Detect collision between two colliders. The normal points from A to B.
#[inline]
pub fn detect_collision(
    collider_a: &Collider,
    transform_a: &Transform2d,
    collider_b: &Collider,
    transform_b: &Transform2d,
) -> Option<ContactInfo> {
    let kind_a: ShapeKind = collider_a.shape.kind();
    let kind_b: ShapeKind = collider_b.shape.kind();
    DISPATCH[kind_a as usize][kind_b as usize](collider_a, transform_a, collider_b, transform_b)
}

/// World-space circle of a collider. Non-circles use the circumscribed
/// circle of their bounds; the dispatch table never routes them here.
fn world_circle(collider: &Collider, transform: &Transform2d) -> (Vec2, f32) {
    match collider.world_radius(transform) {
        Some(radius) => (collider.world_center(transform), radius),
        None => {
            let bounds = collider.bounds(transform);
            (bounds.center(), bounds.size().length() * 0.5)
        }
    }
}

fn collide_box_box(
    a: &Collider,
    ta: &Transform2d,
    b: &Collider,
    tb: &Transform2d,
) -> Option<ContactInfo> {
    rect_rect_along(&a.bounds(ta), &b.bounds(tb), tb.position - ta.position)
}

fn collide_circle_circle(
    a: &Collider,
    ta: &Transform2d,
    b: &Collider,
    tb: &Transform2d,
) -> Option<ContactInfo> {
    let (center_a, radius_a) = world_circle(a, ta);
    let (center_b, radius_b) = world_circle(b, tb);
    circle_circle(center_a, radius_a, center_b, radius_b)
}

fn collide_circle_box(
    a: &Collider,
    ta: &Transform2d,
    b: &Collider,
    tb: &Transform2d,
) -> Option<ContactInfo> {
    let (center, radius) = world_circle(a, ta);
    circle_rect(center, radius, &b.bounds(tb))
}

fn collide_box_circle(
    a: &Collider,
    ta: &Transform2d,
    b: &Collider,
    tb: &Transform2d,
) -> Option<ContactInfo> {
    // Swap and flip normal
    let (center, radius) = world_circle(b, tb);
    let mut info = circle_rect(center, radius, &a.bounds(ta))?;
    info.normal = -info.normal;
    Some(info)
}

/// AABB overlap. Resolves along the axis of smaller overlap; exact ties go to Y.
///
/// The normal sign follows the box centres. Colliders go through
/// [`rect_rect_along`] with their transform origins instead.
#[inline]
pub fn rect_rect(a: &PhysicsAabb, b: &PhysicsAabb) -> Option<ContactInfo> {
    rect_rect_along(a, b, b.center() - a.center())
}

/// [`rect_rect`] with the normal sign taken from `delta` (A towards B) on
/// the chosen axis.
#[inline]
pub fn rect_rect_along(a: &PhysicsAabb, b: &PhysicsAabb, delta: Vec2) -> Option<ContactInfo> {
    let overlap_x = a.max.x.min(b.max.x) - a.min.x.max(b.min.x);
    let overlap_y = a.max.y.min(b.max.y) - a.min.y.max(b.min.y);

    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return None;
    }

    if overlap_x < overlap_y {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        Some(ContactInfo {
            normal: Vec2::new(sign, 0.0),
            overlap: overlap_x,
        })
    } else {
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        Some(ContactInfo {
            normal: Vec2::new(0.0, sign),
            overlap: overlap_y,
        })
    }
}

/// Circle-circle test. Coincident centres resolve along +X.
#[inline]
pub fn circle_circle(
    center_a: Vec2,
    radius_a: f32,
    center_b: Vec2,
    radius_b: f32,
) -> Option<ContactInfo> {
    let delta = center_b - center_a;
    let radius_sum = radius_a + radius_b;
    let dist_sq = delta.length_squared();

    if dist_sq >= radius_sum * radius_sum {
        return None;
    }

    let dist = dist_sq.sqrt();
    let normal = if dist > 0.0 { delta / dist } else { Vec2::X };

    Some(ContactInfo {
        normal,
        overlap: radius_sum - dist,
    })
}

/// Circle (A) against an axis-aligned box (B). The normal points from the
/// circle towards the box.
#[inline]
pub fn circle_rect(center: Vec2, radius: f32, rect: &PhysicsAabb) -> Option<ContactInfo> {
    let closest = rect.clamp_point(center);
    let to_circle = center - closest;
    let dist_sq = to_circle.length_squared();

    if dist_sq >= radius * radius {
        return None;
    }

    let dist = dist_sq.sqrt();

    if dist > CONTACT_EPSILON {
        return Some(ContactInfo {
            normal: -(to_circle / dist),
            overlap: radius - dist,
        });
    }

    // Centre on or inside the box: push out through the nearest face
    let faces = [
        (center.x - rect.min.x, Vec2::NEG_X),
        (rect.max.x - center.x, Vec2::X),
        (center.y - rect.min.y, Vec2::NEG_Y),
        (rect.max.y - center.y, Vec2::Y),
    ];
    let mut min_depth = f32::MAX;
    let mut outward = Vec2::NEG_Y;
    for (depth, face_normal) in faces {
        if depth < min_depth {
            min_depth = depth;
            outward = face_normal;
        }
    }

    Some(ContactInfo {
        normal: -outward,
        overlap: radius + min_depth.max(0.0),
    })
}

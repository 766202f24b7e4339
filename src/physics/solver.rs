//! Sequential pairwise impulse resolver.
//!
//! Each pair is resolved once per step: positional separation split by
//! inverse mass, a restitution impulse along the normal, then a friction
//! impulse along the tangent.

use glam::Vec2;
use tracing::trace;

use crate::ecs::components::physics::{Collider, ContactFlags, PhysicsBody};
use crate::ecs::components::transform::Transform2d;

use super::contact::CollisionPair;

/// Tangential speeds below this are treated as resting contact.
const FRICTION_REST_THRESHOLD: f32 = 0.01;
/// Normal component above which a contact counts as floor/ceiling or wall (~45°).
const CONTACT_AXIS_THRESHOLD: f32 = 0.7;

/// Solver-side copy of one body in a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// `0` for static bodies and static colliders.
    pub inv_mass: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Flags gathered during resolution, merged into the body afterwards.
    pub contacts: ContactFlags,
}

impl SolverBody {
    /// Snapshot a body. Body material overrides win over the collider's.
    pub fn new(transform: &Transform2d, body: &PhysicsBody, collider: &Collider) -> Self {
        let inv_mass = if collider.is_static {
            0.0
        } else {
            body.inverse_mass()
        };
        Self {
            position: transform.position,
            velocity: body.velocity,
            inv_mass,
            restitution: body.restitution.unwrap_or(collider.material.restitution),
            friction: body.friction.unwrap_or(collider.material.friction),
            contacts: ContactFlags::empty(),
        }
    }
}

/// Resolve one pair in place. Returns `false` when the pair is skipped
/// (trigger, or both sides immovable).
pub fn resolve_contact(pair: &CollisionPair, a: &mut SolverBody, b: &mut SolverBody) -> bool {
    if pair.is_trigger {
        return false;
    }

    let inv_mass_sum = a.inv_mass + b.inv_mass;
    if inv_mass_sum <= 0.0 {
        return false;
    }

    let normal = pair.normal;

    // Positional separation, heavier side moves less
    let sep_a = pair.overlap * a.inv_mass / inv_mass_sum;
    let sep_b = pair.overlap * b.inv_mass / inv_mass_sum;
    a.position -= normal * sep_a;
    b.position += normal * sep_b;

    let (flags_a, flags_b) = contact_flags(normal);
    if a.inv_mass > 0.0 {
        a.contacts |= flags_a;
    }
    if b.inv_mass > 0.0 {
        b.contacts |= flags_b;
    }

    let relative_velocity = b.velocity - a.velocity;
    let velocity_along_normal = relative_velocity.dot(normal);

    // Already separating
    if velocity_along_normal > 0.0 {
        return true;
    }

    let restitution = a.restitution.min(b.restitution);
    let j = -(1.0 + restitution) * velocity_along_normal / inv_mass_sum;
    let impulse = normal * j;
    a.velocity -= impulse * a.inv_mass;
    b.velocity += impulse * b.inv_mass;

    // Friction
    let relative_velocity = b.velocity - a.velocity;
    let tangent_velocity = relative_velocity - normal * relative_velocity.dot(normal);
    let tangent_speed = tangent_velocity.length();

    if tangent_speed < FRICTION_REST_THRESHOLD {
        return true;
    }

    let tangent = tangent_velocity / tangent_speed;
    let friction = (a.friction * b.friction).sqrt();
    let jt = -(friction * tangent_speed) / inv_mass_sum;
    let friction_impulse = tangent * jt;
    a.velocity -= friction_impulse * a.inv_mass;
    b.velocity += friction_impulse * b.inv_mass;

    true
}

/// Contact flags for (A, B) given the A→B normal in +Y-down coordinates.
fn contact_flags(normal: Vec2) -> (ContactFlags, ContactFlags) {
    let mut a = ContactFlags::empty();
    let mut b = ContactFlags::empty();

    if normal.y > CONTACT_AXIS_THRESHOLD {
        // B is below A
        a |= ContactFlags::GROUNDED;
        b |= ContactFlags::CEILING;
    } else if normal.y < -CONTACT_AXIS_THRESHOLD {
        a |= ContactFlags::CEILING;
        b |= ContactFlags::GROUNDED;
    } else if normal.x > CONTACT_AXIS_THRESHOLD {
        a |= ContactFlags::WALL_RIGHT;
        b |= ContactFlags::WALL_LEFT;
    } else if normal.x < -CONTACT_AXIS_THRESHOLD {
        a |= ContactFlags::WALL_LEFT;
        b |= ContactFlags::WALL_RIGHT;
    }

    (a, b)
}

/// Resolve every pair against the world. Returns the number of pairs that
/// received a response.
pub fn resolve_pairs(world: &mut hecs::World, pairs: &[CollisionPair]) -> usize {
    let mut resolved = 0;

    for pair in pairs {
        if pair.is_trigger {
            continue;
        }

        // Missing body on either side degrades to trigger-only
        let (Some(mut a), Some(mut b)) = (
            load_body(world, pair.entity_a),
            load_body(world, pair.entity_b),
        ) else {
            trace!(
                a = ?pair.entity_a,
                b = ?pair.entity_b,
                "pair without physics body, not resolved"
            );
            continue;
        };

        if !resolve_contact(pair, &mut a, &mut b) {
            continue;
        }

        store_body(world, pair.entity_a, &a);
        store_body(world, pair.entity_b, &b);
        resolved += 1;
    }

    resolved
}

fn load_body(world: &hecs::World, entity: hecs::Entity) -> Option<SolverBody> {
    let transform = world.get::<&Transform2d>(entity).ok()?;
    let body = world.get::<&PhysicsBody>(entity).ok()?;
    let collider = world.get::<&Collider>(entity).ok()?;
    Some(SolverBody::new(&transform, &body, &collider))
}

fn store_body(world: &mut hecs::World, entity: hecs::Entity, solved: &SolverBody) {
    // Immovable sides are never written
    if solved.inv_mass == 0.0 {
        return;
    }
    if let Ok(mut transform) = world.get::<&mut Transform2d>(entity) {
        transform.position = solved.position;
    }
    if let Ok(mut body) = world.get::<&mut PhysicsBody>(entity) {
        body.velocity = solved.velocity;
        body.contacts |= solved.contacts;
    }
}

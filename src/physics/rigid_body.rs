//! Rigid body integration functions.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, ContactFlags, PhysicsBody};
use crate::ecs::components::transform::Transform2d;

/// Advance one body by `dt` with semi-implicit Euler.
///
/// Order: gravity and accumulated forces, exponential linear drag, speed
/// clamp, position/rotation integration, angular drag. Grounded bodies skip
/// gravity. Accumulators are cleared afterwards.
pub fn integrate_body(body: &mut PhysicsBody, transform: &mut Transform2d, gravity: Vec2, dt: f32) {
    if body.is_static() {
        return;
    }
    let inv_mass = body.inverse_mass();

    // 1. Gravity and accumulated forces
    if body.use_gravity && !body.is_grounded() {
        body.velocity += gravity * body.gravity_scale * dt;
    }
    body.velocity += body.force_accumulator * inv_mass * dt;
    body.velocity += body.impulse_accumulator * inv_mass;

    // 2. Linear drag, independent of frame rate
    if body.linear_drag > 0.0 {
        body.velocity *= (1.0 - body.linear_drag).powf(dt);
    }

    // 3. Speed cap
    body.velocity = body.velocity.clamp_length_max(body.max_speed);

    // 4. Integrate
    transform.position += body.velocity * dt;
    transform.rotation += body.angular_velocity * dt;

    // 5. Angular drag
    if body.angular_drag > 0.0 {
        body.angular_velocity *= (1.0 - body.angular_drag).powf(dt);
    }

    body.force_accumulator = Vec2::ZERO;
    body.impulse_accumulator = Vec2::ZERO;
}

/// Integrate every dynamic body in the world. Returns the number integrated.
pub fn integrate_bodies(world: &mut hecs::World, gravity: Vec2, dt: f32) -> usize {
    let mut count = 0;
    for (_, (body, transform, collider)) in
        world.query_mut::<(&mut PhysicsBody, &mut Transform2d, Option<&Collider>)>()
    {
        if body.is_static() || collider.is_some_and(|c| c.is_static) {
            continue;
        }
        integrate_body(body, transform, gravity, dt);
        count += 1;
    }
    count
}

/// Clear contact flags on all bodies ahead of resolution.
pub fn reset_contacts(world: &mut hecs::World) {
    for (_, body) in world.query_mut::<&mut PhysicsBody>() {
        body.contacts = ContactFlags::empty();
    }
}

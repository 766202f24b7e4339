//! Rein 2D Physics
//!
//! A 2D collision and rigid body core on top of the hecs ECS.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **ecs** - Components stored on hecs entities (transform, collider, body)
//! 2. **physics** - Spatial hashing, narrowphase, impulse resolver, integrator,
//!    collision events and ray queries
//! 3. **error** - Construction-time validation errors
//!
//! Coordinates are screen-style: +Y points down, default gravity is `(0, 980)`.
//!
//! ```no_run
//! use rein2d::{Collider, PhysicsBody, PhysicsConfig, PhysicsWorld, Transform2d};
//!
//! # fn main() -> rein2d::Result<()> {
//! let mut world = rein2d::hecs::World::new();
//! let mut physics = PhysicsWorld::new(PhysicsConfig::default())?;
//!
//! world.spawn((
//!     Transform2d::from_xy(0.0, 0.0),
//!     PhysicsBody::new_dynamic(1.0)?,
//!     Collider::rectangle(32.0, 32.0)?,
//! ));
//!
//! physics.step(&mut world, 1.0 / 60.0);
//! for event in physics.events() {
//!     println!("{:?}", event.kind);
//! }
//! # Ok(())
//! # }
//! ```

pub mod ecs;
pub mod error;
pub mod physics;

// Re-export commonly used types
pub use ecs::components::{
    BodyType, Collider, ColliderShape, CollisionLayers, ContactFlags, PhysicsBody,
    PhysicsMaterial, ShapeKind, Transform2d,
};
pub use error::{PhysicsError, Result};
pub use physics::collider::PhysicsAabb;
pub use physics::contact::{
    CollisionEvent, CollisionEventKind, CollisionPair, EntityCollision, PairKey,
};
pub use physics::raycast::{Ray, RaycastHit};
pub use physics::{PhysicsConfig, PhysicsWorld, StepStats};

// Re-export dependencies for convenience
pub use glam;
pub use hecs;

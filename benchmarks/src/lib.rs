//! Scene builders shared by the physics benchmarks.

use glam::Vec2;
use rein2d::physics::contact::CollisionPair;
use rein2d::physics::narrowphase::detect_collision;
use rein2d::{Collider, CollisionLayers, PhysicsBody, PhysicsConfig, PhysicsWorld, Transform2d};

/// Side length of the square arena used by the scene builders.
pub const ARENA_SIZE: f32 = 2000.0;

/// Deterministic pseudo-random point in `[0, 1)²` for index `i`.
fn scatter(i: usize) -> Vec2 {
    // Weyl sequence with the plastic constant
    const A1: f32 = 0.754_877_7;
    const A2: f32 = 0.569_840_3;
    let i = i as f32;
    Vec2::new((0.5 + A1 * i).fract(), (0.5 + A2 * i).fract())
}

fn dynamic_body() -> PhysicsBody {
    PhysicsBody::new_dynamic(1.0).expect("positive mass")
}

/// `n` circles packed densely enough that most have neighbours.
pub fn setup_circle_world(n: usize) -> hecs::World {
    let mut world = hecs::World::new();
    let side = (n as f32).sqrt().ceil() as usize;
    for i in 0..n {
        let x = (i % side) as f32 * 18.0;
        let y = (i / side) as f32 * 18.0;
        world.spawn((
            Transform2d::from_xy(x, y),
            dynamic_body(),
            Collider::circle(10.0).expect("positive radius"),
        ));
    }
    world
}

/// `n` bodies alternating rectangles, circles and triangles.
pub fn setup_mixed_world(n: usize) -> hecs::World {
    let mut world = hecs::World::new();
    let side = (n as f32).sqrt().ceil() as usize;
    for i in 0..n {
        let position = Vec2::new((i % side) as f32 * 18.0, (i / side) as f32 * 18.0);
        let collider = match i % 3 {
            0 => Collider::rectangle(20.0, 16.0),
            1 => Collider::circle(10.0),
            _ => Collider::polygon(vec![
                Vec2::new(-10.0, 8.0),
                Vec2::new(10.0, 8.0),
                Vec2::new(0.0, -10.0),
            ]),
        }
        .expect("valid shape");
        world.spawn((Transform2d::from_position(position), dynamic_body(), collider));
    }
    world
}

/// `n` small circles scattered across the whole arena.
pub fn setup_sparse_world(n: usize) -> hecs::World {
    let mut world = hecs::World::new();
    for i in 0..n {
        world.spawn((
            Transform2d::from_position(scatter(i) * ARENA_SIZE),
            dynamic_body(),
            Collider::circle(4.0).expect("positive radius"),
        ));
    }
    world
}

/// `n` overlapping body pairs and their narrowphase results.
pub fn setup_contacts(n: usize) -> (hecs::World, Vec<CollisionPair>) {
    let mut world = hecs::World::new();
    let mut pairs = Vec::with_capacity(n);
    for i in 0..n {
        let x = i as f32 * 50.0;
        let ta = Transform2d::from_xy(x, 0.0);
        let tb = Transform2d::from_xy(x + 15.0, 2.0);
        let ca = Collider::rectangle(20.0, 20.0).expect("valid shape");
        let cb = Collider::circle(10.0).expect("positive radius");

        let info = detect_collision(&ca, &ta, &cb, &tb).expect("shapes overlap");
        let a = world.spawn((
            ta,
            dynamic_body().with_velocity(Vec2::new(30.0, 0.0)),
            ca,
        ));
        let b = world.spawn((
            tb,
            dynamic_body().with_velocity(Vec2::new(-30.0, 5.0)),
            cb,
        ));
        pairs.push(CollisionPair {
            entity_a: a,
            entity_b: b,
            overlap: info.overlap,
            normal: info.normal,
            is_trigger: false,
        });
    }
    (world, pairs)
}

/// Static floor and walls enclosing the arena.
fn spawn_bounds(world: &mut hecs::World) {
    let half = ARENA_SIZE * 0.5;
    let walls = [
        (Vec2::new(half, ARENA_SIZE + 10.0), Vec2::new(ARENA_SIZE + 40.0, 20.0)),
        (Vec2::new(-10.0, half), Vec2::new(20.0, ARENA_SIZE)),
        (Vec2::new(ARENA_SIZE + 10.0, half), Vec2::new(20.0, ARENA_SIZE)),
    ];
    for (position, size) in walls {
        world.spawn((
            Transform2d::from_position(position),
            PhysicsBody::new_static(),
            Collider::rectangle(size.x, size.y)
                .expect("valid shape")
                .with_layer(CollisionLayers::TERRAIN),
        ));
    }
}

/// `n` mixed bodies above a static floor, with a fresh physics world.
pub fn setup_scene(n: usize) -> (hecs::World, PhysicsWorld) {
    let mut world = setup_mixed_world(n);
    spawn_bounds(&mut world);
    let physics = PhysicsWorld::new(PhysicsConfig::default()).expect("default config is valid");
    (world, physics)
}

/// An enclosed arena with `initial` bodies already scattered in it.
pub fn setup_mass_scene(initial: usize) -> (hecs::World, PhysicsWorld) {
    let mut world = hecs::World::new();
    spawn_bounds(&mut world);
    for i in 0..initial {
        spawn_falling(&mut world, i);
    }
    let physics = PhysicsWorld::new(PhysicsConfig::default()).expect("default config is valid");
    (world, physics)
}

fn spawn_falling(world: &mut hecs::World, i: usize) {
    let p = scatter(i);
    let position = Vec2::new(p.x * (ARENA_SIZE - 40.0) + 20.0, p.y * ARENA_SIZE * 0.5);
    let collider = if i % 2 == 0 {
        Collider::circle(8.0)
    } else {
        Collider::rectangle(16.0, 16.0)
    }
    .expect("valid shape");
    world.spawn((Transform2d::from_position(position), dynamic_body(), collider));
}

/// Step `frames` frames, spawning `spawn_per_frame` bodies before each.
pub fn run_mass_physics(
    world: &mut hecs::World,
    physics: &mut PhysicsWorld,
    frames: usize,
    spawn_per_frame: usize,
    initial: usize,
) {
    let mut next = initial;
    for _ in 0..frames {
        for _ in 0..spawn_per_frame {
            spawn_falling(world, next);
            next += 1;
        }
        physics.step(world, 1.0 / 60.0);
        physics.drain_events();
    }
}

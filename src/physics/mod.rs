//! CPU 2D physics with impulse collision response and collision events.
//!
//! # Architecture
//!
//! The physics pipeline runs in a fixed timestep loop. Each tick:
//!
//! 1. Rebuild the spatial hash grid from current collider bounds
//! 2. Integrate bodies (gravity, drag, speed cap, position)
//! 3. Broadphase candidate pairs from the grid
//! 4. Narrowphase, once per unordered entity pair
//! 5. Reset contact flags and resolve contacts
//! 6. Diff against the previous tick and emit enter/stay/exit events

pub mod broadphase;
pub mod collider;
pub mod contact;
pub mod narrowphase;
pub mod raycast;
pub mod rigid_body;
pub mod solver;

use glam::Vec2;
use tracing::{debug, trace, warn};

use crate::ecs::components::physics::{Collider, CollisionLayers};
use crate::ecs::components::transform::Transform2d;
use crate::error::{PhysicsError, Result};

use self::broadphase::{SpatialHashGrid, DEFAULT_CELL_SIZE};
use self::collider::PhysicsAabb;
use self::contact::{CollisionEvent, CollisionPair, ContactTracker, EntityCollision, PairKey};
use self::narrowphase::detect_collision;
use self::raycast::RaycastHit;

/// Configuration for the physics simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Gravity vector in units/s², +Y down. Default: (0, 980).
    pub gravity: Vec2,
    /// Fixed timestep for physics updates in seconds. Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum number of sub-steps per frame. Default: 4.
    pub max_substeps: u32,
    /// Spatial hash cell edge length. Default: 100.
    pub cell_size: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 980.0),
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite"));
        }
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(PhysicsError::InvalidConfig(
                "fixed_timestep must be finite and positive",
            ));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig("max_substeps must be at least 1"));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(PhysicsError::InvalidConfig(
                "cell_size must be finite and positive",
            ));
        }
        Ok(())
    }
}

/// Counters from the most recent fixed tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub bodies_integrated: usize,
    pub candidate_pairs: usize,
    pub contacts: usize,
    pub resolved: usize,
}

/// The main physics world managing simulation state.
///
/// Component state lives in the `hecs::World` passed to each call; this
/// struct only owns the accumulator, the grid, the retained pair set and
/// the event buffer.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    accumulator: f64,
    grid: SpatialHashGrid,
    tracker: ContactTracker,
    pairs: Vec<CollisionPair>,
    events: Vec<CollisionEvent>,
    stats: StepStats,
}

impl PhysicsWorld {
    /// Create a new physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grid: SpatialHashGrid::new(config.cell_size),
            config,
            accumulator: 0.0,
            tracker: ContactTracker::new(),
            pairs: Vec::new(),
            events: Vec::new(),
            stats: StepStats::default(),
        })
    }

    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Step the physics simulation forward by `delta_time` seconds.
    ///
    /// Uses a fixed timestep accumulator to ensure deterministic simulation.
    /// Events from the previous call are discarded; events of every sub-step
    /// run by this call are buffered. Returns the number of sub-steps run.
    pub fn step(&mut self, world: &mut hecs::World, delta_time: f64) -> u32 {
        self.events.clear();

        if !(delta_time.is_finite() && delta_time >= 0.0) {
            warn!(delta_time, "ignoring invalid physics delta time");
            return 0;
        }
        self.accumulator += delta_time;

        let fixed = self.config.fixed_timestep;
        let mut substeps = 0u32;
        while self.accumulator >= fixed && substeps < self.config.max_substeps {
            self.fixed_step(world, fixed as f32);
            self.accumulator -= fixed;
            substeps += 1;
        }

        // Clamp accumulator to avoid spiral of death
        if self.accumulator > fixed * self.config.max_substeps as f64 {
            warn!(
                dropped = self.accumulator,
                max_substeps = self.config.max_substeps,
                "physics falling behind, dropping accumulated time"
            );
            self.accumulator = 0.0;
        }

        substeps
    }

    /// Run exactly one tick of `dt` seconds.
    ///
    /// Events are appended to the buffer; [`step`](Self::step) clears it, so
    /// callers driving ticks directly should [`drain_events`](Self::drain_events).
    pub fn fixed_step(&mut self, world: &mut hecs::World, dt: f32) {
        // 1. Rebuild the spatial index
        self.grid.rebuild(world);

        // 2. Integrate
        let bodies_integrated = rigid_body::integrate_bodies(world, self.config.gravity, dt);

        // 3. Broadphase candidate pairs
        let candidates = self.grid.find_pairs(world);

        // 4. Narrowphase
        self.pairs.clear();
        for key in &candidates {
            if let Some(pair) = narrow_pair(world, *key) {
                self.pairs.push(pair);
            }
        }

        // 5. Resolve contacts
        rigid_body::reset_contacts(world);
        let resolved = solver::resolve_pairs(world, &self.pairs);

        // 6. Collision lifecycle
        self.tracker.update(&self.pairs, &mut self.events);

        self.stats = StepStats {
            bodies_integrated,
            candidate_pairs: candidates.len(),
            contacts: self.pairs.len(),
            resolved,
        };
        debug!(
            bodies = bodies_integrated,
            candidates = candidates.len(),
            contacts = self.pairs.len(),
            resolved,
            "physics tick"
        );
    }

    /// Pair events buffered since the last [`step`](Self::step).
    #[inline]
    pub fn events(&self) -> &[CollisionEvent] {
        &self.events
    }

    /// Take the buffered events, leaving the buffer empty.
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Buffered events involving `entity`, seen from its side.
    pub fn events_for(&self, entity: hecs::Entity) -> impl Iterator<Item = EntityCollision> + '_ {
        self.events.iter().filter_map(move |event| event.for_entity(entity))
    }

    /// Pairs found colliding in the last tick, in canonical key order.
    #[inline]
    pub fn pairs(&self) -> &[CollisionPair] {
        &self.pairs
    }

    /// Number of pairs retained for the next enter/stay/exit diff.
    #[inline]
    pub fn active_contacts(&self) -> usize {
        self.tracker.active_pairs()
    }

    #[inline]
    pub fn last_stats(&self) -> StepStats {
        self.stats
    }

    /// Nearest collider along a ray. See [`raycast::raycast`].
    pub fn raycast(
        &self,
        world: &hecs::World,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        layer_mask: CollisionLayers,
    ) -> Option<RaycastHit> {
        raycast::raycast(world, origin, direction, max_distance, layer_mask)
    }

    /// Entities whose collider bounds overlap `bounds`, sorted.
    pub fn query_region(
        &self,
        world: &hecs::World,
        bounds: &PhysicsAabb,
        layer_mask: CollisionLayers,
    ) -> Vec<hecs::Entity> {
        raycast::query_region(world, bounds, layer_mask)
    }

    /// Forget accumulated time, retained pairs and buffered events.
    ///
    /// No exit events are emitted for pairs that were active.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.grid.clear();
        self.tracker.clear();
        self.pairs.clear();
        self.events.clear();
        self.stats = StepStats::default();
    }
}

/// Exact test for one candidate pair; `None` if either side lost its
/// collider or transform, or the shapes do not touch.
fn narrow_pair(world: &hecs::World, key: PairKey) -> Option<CollisionPair> {
    let collider_a = world.get::<&Collider>(key.a).ok()?;
    let collider_b = world.get::<&Collider>(key.b).ok()?;
    let transform_a = world.get::<&Transform2d>(key.a).ok()?;
    let transform_b = world.get::<&Transform2d>(key.b).ok()?;

    let Some(info) = detect_collision(&collider_a, &transform_a, &collider_b, &transform_b) else {
        trace!(a = ?key.a, b = ?key.b, "candidate pair not touching");
        return None;
    };

    Some(CollisionPair {
        entity_a: key.a,
        entity_b: key.b,
        overlap: info.overlap,
        normal: info.normal,
        is_trigger: collider_a.is_trigger || collider_b.is_trigger,
    })
}

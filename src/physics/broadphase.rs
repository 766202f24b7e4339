//! Broadphase collision detection using a uniform spatial hash grid.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::ecs::components::physics::{Collider, CollisionLayers, PhysicsBody};
use crate::ecs::components::transform::Transform2d;

use super::collider::PhysicsAabb;
use super::contact::PairKey;

/// Default grid cell edge length in world units.
pub const DEFAULT_CELL_SIZE: f32 = 100.0;

type CellKey = (i32, i32);

/// Per-entity data captured for candidate filtering.
#[derive(Debug, Clone, Copy)]
struct BroadphaseEntry {
    aabb: PhysicsAabb,
    layer: CollisionLayers,
    mask: CollisionLayers,
    is_static: bool,
}

/// Uniform grid hashing entities into every cell their AABB covers.
///
/// An entity spanning k cells is stored k times; [`get_nearby`](Self::get_nearby)
/// deduplicates. The grid is rebuilt from scratch every tick.
pub struct SpatialHashGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<hecs::Entity>>,
}

impl Default for SpatialHashGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SpatialHashGrid {
    /// `cell_size` must be positive; [`PhysicsConfig::validate`](super::PhysicsConfig::validate)
    /// enforces this for grids owned by a world.
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.cells.len()
    }

    /// Compute cell coordinates for a point.
    #[inline]
    fn cell_coords(&self, x: f32, y: f32) -> CellKey {
        let inv = 1.0 / self.cell_size;
        ((x * inv).floor() as i32, (y * inv).floor() as i32)
    }

    #[inline]
    fn cell_range(&self, bounds: &PhysicsAabb) -> (CellKey, CellKey) {
        (
            self.cell_coords(bounds.min.x, bounds.min.y),
            self.cell_coords(bounds.max.x, bounds.max.y),
        )
    }

    /// Empty all buckets.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Store `entity` in every cell overlapped by `bounds`.
    pub fn insert(&mut self, entity: hecs::Entity, bounds: &PhysicsAabb) {
        if !bounds.is_finite() {
            warn!(?entity, ?bounds, "skipping collider with non-finite bounds");
            return;
        }
        let (min, max) = self.cell_range(bounds);
        for cx in min.0..=max.0 {
            for cy in min.1..=max.1 {
                self.cells.entry((cx, cy)).or_default().push(entity);
            }
        }
    }

    /// Entities stored in any bucket covered by `bounds`, sorted and deduplicated.
    pub fn get_nearby(&self, bounds: &PhysicsAabb) -> Vec<hecs::Entity> {
        let mut out = Vec::new();
        self.get_nearby_into(bounds, &mut out);
        out
    }

    /// Like [`get_nearby`](Self::get_nearby), reusing `out`.
    pub fn get_nearby_into(&self, bounds: &PhysicsAabb, out: &mut Vec<hecs::Entity>) {
        out.clear();
        if !bounds.is_finite() {
            return;
        }
        let (min, max) = self.cell_range(bounds);
        for cx in min.0..=max.0 {
            for cy in min.1..=max.1 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
    }

    /// Clear the grid and insert every collider in `world` at its current bounds.
    pub fn rebuild(&mut self, world: &hecs::World) {
        self.clear();
        for (entity, (collider, transform)) in world.query::<(&Collider, &Transform2d)>().iter() {
            self.insert(entity, &collider.bounds(transform));
        }
    }

    /// Shortlist candidate pairs for the narrowphase.
    ///
    /// Each unordered pair appears at most once, in canonical order. Pairs
    /// rejected by layer masks and static-static pairs are dropped.
    pub fn find_pairs(&self, world: &hecs::World) -> Vec<PairKey> {
        let mut entries: HashMap<hecs::Entity, BroadphaseEntry> = HashMap::new();
        let mut order = Vec::new();

        for (entity, (collider, transform, body)) in world
            .query::<(&Collider, &Transform2d, Option<&PhysicsBody>)>()
            .iter()
        {
            let aabb = collider.bounds(transform);
            if !aabb.is_finite() {
                continue;
            }
            entries.insert(
                entity,
                BroadphaseEntry {
                    aabb,
                    layer: collider.layer,
                    mask: collider.mask,
                    is_static: collider.is_static_with(body),
                },
            );
            order.push(entity);
        }
        order.sort_unstable();

        let mut checked: HashSet<PairKey> = HashSet::with_capacity(order.len() * 2);
        let mut pairs = Vec::with_capacity(order.len() * 2);
        let mut nearby = Vec::new();

        for entity_a in order {
            let a = entries[&entity_a];
            self.get_nearby_into(&a.aabb, &mut nearby);

            for &entity_b in &nearby {
                if entity_b == entity_a {
                    continue;
                }
                // Stale grid entry for an entity whose collider is gone.
                let Some(b) = entries.get(&entity_b) else {
                    continue;
                };

                let pair = PairKey::new(entity_a, entity_b);
                if !checked.insert(pair) {
                    continue;
                }

                // Skip static-static pairs
                if a.is_static && b.is_static {
                    continue;
                }

                if !(a.mask.intersects(b.layer) && b.mask.intersects(a.layer)) {
                    continue;
                }

                pairs.push(pair);
            }
        }

        pairs
    }
}

impl Collider {
    /// Whether this collider never moves: flagged static or attached to a
    /// static body.
    #[inline]
    pub fn is_static_with(&self, body: Option<&PhysicsBody>) -> bool {
        self.is_static || body.is_some_and(PhysicsBody::is_static)
    }
}

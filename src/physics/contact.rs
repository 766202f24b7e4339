//! Collision pairs and enter/stay/exit lifecycle tracking.

use std::collections::HashSet;

use glam::Vec2;

/// Result of an exact shape test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactInfo {
    /// Unit contact normal (from shape A to shape B).
    pub normal: Vec2,
    /// Penetration depth, always positive for a reported contact.
    pub overlap: f32,
}

/// Canonical unordered entity pair (`a < b`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    pub a: hecs::Entity,
    pub b: hecs::Entity,
}

impl PairKey {
    #[inline]
    pub fn new(x: hecs::Entity, y: hecs::Entity) -> Self {
        if x < y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    #[inline]
    pub fn contains(&self, entity: hecs::Entity) -> bool {
        self.a == entity || self.b == entity
    }
}

/// One colliding pair in one fixed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPair {
    pub entity_a: hecs::Entity,
    pub entity_b: hecs::Entity,
    /// Penetration depth.
    pub overlap: f32,
    /// Contact normal (from A to B).
    pub normal: Vec2,
    /// Either collider is a trigger; no physical response.
    pub is_trigger: bool,
}

impl CollisionPair {
    #[inline]
    pub fn key(&self) -> PairKey {
        PairKey::new(self.entity_a, self.entity_b)
    }

    /// The entity on the other side of the pair, if `entity` is part of it.
    #[inline]
    pub fn other(&self, entity: hecs::Entity) -> Option<hecs::Entity> {
        if entity == self.entity_a {
            Some(self.entity_b)
        } else if entity == self.entity_b {
            Some(self.entity_a)
        } else {
            None
        }
    }

    /// Placeholder pair for an exit event: the bodies no longer overlap.
    fn separated(key: PairKey) -> Self {
        Self {
            entity_a: key.a,
            entity_b: key.b,
            overlap: 0.0,
            normal: Vec2::ZERO,
            is_trigger: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionEventKind {
    Enter,
    Stay,
    Exit,
}

/// Pair-level collision event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub kind: CollisionEventKind,
    pub pair: CollisionPair,
}

/// A [`CollisionEvent`] seen from one of its entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityCollision {
    pub kind: CollisionEventKind,
    pub other: hecs::Entity,
    pub pair: CollisionPair,
}

impl CollisionEvent {
    /// View this event from `entity`'s side, if it is involved.
    pub fn for_entity(&self, entity: hecs::Entity) -> Option<EntityCollision> {
        self.pair.other(entity).map(|other| EntityCollision {
            kind: self.kind,
            other,
            pair: self.pair,
        })
    }
}

/// Classifies each step's pairs as enter/stay/exit against the previous step.
///
/// The retained key set is the only state that survives between steps.
#[derive(Debug, Default)]
pub struct ContactTracker {
    previous: HashSet<PairKey>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self {
            previous: HashSet::new(),
        }
    }

    /// Pairs that were colliding after the last update.
    pub fn active_pairs(&self) -> usize {
        self.previous.len()
    }

    pub fn is_active(&self, key: &PairKey) -> bool {
        self.previous.contains(key)
    }

    /// Diff `pairs` against the retained set, append the events to `events`
    /// and retain the current keys.
    ///
    /// Enter/stay events follow `pairs` order; exit events follow, sorted by key.
    pub fn update(&mut self, pairs: &[CollisionPair], events: &mut Vec<CollisionEvent>) {
        let mut current = HashSet::with_capacity(pairs.len());

        for pair in pairs {
            let key = pair.key();
            if !current.insert(key) {
                continue;
            }
            let kind = if self.previous.contains(&key) {
                CollisionEventKind::Stay
            } else {
                CollisionEventKind::Enter
            };
            events.push(CollisionEvent { kind, pair: *pair });
        }

        let mut exited: Vec<PairKey> = self.previous.difference(&current).copied().collect();
        exited.sort_unstable();
        events.extend(exited.into_iter().map(|key| CollisionEvent {
            kind: CollisionEventKind::Exit,
            pair: CollisionPair::separated(key),
        }));

        self.previous = current;
    }

    /// Forget all retained pairs without emitting exits.
    pub fn clear(&mut self) {
        self.previous.clear();
    }
}

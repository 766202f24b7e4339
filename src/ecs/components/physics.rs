//! Physics components for ECS entities.

use std::str::FromStr;

use bitflags::bitflags;
use glam::Vec2;

use crate::error::{PhysicsError, Result};

bitflags! {
    /// Collision layer bits. A collider's `layer` says what it is, its
    /// `mask` says what it tests against.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        const NONE = 0;
        const DEFAULT = 1 << 0;
        const PLAYER = 1 << 1;
        const ENEMY = 1 << 2;
        const PROJECTILE = 1 << 3;
        const TERRAIN = 1 << 4;
        const SENSOR = 1 << 5;
        /// Every layer, including custom ones.
        const ALL = u32::MAX;
    }
}

impl CollisionLayers {
    /// First bit index free for game-defined layers.
    pub const FIRST_CUSTOM: u32 = 6;

    /// Layer for bit `index`, or `None` if the index does not fit in 32 bits.
    pub fn layer(index: u32) -> Option<Self> {
        1u32.checked_shl(index).map(Self::from_bits_retain)
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::DEFAULT
    }
}

bitflags! {
    /// Contact state written by the resolver each fixed step.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ContactFlags: u8 {
        const GROUNDED = 1 << 0;
        const CEILING = 1 << 1;
        const WALL_LEFT = 1 << 2;
        const WALL_RIGHT = 1 << 3;
    }
}

/// Surface response of a collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsMaterial {
    /// Coefficient of restitution (0.0 - 1.0).
    pub restitution: f32,
    /// Friction coefficient (>= 0.0).
    pub friction: f32,
}

impl PhysicsMaterial {
    pub fn new(restitution: f32, friction: f32) -> Result<Self> {
        Ok(Self {
            restitution: validate_restitution(restitution)?,
            friction: validate_friction(friction)?,
        })
    }
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
        }
    }
}

fn validate_restitution(value: f32) -> Result<f32> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PhysicsError::InvalidMaterial {
            name: "restitution",
            value,
        })
    }
}

fn validate_friction(value: f32) -> Result<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(PhysicsError::InvalidMaterial {
            name: "friction",
            value,
        })
    }
}

fn validate_dimension(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PhysicsError::InvalidDimension { name, value })
    }
}

fn validate_drag(name: &'static str, value: f32) -> Result<f32> {
    if (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PhysicsError::InvalidDrag { name, value })
    }
}

/// Discriminant of [`ColliderShape`], used for narrowphase dispatch and
/// data-driven construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rectangle = 0,
    Circle = 1,
    Polygon = 2,
}

impl FromStr for ShapeKind {
    type Err = PhysicsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" | "box" => Ok(Self::Rectangle),
            "circle" => Ok(Self::Circle),
            "polygon" | "poly" => Ok(Self::Polygon),
            _ => Err(PhysicsError::UnknownShape(s.to_string())),
        }
    }
}

/// Collider shape. Dimensions are in local units, before transform scale.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    Rectangle { width: f32, height: f32 },
    Circle { radius: f32 },
    /// Local-space vertices. Collides as its bounding box.
    Polygon { vertices: Vec<Vec2> },
}

impl ColliderShape {
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        match self {
            ColliderShape::Rectangle { .. } => ShapeKind::Rectangle,
            ColliderShape::Circle { .. } => ShapeKind::Circle,
            ColliderShape::Polygon { .. } => ShapeKind::Polygon,
        }
    }
}

/// Collision detection component.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    /// Offset from the entity's transform origin (scaled by the transform).
    pub offset: Vec2,
    /// If true, generates collision events but no physics response.
    pub is_trigger: bool,
    /// If true, never moved by collision response.
    pub is_static: bool,
    pub layer: CollisionLayers,
    pub mask: CollisionLayers,
    pub material: PhysicsMaterial,
}

impl Collider {
    fn from_shape(shape: ColliderShape) -> Self {
        Self {
            shape,
            offset: Vec2::ZERO,
            is_trigger: false,
            is_static: false,
            layer: CollisionLayers::DEFAULT,
            mask: CollisionLayers::ALL,
            material: PhysicsMaterial::default(),
        }
    }

    /// Axis-aligned rectangle centred on the entity.
    pub fn rectangle(width: f32, height: f32) -> Result<Self> {
        Ok(Self::from_shape(ColliderShape::Rectangle {
            width: validate_dimension("width", width)?,
            height: validate_dimension("height", height)?,
        }))
    }

    pub fn circle(radius: f32) -> Result<Self> {
        Ok(Self::from_shape(ColliderShape::Circle {
            radius: validate_dimension("radius", radius)?,
        }))
    }

    pub fn polygon(vertices: Vec<Vec2>) -> Result<Self> {
        if vertices.len() < 3 || vertices.iter().any(|v| !v.is_finite()) {
            return Err(PhysicsError::InvalidPolygon(vertices.len()));
        }
        Ok(Self::from_shape(ColliderShape::Polygon { vertices }))
    }

    /// Build a collider from a shape name and a flat parameter list:
    /// `[width, height]` for rectangles, `[radius]` for circles and
    /// `[x0, y0, x1, y1, ...]` for polygons.
    pub fn from_kind(kind: &str, params: &[f32]) -> Result<Self> {
        match kind.parse::<ShapeKind>()? {
            ShapeKind::Rectangle => match params {
                [width, height] => Self::rectangle(*width, *height),
                _ => Err(PhysicsError::InvalidDimension {
                    name: "rectangle parameter count",
                    value: params.len() as f32,
                }),
            },
            ShapeKind::Circle => match params {
                [radius] => Self::circle(*radius),
                _ => Err(PhysicsError::InvalidDimension {
                    name: "circle parameter count",
                    value: params.len() as f32,
                }),
            },
            ShapeKind::Polygon => {
                if params.len() % 2 != 0 {
                    return Err(PhysicsError::InvalidPolygon(params.len() / 2));
                }
                let vertices = params
                    .chunks_exact(2)
                    .map(|xy| Vec2::new(xy[0], xy[1]))
                    .collect();
                Self::polygon(vertices)
            }
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_layer(mut self, layer: CollisionLayers) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_mask(mut self, mask: CollisionLayers) -> Self {
        self.mask = mask;
        self
    }

    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_material(mut self, restitution: f32, friction: f32) -> Result<Self> {
        self.material = PhysicsMaterial::new(restitution, friction)?;
        Ok(self)
    }

    /// Whether the layer/mask filters of both colliders accept each other.
    #[inline]
    pub fn can_collide_with(&self, other: &Collider) -> bool {
        self.mask.intersects(other.layer) && other.mask.intersects(self.layer)
    }
}

/// Rigid body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Affected by gravity, forces and collisions.
    Dynamic,
    /// Immovable; infinite mass.
    Static,
}

/// Kinematic state of an entity.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub(crate) body_type: BodyType,
    pub(crate) mass: f32,
    pub(crate) velocity: Vec2,
    /// Radians per second. Only rotates the transform.
    pub(crate) angular_velocity: f32,
    pub(crate) force_accumulator: Vec2,
    pub(crate) impulse_accumulator: Vec2,
    pub(crate) contacts: ContactFlags,
    /// Speed cap applied after drag (default: unbounded).
    pub max_speed: f32,
    /// Fraction of linear velocity lost per second, in [0, 1).
    pub linear_drag: f32,
    /// Fraction of angular velocity lost per second, in [0, 1).
    pub angular_drag: f32,
    pub use_gravity: bool,
    /// Gravity scale (default: 1.0).
    pub gravity_scale: f32,
    /// Overrides the collider material restitution when set.
    pub restitution: Option<f32>,
    /// Overrides the collider material friction when set.
    pub friction: Option<f32>,
}

impl PhysicsBody {
    /// Create a new dynamic body with the given mass.
    pub fn new_dynamic(mass: f32) -> Result<Self> {
        Ok(Self {
            body_type: BodyType::Dynamic,
            mass: validate_mass(mass)?,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force_accumulator: Vec2::ZERO,
            impulse_accumulator: Vec2::ZERO,
            contacts: ContactFlags::empty(),
            max_speed: f32::INFINITY,
            linear_drag: 0.0,
            angular_drag: 0.0,
            use_gravity: true,
            gravity_scale: 1.0,
            restitution: None,
            friction: None,
        })
    }

    /// Create a new static body. Its mass is infinite and velocity frozen.
    pub fn new_static() -> Self {
        Self {
            body_type: BodyType::Static,
            mass: f32::INFINITY,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force_accumulator: Vec2::ZERO,
            impulse_accumulator: Vec2::ZERO,
            contacts: ContactFlags::empty(),
            max_speed: f32::INFINITY,
            linear_drag: 0.0,
            angular_drag: 0.0,
            use_gravity: false,
            gravity_scale: 0.0,
            restitution: None,
            friction: None,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.set_velocity(velocity);
        self
    }

    pub fn with_linear_drag(mut self, drag: f32) -> Result<Self> {
        self.linear_drag = validate_drag("linear drag", drag)?;
        Ok(self)
    }

    pub fn with_angular_drag(mut self, drag: f32) -> Result<Self> {
        self.angular_drag = validate_drag("angular drag", drag)?;
        Ok(self)
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Result<Self> {
        if max_speed.is_nan() || max_speed <= 0.0 {
            return Err(PhysicsError::InvalidMaxSpeed(max_speed));
        }
        self.max_speed = max_speed;
        Ok(self)
    }

    pub fn with_gravity(mut self, use_gravity: bool, gravity_scale: f32) -> Self {
        self.use_gravity = use_gravity;
        self.gravity_scale = gravity_scale;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Result<Self> {
        self.restitution = Some(validate_restitution(restitution)?);
        Ok(self)
    }

    pub fn with_friction(mut self, friction: f32) -> Result<Self> {
        self.friction = Some(validate_friction(friction)?);
        Ok(self)
    }

    #[inline]
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    /// Mass; infinite for static bodies.
    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Change the mass of a dynamic body. Ignored for static bodies.
    pub fn set_mass(&mut self, mass: f32) -> Result<()> {
        let mass = validate_mass(mass)?;
        if !self.is_static() {
            self.mass = mass;
        }
        Ok(())
    }

    /// `0` for static bodies, `1 / mass` otherwise.
    ///
    /// # Panics
    ///
    /// Panics if a dynamic body carries a non-finite or non-positive mass.
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        match self.body_type {
            BodyType::Static => 0.0,
            BodyType::Dynamic => {
                assert!(
                    self.mass.is_finite() && self.mass > 0.0,
                    "dynamic body has invalid mass {}",
                    self.mass
                );
                1.0 / self.mass
            }
        }
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set the linear velocity. Static bodies stay frozen.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        if !self.is_static() {
            self.velocity = velocity;
        }
    }

    #[inline]
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        if !self.is_static() {
            self.angular_velocity = angular_velocity;
        }
    }

    /// Accumulate a force applied over the next fixed step.
    pub fn apply_force(&mut self, force: Vec2) {
        if !self.is_static() {
            self.force_accumulator += force;
        }
    }

    /// Accumulate an instantaneous impulse consumed on the next fixed step.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if !self.is_static() {
            self.impulse_accumulator += impulse;
        }
    }

    #[inline]
    pub fn contacts(&self) -> ContactFlags {
        self.contacts
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.contacts.contains(ContactFlags::GROUNDED)
    }

    #[inline]
    pub fn on_ceiling(&self) -> bool {
        self.contacts.contains(ContactFlags::CEILING)
    }

    #[inline]
    pub fn on_wall(&self) -> bool {
        self.contacts
            .intersects(ContactFlags::WALL_LEFT | ContactFlags::WALL_RIGHT)
    }
}

fn validate_mass(mass: f32) -> Result<f32> {
    if mass.is_finite() && mass > 0.0 {
        Ok(mass)
    } else {
        Err(PhysicsError::InvalidMass(mass))
    }
}

//! Collider shapes and descriptors

use crate::error::{PhysicsError, Result};
use crate::grid::CellKey;
use crate::layers::CollisionLayer;
use ranch_core::Id;
use ranch_math::{Vec3, AABB};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Handle to a collider in a `CollisionWorld`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColliderHandle(pub Id);

/// Collider shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColliderShape {
    /// Axis-aligned box
    Box { half_extents: Vec3 },
    /// Sphere
    Sphere { radius: f32 },
    /// Vertical capsule; `height` is the length of the cylinder part
    Capsule { radius: f32, height: f32 },
}

impl ColliderShape {
    /// Box from full width, height and depth
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            half_extents: Vec3::new(width * 0.5, height * 0.5, depth * 0.5),
        }
    }

    /// Radius used by the sphere tests. Capsules are treated as spheres.
    pub fn bounding_radius(&self) -> Option<f32> {
        match *self {
            Self::Box { .. } => None,
            Self::Sphere { radius } | Self::Capsule { radius, .. } => Some(radius),
        }
    }

    /// Half extents of the shape's bounding box
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            Self::Box { half_extents } => half_extents,
            Self::Sphere { radius } => Vec3::splat(radius),
            Self::Capsule { radius, height } => Vec3::new(radius, height * 0.5 + radius, radius),
        }
    }

    /// Bounding box around `center`
    pub fn aabb(&self, center: Vec3) -> AABB {
        AABB::from_center_half_extents(center, self.half_extents())
    }

    fn validate(&self) -> Result<()> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        let valid = match *self {
            Self::Box { half_extents: h } => ok(h.x) && ok(h.y) && ok(h.z),
            Self::Sphere { radius } => ok(radius),
            Self::Capsule { radius, height } => ok(radius) && height.is_finite() && height >= 0.0,
        };
        if valid {
            Ok(())
        } else {
            Err(PhysicsError::InvalidShape(format!("{:?}", self)))
        }
    }
}

/// Collider descriptor for creation
#[derive(Debug, Clone)]
pub struct ColliderDesc {
    /// Entity that owns this collider
    pub owner: Id,
    /// Shape
    pub shape: ColliderShape,
    /// Offset from the owner's position
    pub offset: Vec3,
    /// Collision layer
    pub layer: CollisionLayer,
    /// Static colliders are indexed once and never moved by responses
    pub is_static: bool,
    /// Triggers report overlaps but are never pushed apart
    pub is_trigger: bool,
}

impl ColliderDesc {
    /// Create a descriptor for a shape
    pub fn new(owner: Id, shape: ColliderShape) -> Self {
        Self {
            owner,
            shape,
            offset: Vec3::ZERO,
            layer: CollisionLayer::default(),
            is_static: false,
            is_trigger: false,
        }
    }

    /// Box collider from full dimensions
    pub fn cuboid(owner: Id, width: f32, height: f32, depth: f32) -> Self {
        Self::new(owner, ColliderShape::cuboid(width, height, depth))
    }

    /// Sphere collider
    pub fn sphere(owner: Id, radius: f32) -> Self {
        Self::new(owner, ColliderShape::Sphere { radius })
    }

    /// Capsule collider
    pub fn capsule(owner: Id, radius: f32, height: f32) -> Self {
        Self::new(owner, ColliderShape::Capsule { radius, height })
    }

    /// Set offset
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Set collision layer
    pub fn with_layer(mut self, layer: CollisionLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Mark as static
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Mark as trigger
    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }
}

/// A collider registered in a `CollisionWorld`
#[derive(Debug, Clone)]
pub struct Collider {
    pub owner: Id,
    pub shape: ColliderShape,
    pub offset: Vec3,
    pub layer: CollisionLayer,
    pub is_static: bool,
    pub is_trigger: bool,
    /// Owner position as last synced
    pub(crate) position: Vec3,
    /// Grid cells this collider occupies; written only by `SpatialGrid`
    pub(crate) cells: BTreeSet<CellKey>,
}

impl Collider {
    pub(crate) fn from_desc(desc: ColliderDesc, position: Vec3) -> Result<Self> {
        desc.shape.validate()?;
        Ok(Self {
            owner: desc.owner,
            shape: desc.shape,
            offset: desc.offset,
            layer: desc.layer,
            is_static: desc.is_static,
            is_trigger: desc.is_trigger,
            position,
            cells: BTreeSet::new(),
        })
    }

    /// Owner position as last synced
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World-space center of the shape
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.position + self.offset
    }

    /// World-space bounding box
    #[inline]
    pub fn aabb(&self) -> AABB {
        self.shape.aabb(self.center())
    }

    /// Grid cells currently occupied
    pub fn cells(&self) -> &BTreeSet<CellKey> {
        &self.cells
    }
}

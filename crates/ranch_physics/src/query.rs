//! Query results: pull-based contacts and raycast hits

use crate::collider::ColliderHandle;
use crate::layers::CollisionLayer;
use crate::narrow::Manifold;
use ranch_core::Id;
use ranch_math::Vec3;

/// A current overlap reported by `CollisionWorld::get_collisions`
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// The other collider
    pub collider: ColliderHandle,
    /// The other collider's owner
    pub owner: Id,
    /// The other collider's layer
    pub layer: CollisionLayer,
    /// Normal points toward the queried collider
    pub manifold: Manifold,
}

/// A raycast hit
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    pub collider: ColliderHandle,
    pub owner: Id,
    pub layer: CollisionLayer,
    /// Distance along the (normalized) ray
    pub distance: f32,
    pub point: Vec3,
    /// Surface normal at the hit point
    pub normal: Vec3,
}

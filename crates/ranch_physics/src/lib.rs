//! Ranch Physics - Grid Broad Phase and Shape Collision
//!
//! Collision detection for the simulation core. Not a rigid-body solver:
//! overlaps are found and pushed apart, nothing more.
//!
//! # Features
//!
//! - Uniform X/Z grid broad phase (`SpatialGrid`)
//! - Box, sphere and capsule colliders (capsules test as spheres)
//! - Symmetric layer compatibility table
//! - Positional collision response, trigger volumes, per-owner callbacks
//! - Raycasts sorted by distance
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               CollisionWorld                  │
//! │  ┌──────────────┐ ┌─────────────┐ ┌────────┐ │
//! │  │ Arena<Collider>│ │ SpatialGrid │ │ Matrix │ │
//! │  └──────────────┘ └─────────────┘ └────────┘ │
//! │        update(): reindex → pairs → respond    │
//! └──────────────────────────────────────────────┘
//!            │                    │
//!            ▼                    ▼
//!     EventCollector      PositionCorrection
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ranch_physics::prelude::*;
//!
//! let mut world = CollisionWorld::new(PhysicsConfig::default());
//!
//! let wall = world.add_collider(
//!     ColliderDesc::cuboid(owner_a, 10.0, 4.0, 1.0)
//!         .with_layer(CollisionLayer::ENVIRONMENT)
//!         .with_static(true),
//!     Vec3::new(0.0, 2.0, 0.0),
//! )?;
//! let boar = world.add_collider(
//!     ColliderDesc::sphere(owner_b, 1.0).with_layer(CollisionLayer::ENEMY),
//!     Vec3::new(0.0, 1.0, 1.2),
//! )?;
//!
//! world.update();
//! for correction in world.drain_corrections() {
//!     // push the owning entity out of the wall
//! }
//! ```

pub mod collider;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod layers;
pub mod narrow;
pub mod query;
pub mod world;

pub mod prelude {
    //! Common imports for collision functionality
    pub use crate::collider::{Collider, ColliderDesc, ColliderHandle, ColliderShape};
    pub use crate::config::PhysicsConfig;
    pub use crate::error::{PhysicsError, Result};
    pub use crate::events::{CollisionCallback, CollisionEvent, EventCollector, PositionCorrection};
    pub use crate::grid::{CellKey, SpatialGrid};
    pub use crate::layers::{CollisionLayer, CollisionMatrix};
    pub use crate::narrow::Manifold;
    pub use crate::query::{Contact, RaycastHit};
    pub use crate::world::CollisionWorld;
}

pub use prelude::*;

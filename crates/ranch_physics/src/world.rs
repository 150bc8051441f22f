//! Collision world: storage, per-frame update, queries

use crate::collider::{Collider, ColliderDesc, ColliderHandle, ColliderShape};
use crate::config::{PhysicsConfig, DEFAULT_CELL_SIZE};
use crate::error::{PhysicsError, Result};
use crate::events::{CollisionCallback, CollisionEvent, EventCollector, PositionCorrection};
use crate::grid::SpatialGrid;
use crate::layers::{CollisionLayer, CollisionMatrix};
use crate::narrow::{self, Manifold};
use crate::query::{Contact, RaycastHit};
use ranch_core::{Arena, Id};
use ranch_math::{ray_aabb_with_normal, ray_sphere_with_normal, Ray, Vec3};
use std::collections::{HashMap, HashSet};

/// Owns every collider, the broad-phase grid and the layer table
pub struct CollisionWorld {
    config: PhysicsConfig,
    colliders: Arena<Collider>,
    grid: SpatialGrid,
    matrix: CollisionMatrix,
    callbacks: HashMap<Id, CollisionCallback>,
    events: EventCollector,
    corrections: Vec<PositionCorrection>,
}

impl CollisionWorld {
    /// Create a collision world
    ///
    /// An invalid configuration is logged and replaced by the default cell size.
    pub fn new(mut config: PhysicsConfig) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("{}; using cell size {}", e, DEFAULT_CELL_SIZE);
            config.cell_size = DEFAULT_CELL_SIZE;
        }
        Self {
            grid: SpatialGrid::new(config.cell_size),
            config,
            colliders: Arena::new(),
            matrix: CollisionMatrix::default(),
            callbacks: HashMap::new(),
            events: EventCollector::new(),
            corrections: Vec::new(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn matrix(&self) -> &CollisionMatrix {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut CollisionMatrix {
        &mut self.matrix
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Check if two layers are tested against each other
    pub fn should_collide(&self, a: CollisionLayer, b: CollisionLayer) -> bool {
        self.matrix.should_collide(a, b)
    }

    /// Register a collider at its owner's position and index it
    pub fn add_collider(&mut self, desc: ColliderDesc, position: Vec3) -> Result<ColliderHandle> {
        let collider = Collider::from_desc(desc, position)?;
        let handle = ColliderHandle(self.colliders.insert(collider));
        self.reindex(handle);
        log::trace!("Added collider {:?}", handle);
        Ok(handle)
    }

    /// Unregister a collider and drop its grid memberships
    pub fn remove_collider(&mut self, handle: ColliderHandle) -> Option<Collider> {
        let mut collider = self.colliders.remove(handle.0)?;
        self.grid.remove(handle, &mut collider.cells);
        Some(collider)
    }

    pub fn get(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle.0)
    }

    pub fn contains(&self, handle: ColliderHandle) -> bool {
        self.colliders.contains(handle.0)
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Sync a collider with its owner's position and re-bucket it
    pub fn set_position(&mut self, handle: ColliderHandle, position: Vec3) -> Result<()> {
        let collider = self
            .colliders
            .get_mut(handle.0)
            .ok_or(PhysicsError::ColliderNotFound(handle))?;
        collider.position = position;
        self.reindex(handle);
        Ok(())
    }

    /// Register a callback invoked whenever `owner`'s collider overlaps another
    pub fn set_callback(&mut self, owner: Id, callback: CollisionCallback) {
        self.callbacks.insert(owner, callback);
    }

    pub fn clear_callback(&mut self, owner: Id) {
        self.callbacks.remove(&owner);
    }

    /// Run one collision pass
    ///
    /// Dynamic colliders are re-bucketed, then each is tested against its
    /// broad-phase candidates. Each unordered pair is handled at most once.
    /// Returns the number of overlapping pairs found.
    pub fn update(&mut self) -> usize {
        let dynamic: Vec<ColliderHandle> = self
            .colliders
            .iter()
            .filter(|(_, c)| !c.is_static)
            .map(|(id, _)| ColliderHandle(id))
            .collect();

        for handle in &dynamic {
            self.reindex(*handle);
        }

        let mut tested = HashSet::new();
        let mut found = 0;
        for handle in dynamic {
            let Some(collider) = self.colliders.get(handle.0) else {
                continue;
            };
            let candidates = self.grid.query_nearby(handle, &collider.cells);
            for other in candidates {
                let key = if handle < other { (handle, other) } else { (other, handle) };
                if !tested.insert(key) {
                    continue;
                }
                if let Some(manifold) = self.test_collision(handle, other) {
                    self.handle_collision(handle, other, manifold);
                    found += 1;
                }
            }
        }
        found
    }

    /// Layer-filtered narrow-phase test between two registered colliders
    ///
    /// The manifold normal points from `b` toward `a`.
    pub fn test_collision(&self, a: ColliderHandle, b: ColliderHandle) -> Option<Manifold> {
        let ca = self.colliders.get(a.0)?;
        let cb = self.colliders.get(b.0)?;
        if !self.matrix.should_collide(ca.layer, cb.layer) {
            return None;
        }
        narrow::test_shapes(&ca.shape, ca.center(), &cb.shape, cb.center())
    }

    /// Current overlaps of one collider, from its grid neighbours
    pub fn get_collisions(&self, handle: ColliderHandle) -> Vec<Contact> {
        let Some(collider) = self.colliders.get(handle.0) else {
            return Vec::new();
        };
        self.grid
            .query_nearby(handle, &collider.cells)
            .into_iter()
            .filter_map(|other| {
                let manifold = self.test_collision(handle, other)?;
                let oc = self.colliders.get(other.0)?;
                Some(Contact {
                    collider: other,
                    owner: oc.owner,
                    layer: oc.layer,
                    manifold,
                })
            })
            .collect()
    }

    /// Overlaps `handle` would have if its owner stood at `position`
    ///
    /// The collider itself is not moved. Used by fast movers that need
    /// contacts for this frame's position before the collision pass.
    pub fn contacts_at(&self, handle: ColliderHandle, position: Vec3) -> Vec<Contact> {
        let Some(collider) = self.colliders.get(handle.0) else {
            return Vec::new();
        };
        let center = position + collider.offset;
        let aabb = collider.shape.aabb(center);
        self.grid
            .query_aabb(&aabb)
            .into_iter()
            .filter(|other| *other != handle)
            .filter_map(|other| {
                let oc = self.colliders.get(other.0)?;
                if !self.matrix.should_collide(collider.layer, oc.layer) {
                    return None;
                }
                let manifold = narrow::test_shapes(&collider.shape, center, &oc.shape, oc.center())?;
                Some(Contact {
                    collider: other,
                    owner: oc.owner,
                    layer: oc.layer,
                    manifold,
                })
            })
            .collect()
    }

    /// Cast a ray against every collider whose layer intersects `layer_mask`
    ///
    /// Boxes use the slab test; spheres and capsules use a ray-sphere test.
    /// Hits are sorted by ascending distance.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layer_mask: CollisionLayer,
    ) -> Vec<RaycastHit> {
        let ray = Ray::new(origin, direction);
        if ray.direction == Vec3::ZERO {
            return Vec::new();
        }

        let mut hits: Vec<RaycastHit> = self
            .colliders
            .iter()
            .filter(|(_, c)| c.layer.intersects(layer_mask))
            .filter_map(|(id, c)| {
                let (distance, normal) = match c.shape {
                    ColliderShape::Box { .. } => ray_aabb_with_normal(&ray, &c.aabb())?,
                    ColliderShape::Sphere { radius } | ColliderShape::Capsule { radius, .. } => {
                        ray_sphere_with_normal(&ray, c.center(), radius)?
                    }
                };
                (distance <= max_distance).then(|| RaycastHit {
                    collider: ColliderHandle(id),
                    owner: c.owner,
                    layer: c.layer,
                    distance,
                    point: ray.at(distance),
                    normal,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Events found by the last `update` calls, oldest first
    pub fn drain_events(&mut self) -> Vec<CollisionEvent> {
        self.events.drain()
    }

    /// Corrections applied by the response pass, to be copied to owners
    pub fn drain_corrections(&mut self) -> Vec<PositionCorrection> {
        std::mem::take(&mut self.corrections)
    }

    /// Drop every collider, callback and buffered event
    pub fn cleanup(&mut self) {
        self.colliders.clear();
        self.grid.clear();
        self.callbacks.clear();
        self.events.clear();
        self.corrections.clear();
        log::debug!("Collision world cleared");
    }

    fn reindex(&mut self, handle: ColliderHandle) {
        if let Some(collider) = self.colliders.get_mut(handle.0) {
            let aabb = collider.aabb();
            self.grid.insert_or_update(handle, &aabb, &mut collider.cells);
        }
    }

    fn handle_collision(&mut self, a: ColliderHandle, b: ColliderHandle, manifold: Manifold) {
        let (Some(ca), Some(cb)) = (self.colliders.get(a.0), self.colliders.get(b.0)) else {
            return;
        };
        let (owner_a, owner_b) = (ca.owner, cb.owner);
        let (static_a, static_b) = (ca.is_static, cb.is_static);
        let is_trigger = ca.is_trigger || cb.is_trigger;

        if let Some(callback) = self.callbacks.get_mut(&owner_a) {
            callback(owner_b, &manifold);
        }
        if let Some(callback) = self.callbacks.get_mut(&owner_b) {
            callback(owner_a, &manifold.flipped());
        }

        self.events.push(CollisionEvent {
            collider_a: a,
            collider_b: b,
            owner_a,
            owner_b,
            layer_a: ca.layer,
            layer_b: cb.layer,
            manifold,
            is_trigger,
        });

        if is_trigger || !self.config.response_enabled {
            return;
        }

        let push = manifold.normal * manifold.penetration;
        match (static_a, static_b) {
            (false, false) => {
                self.shift(a, push * 0.5);
                self.shift(b, push * -0.5);
            }
            (false, true) => self.shift(a, push),
            (true, false) => self.shift(b, -push),
            (true, true) => {}
        }
    }

    fn shift(&mut self, handle: ColliderHandle, offset: Vec3) {
        if let Some(collider) = self.colliders.get_mut(handle.0) {
            collider.position += offset;
            self.corrections.push(PositionCorrection {
                collider: handle,
                owner: collider.owner,
                offset,
            });
        }
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn owner(i: u32) -> Id {
        Id::new(i, 0)
    }

    #[test]
    fn test_add_remove_collider() {
        let mut world = CollisionWorld::default();
        let h = world
            .add_collider(ColliderDesc::sphere(owner(1), 1.0), Vec3::ZERO)
            .unwrap();
        assert_eq!(world.collider_count(), 1);
        assert!(!world.get(h).unwrap().cells().is_empty());

        assert!(world.remove_collider(h).is_some());
        assert!(world.remove_collider(h).is_none());
        assert_eq!(world.grid().cell_count(), 0);
    }

    #[test]
    fn test_dynamic_pair_splits_correction() {
        let mut world = CollisionWorld::default();
        let a = world
            .add_collider(ColliderDesc::sphere(owner(1), 1.0).with_layer(CollisionLayer::PLAYER), Vec3::new(1.5, 0.0, 0.0))
            .unwrap();
        let b = world
            .add_collider(ColliderDesc::sphere(owner(2), 1.0).with_layer(CollisionLayer::ENEMY), Vec3::ZERO)
            .unwrap();

        assert_eq!(world.update(), 1);
        assert_relative_eq!(world.get(a).unwrap().position().x, 1.75);
        assert_relative_eq!(world.get(b).unwrap().position().x, -0.25);

        let corrections = world.drain_corrections();
        assert_eq!(corrections.len(), 2);
        assert_eq!(world.drain_events().len(), 1);
    }

    #[test]
    fn test_static_absorbs_nothing() {
        let mut world = CollisionWorld::default();
        let wall = world
            .add_collider(
                ColliderDesc::cuboid(owner(1), 2.0, 2.0, 2.0)
                    .with_layer(CollisionLayer::ENVIRONMENT)
                    .with_static(true),
                Vec3::ZERO,
            )
            .unwrap();
        let boar = world
            .add_collider(ColliderDesc::sphere(owner(2), 1.0).with_layer(CollisionLayer::ENEMY), Vec3::new(1.5, 0.0, 0.0))
            .unwrap();

        world.update();
        assert_eq!(world.get(wall).unwrap().position(), Vec3::ZERO);
        assert_relative_eq!(world.get(boar).unwrap().position().x, 2.0);

        let corrections = world.drain_corrections();
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].owner, owner(2));
    }

    #[test]
    fn test_static_static_never_tested() {
        let mut world = CollisionWorld::default();
        for i in 0..2 {
            world
                .add_collider(
                    ColliderDesc::cuboid(owner(i), 2.0, 2.0, 2.0).with_static(true),
                    Vec3::ZERO,
                )
                .unwrap();
        }
        assert_eq!(world.update(), 0);
    }

    #[test]
    fn test_trigger_moves_nothing_but_calls_back() {
        let mut world = CollisionWorld::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        world.set_callback(owner(1), Box::new(move |other, m| sink.borrow_mut().push((other, m.normal))));

        let bullet = world
            .add_collider(
                ColliderDesc::sphere(owner(1), 0.1)
                    .with_layer(CollisionLayer::PROJECTILE)
                    .with_trigger(true),
                Vec3::new(0.5, 0.0, 0.0),
            )
            .unwrap();
        world
            .add_collider(ColliderDesc::sphere(owner(2), 1.0).with_layer(CollisionLayer::ENEMY), Vec3::ZERO)
            .unwrap();

        world.update();
        assert_eq!(world.get(bullet).unwrap().position(), Vec3::new(0.5, 0.0, 0.0));
        assert!(world.drain_corrections().is_empty());
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].0, owner(2));

        let events = world.drain_events();
        assert!(events[0].is_trigger);
    }

    #[test]
    fn test_layer_filter_precedes_shape_test() {
        let mut world = CollisionWorld::default();
        let bullet = world
            .add_collider(ColliderDesc::sphere(owner(1), 1.0).with_layer(CollisionLayer::PROJECTILE), Vec3::ZERO)
            .unwrap();
        let pickup = world
            .add_collider(ColliderDesc::sphere(owner(2), 1.0).with_layer(CollisionLayer::PICKUP), Vec3::ZERO)
            .unwrap();

        assert!(world.test_collision(bullet, pickup).is_none());
        assert_eq!(world.update(), 0);
        assert!(world.get_collisions(bullet).is_empty());
    }

    #[test]
    fn test_get_collisions_after_move() {
        let mut world = CollisionWorld::default();
        let bullet = world
            .add_collider(
                ColliderDesc::sphere(owner(1), 0.1)
                    .with_layer(CollisionLayer::PROJECTILE)
                    .with_trigger(true),
                Vec3::new(30.0, 1.0, 0.0),
            )
            .unwrap();
        world
            .add_collider(ColliderDesc::sphere(owner(2), 1.0).with_layer(CollisionLayer::ENEMY), Vec3::new(0.0, 1.0, 0.0))
            .unwrap();

        assert!(world.get_collisions(bullet).is_empty());
        world.set_position(bullet, Vec3::new(0.5, 1.0, 0.0)).unwrap();

        let contacts = world.get_collisions(bullet);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].owner, owner(2));
        assert_eq!(contacts[0].layer, CollisionLayer::ENEMY);
    }

    #[test]
    fn test_raycast_sorted_and_masked() {
        let mut world = CollisionWorld::default();
        world
            .add_collider(
                ColliderDesc::cuboid(owner(1), 2.0, 2.0, 2.0).with_layer(CollisionLayer::ENVIRONMENT).with_static(true),
                Vec3::new(0.0, 0.0, 20.0),
            )
            .unwrap();
        world
            .add_collider(ColliderDesc::sphere(owner(2), 1.0).with_layer(CollisionLayer::ENEMY), Vec3::new(0.0, 0.0, 10.0))
            .unwrap();
        world
            .add_collider(ColliderDesc::capsule(owner(3), 0.5, 1.0).with_layer(CollisionLayer::PLAYER), Vec3::new(0.0, 0.0, 5.0))
            .unwrap();

        let all = world.raycast(Vec3::ZERO, Vec3::Z, 100.0, CollisionLayer::ALL);
        let owners: Vec<Id> = all.iter().map(|h| h.owner).collect();
        assert_eq!(owners, vec![owner(3), owner(2), owner(1)]);
        assert_relative_eq!(all[2].distance, 19.0, epsilon = 1e-5);
        assert_eq!(all[2].normal, Vec3::NEG_Z);

        let env = world.raycast(Vec3::ZERO, Vec3::Z, 100.0, CollisionLayer::ENVIRONMENT);
        assert_eq!(env.len(), 1);

        let short = world.raycast(Vec3::ZERO, Vec3::Z, 8.0, CollisionLayer::ALL);
        assert_eq!(short.len(), 1);
    }

    #[test]
    fn test_contacts_at_projected_position() {
        let mut world = CollisionWorld::default();
        let bullet = world
            .add_collider(
                ColliderDesc::sphere(owner(1), 0.1).with_layer(CollisionLayer::PROJECTILE).with_trigger(true),
                Vec3::ZERO,
            )
            .unwrap();
        world
            .add_collider(ColliderDesc::sphere(owner(2), 1.0).with_layer(CollisionLayer::ENEMY), Vec3::new(0.0, 0.0, 25.0))
            .unwrap();

        assert!(world.contacts_at(bullet, Vec3::ZERO).is_empty());
        let hits = world.contacts_at(bullet, Vec3::new(0.0, 0.0, 24.5));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].owner, owner(2));
        // The collider itself stayed put
        assert_eq!(world.get(bullet).unwrap().position(), Vec3::ZERO);
    }

    #[test]
    fn test_cleanup_empties_world() {
        let mut world = CollisionWorld::default();
        world.add_collider(ColliderDesc::sphere(owner(1), 1.0), Vec3::ZERO).unwrap();
        world.cleanup();
        assert_eq!(world.collider_count(), 0);
        assert_eq!(world.grid().cell_count(), 0);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let world = CollisionWorld::new(PhysicsConfig::default().with_cell_size(-1.0));
        assert_eq!(world.grid().cell_size(), DEFAULT_CELL_SIZE);
    }
}

//! Collision events, callbacks and position corrections

use crate::collider::ColliderHandle;
use crate::layers::CollisionLayer;
use crate::narrow::Manifold;
use ranch_core::Id;
use ranch_math::Vec3;

/// Per-owner collision callback: `(other_owner, manifold)`
///
/// The manifold normal points toward the owner receiving the call.
pub type CollisionCallback = Box<dyn FnMut(Id, &Manifold)>;

/// An overlapping pair found during `CollisionWorld::update`
#[derive(Debug, Clone)]
pub struct CollisionEvent {
    pub collider_a: ColliderHandle,
    pub collider_b: ColliderHandle,
    pub owner_a: Id,
    pub owner_b: Id,
    pub layer_a: CollisionLayer,
    pub layer_b: CollisionLayer,
    /// Normal points from B toward A
    pub manifold: Manifold,
    /// Either side was a trigger, so nothing was moved
    pub is_trigger: bool,
}

impl CollisionEvent {
    /// Check if either side is on `layer`
    pub fn involves(&self, layer: CollisionLayer) -> bool {
        self.layer_a.intersects(layer) || self.layer_b.intersects(layer)
    }

    /// Order the owners as `(first on layer x, second on layer y)`
    pub fn owners_by_layer(&self, x: CollisionLayer, y: CollisionLayer) -> Option<(Id, Id)> {
        if self.layer_a.intersects(x) && self.layer_b.intersects(y) {
            Some((self.owner_a, self.owner_b))
        } else if self.layer_b.intersects(x) && self.layer_a.intersects(y) {
            Some((self.owner_b, self.owner_a))
        } else {
            None
        }
    }
}

/// Positional correction applied to a collider's owner by the response pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionCorrection {
    pub collider: ColliderHandle,
    pub owner: Id,
    pub offset: Vec3,
}

/// Buffers the events of one update
#[derive(Default)]
pub struct EventCollector {
    /// Collision events this frame
    pub collision_events: Vec<CollisionEvent>,
}

impl EventCollector {
    /// Create a new event collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CollisionEvent) {
        self.collision_events.push(event);
    }

    /// Take all buffered events
    pub fn drain(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.collision_events)
    }

    pub fn clear(&mut self) {
        self.collision_events.clear();
    }

    pub fn len(&self) -> usize {
        self.collision_events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collision_events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(la: CollisionLayer, lb: CollisionLayer) -> CollisionEvent {
        CollisionEvent {
            collider_a: ColliderHandle(Id::new(0, 0)),
            collider_b: ColliderHandle(Id::new(1, 0)),
            owner_a: Id::new(10, 0),
            owner_b: Id::new(11, 0),
            layer_a: la,
            layer_b: lb,
            manifold: Manifold {
                normal: Vec3::X,
                penetration: 0.1,
                point: Vec3::ZERO,
            },
            is_trigger: false,
        }
    }

    #[test]
    fn test_owners_by_layer_either_order() {
        let e = event(CollisionLayer::PLAYER, CollisionLayer::ENEMY);
        assert_eq!(
            e.owners_by_layer(CollisionLayer::ENEMY, CollisionLayer::PLAYER),
            Some((Id::new(11, 0), Id::new(10, 0)))
        );
        assert!(e.owners_by_layer(CollisionLayer::PROJECTILE, CollisionLayer::ENEMY).is_none());
        assert!(e.involves(CollisionLayer::PLAYER));
    }

    #[test]
    fn test_collector_drain() {
        let mut collector = EventCollector::new();
        collector.push(event(CollisionLayer::PLAYER, CollisionLayer::ENEMY));
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.drain().len(), 1);
        assert!(collector.is_empty());
    }
}

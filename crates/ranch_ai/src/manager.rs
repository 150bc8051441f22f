//! Enemy spawning and bookkeeping
//!
//! The manager decides when and where boars appear; the owner creates
//! the entity for each [`SpawnRequest`] and reports the id back through
//! [`EnemyManager::register`].

use crate::enemy::EnemyVariant;
use rand::Rng;
use ranch_core::Id;
use ranch_math::Vec3;
use serde::{Deserialize, Serialize};

/// Default active-enemy cap
pub const DEFAULT_MAX_ENEMIES: usize = 10;
/// Default time between auto-spawns
pub const DEFAULT_SPAWN_COOLDOWN_MS: f32 = 5000.0;

/// Where a boar may appear
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub variant: EnemyVariant,
}

impl SpawnPoint {
    pub fn new(position: Vec3, variant: EnemyVariant) -> Self {
        Self { position, variant }
    }
}

/// A boar the owner should create
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub position: Vec3,
    pub variant: EnemyVariant,
}

/// Default spawn layout
pub fn default_spawn_points() -> Vec<SpawnPoint> {
    vec![
        SpawnPoint::new(Vec3::new(10.0, 0.0, 10.0), EnemyVariant::V1),
        SpawnPoint::new(Vec3::new(-10.0, 0.0, 15.0), EnemyVariant::V2),
        SpawnPoint::new(Vec3::new(20.0, 0.0, -5.0), EnemyVariant::V1),
        SpawnPoint::new(Vec3::new(-15.0, 0.0, -10.0), EnemyVariant::V2),
    ]
}

#[derive(Debug, Clone)]
pub struct EnemyManager {
    spawn_points: Vec<SpawnPoint>,
    max_enemies: usize,
    spawn_cooldown_ms: f32,
    since_spawn_ms: f32,
    active: Vec<Id>,
    /// Requests handed out but not yet registered
    pending: usize,
    warned_no_points: bool,
}

impl EnemyManager {
    pub fn new() -> Self {
        Self {
            spawn_points: default_spawn_points(),
            max_enemies: DEFAULT_MAX_ENEMIES,
            spawn_cooldown_ms: DEFAULT_SPAWN_COOLDOWN_MS,
            since_spawn_ms: 0.0,
            active: Vec::new(),
            pending: 0,
            warned_no_points: false,
        }
    }

    pub fn with_max_enemies(mut self, max: usize) -> Self {
        self.max_enemies = max;
        self
    }

    pub fn with_spawn_cooldown(mut self, cooldown_ms: f32) -> Self {
        self.spawn_cooldown_ms = cooldown_ms.max(0.0);
        self
    }

    pub fn with_spawn_points(mut self, points: Vec<SpawnPoint>) -> Self {
        self.spawn_points = points;
        self.warned_no_points = false;
        self
    }

    pub fn max_enemies(&self) -> usize {
        self.max_enemies
    }

    pub fn spawn_points(&self) -> &[SpawnPoint] {
        &self.spawn_points
    }

    pub fn add_spawn_point(&mut self, point: SpawnPoint) {
        self.spawn_points.push(point);
        self.warned_no_points = false;
    }

    pub fn set_spawn_points(&mut self, points: Vec<SpawnPoint>) {
        self.spawn_points = points;
        self.warned_no_points = false;
    }

    /// Room for another enemy, counting unregistered requests
    pub fn has_capacity(&self) -> bool {
        self.active.len() + self.pending < self.max_enemies
    }

    /// Tick the cooldown; returns an auto-spawn when it elapses and the cap allows
    pub fn update(&mut self, delta_ms: f32, rng: &mut impl Rng) -> Option<SpawnRequest> {
        self.since_spawn_ms += delta_ms;
        if self.since_spawn_ms < self.spawn_cooldown_ms || !self.has_capacity() {
            return None;
        }

        let point = self.pick_point(rng)?;
        self.since_spawn_ms = 0.0;
        Some(self.reserve(point.position, point.variant))
    }

    /// Manual spawn; ignores the cooldown but not the cap
    pub fn spawn_enemy(&mut self, position: Vec3, variant: EnemyVariant) -> Option<SpawnRequest> {
        if !self.has_capacity() {
            log::debug!("Enemy cap {} reached, spawn skipped", self.max_enemies);
            return None;
        }
        Some(self.reserve(position, variant))
    }

    /// Manual spawn at a random spawn point
    pub fn spawn_random(&mut self, rng: &mut impl Rng) -> Option<SpawnRequest> {
        if !self.has_capacity() {
            return None;
        }
        let point = self.pick_point(rng)?;
        Some(self.reserve(point.position, point.variant))
    }

    /// Record the entity created for a request
    pub fn register(&mut self, id: Id) {
        self.pending = self.pending.saturating_sub(1);
        if !self.active.contains(&id) {
            self.active.push(id);
        }
    }

    /// Drop a request whose entity could not be created
    pub fn cancel_pending(&mut self) {
        self.pending = self.pending.saturating_sub(1);
    }

    pub fn remove_enemy(&mut self, id: Id) -> bool {
        let before = self.active.len();
        self.active.retain(|e| *e != id);
        self.active.len() != before
    }

    pub fn enemy_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_enemies(&self) -> &[Id] {
        &self.active
    }

    pub fn contains(&self, id: Id) -> bool {
        self.active.contains(&id)
    }

    /// Forget every enemy and restart the cooldown
    pub fn clear(&mut self) {
        self.active.clear();
        self.pending = 0;
        self.since_spawn_ms = 0.0;
    }

    fn reserve(&mut self, position: Vec3, variant: EnemyVariant) -> SpawnRequest {
        self.pending += 1;
        log::info!("Spawning {} at {:?}", variant.model_name(), position.to_array());
        SpawnRequest { position, variant }
    }

    fn pick_point(&mut self, rng: &mut impl Rng) -> Option<SpawnPoint> {
        if self.spawn_points.is_empty() {
            if !self.warned_no_points {
                log::warn!("No enemy spawn points registered, skipping spawns");
                self.warned_no_points = true;
            }
            return None;
        }
        let index = rng.gen_range(0..self.spawn_points.len());
        Some(self.spawn_points[index])
    }
}

impl Default for EnemyManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_first_auto_spawn_after_cooldown() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut manager = EnemyManager::new();

        assert!(manager.update(4000.0, &mut rng).is_none());
        let request = manager.update(1000.0, &mut rng).unwrap();
        assert!(default_spawn_points()
            .iter()
            .any(|p| p.position == request.position && p.variant == request.variant));

        manager.register(Id::new(1, 0));
        assert_eq!(manager.enemy_count(), 1);
        assert!(manager.update(16.0, &mut rng).is_none());
    }

    #[test]
    fn test_cap_counts_pending() {
        let mut manager = EnemyManager::new().with_max_enemies(2);
        assert!(manager.spawn_enemy(Vec3::ZERO, EnemyVariant::V1).is_some());
        assert!(manager.spawn_enemy(Vec3::ZERO, EnemyVariant::V1).is_some());
        assert!(manager.spawn_enemy(Vec3::ZERO, EnemyVariant::V1).is_none());

        manager.register(Id::new(1, 0));
        manager.cancel_pending();
        assert!(manager.has_capacity());
    }

    #[test]
    fn test_manual_spawn_bypasses_cooldown() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut manager = EnemyManager::new();
        assert!(manager.spawn_random(&mut rng).is_some());
        assert!(manager.spawn_random(&mut rng).is_some());
    }

    #[test]
    fn test_remove_enemy() {
        let mut manager = EnemyManager::new();
        manager.register(Id::new(1, 0));
        manager.register(Id::new(2, 0));
        assert!(manager.remove_enemy(Id::new(1, 0)));
        assert!(!manager.remove_enemy(Id::new(1, 0)));
        assert_eq!(manager.active_enemies(), &[Id::new(2, 0)]);
    }

    #[test]
    fn test_no_spawn_points() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut manager = EnemyManager::new().with_spawn_points(Vec::new());
        assert!(manager.update(10_000.0, &mut rng).is_none());
        assert!(manager.update(10_000.0, &mut rng).is_none());
        assert!(manager.spawn_random(&mut rng).is_none());
        assert_eq!(manager.enemy_count(), 0);
        // An explicit position still works
        assert!(manager.spawn_enemy(Vec3::ZERO, EnemyVariant::V2).is_some());
    }
}

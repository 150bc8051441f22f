//! Projectile behaviors
//!
//! A projectile ages every tick, then resolves against the contacts the
//! collision world reports for it. TNT additionally explodes on
//! environment impact or when its fuse runs out, whichever comes first,
//! and never more than once.

use crate::damage::falloff_damage;
use crate::weapon::SoundCue;
use ranch_core::Id;
use ranch_math::Vec3;
use ranch_physics::{CollisionLayer, Contact};
use serde::{Deserialize, Serialize};

/// Projectile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    Bullet,
    Pellet,
    Tnt,
}

impl ProjectileKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bullet => "bullet",
            Self::Pellet => "pellet",
            Self::Tnt => "tnt",
        }
    }
}

/// Collider radius of every projectile
pub const PROJECTILE_RADIUS: f32 = 0.1;

/// Explosion state for TNT
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosive {
    pub radius: f32,
    pub fuse_ms: f32,
    pub has_exploded: bool,
}

impl Explosive {
    pub fn new(radius: f32, fuse_ms: f32) -> Self {
        Self {
            radius,
            fuse_ms,
            has_exploded: false,
        }
    }
}

/// What a weapon asks the caller to spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub kind: ProjectileKind,
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub lifetime_ms: f32,
    pub explosive: Option<Explosive>,
}

impl ProjectileSpawn {
    /// Initial velocity (direction × speed)
    pub fn velocity(&self) -> Vec3 {
        self.direction * self.speed
    }
}

/// Read-only view of living enemies, used by explosions
pub trait EnemyRegistry {
    /// Living enemies within `radius` of `center`, with their distances
    fn enemies_within(&self, center: Vec3, radius: f32) -> Vec<(Id, f32)>;
}

/// Terminal result of a projectile tick; the projectile is finished
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectileEvent {
    /// Lifetime ran out without hitting anything
    Expired,
    /// Struck an enemy directly
    HitEnemy { target: Id, damage: f32 },
    /// Struck the environment
    Impact { point: Vec3 },
    /// Exploded; `hits` holds every enemy that took non-zero falloff damage
    Exploded { center: Vec3, hits: Vec<(Id, f32)> },
}

impl ProjectileEvent {
    /// Sound for this outcome
    pub fn cue(&self) -> Option<SoundCue> {
        match self {
            Self::Expired | Self::HitEnemy { .. } => None,
            Self::Impact { .. } => Some(SoundCue::BulletImpact),
            Self::Exploded { .. } => Some(SoundCue::Explosion),
        }
    }
}

/// A live projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub damage: f32,
    pub speed: f32,
    pub lifetime_ms: f32,
    age_ms: f32,
    explosive: Option<Explosive>,
    spent: bool,
}

impl Projectile {
    pub fn from_spawn(spawn: &ProjectileSpawn) -> Self {
        Self {
            kind: spawn.kind,
            damage: spawn.damage,
            speed: spawn.speed,
            lifetime_ms: spawn.lifetime_ms,
            age_ms: 0.0,
            explosive: spawn.explosive,
            spent: false,
        }
    }

    pub fn age_ms(&self) -> f32 {
        self.age_ms
    }

    /// Finished projectiles ignore further ticks
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    pub fn explosive(&self) -> Option<&Explosive> {
        self.explosive.as_ref()
    }

    /// Advance one tick at `position` with the current `contacts`
    ///
    /// Returns `Some` once, when the projectile finishes and should be destroyed.
    pub fn tick(
        &mut self,
        delta_ms: f32,
        position: Vec3,
        contacts: &[Contact],
        enemies: &dyn EnemyRegistry,
    ) -> Option<ProjectileEvent> {
        if self.spent {
            return None;
        }

        self.age_ms += delta_ms;
        if self.age_ms >= self.lifetime_ms {
            return Some(self.finish(ProjectileEvent::Expired));
        }

        if let Some(contact) = contacts.iter().find(|c| c.layer.intersects(CollisionLayer::ENEMY)) {
            let event = ProjectileEvent::HitEnemy {
                target: contact.owner,
                damage: self.damage,
            };
            return Some(self.finish(event));
        }

        if let Some(contact) = contacts
            .iter()
            .find(|c| c.layer.intersects(CollisionLayer::ENVIRONMENT))
        {
            let event = match self.explode(position, enemies) {
                Some(hits) => ProjectileEvent::Exploded { center: position, hits },
                None => ProjectileEvent::Impact {
                    point: contact.manifold.point,
                },
            };
            return Some(self.finish(event));
        }

        let fuse_done = self
            .explosive
            .map_or(false, |e| self.age_ms >= e.fuse_ms);
        if fuse_done {
            if let Some(hits) = self.explode(position, enemies) {
                return Some(self.finish(ProjectileEvent::Exploded { center: position, hits }));
            }
        }
        None
    }

    /// Resolve a direct enemy hit reported by the collision pass
    ///
    /// Explosives hitting an enemy directly deal their damage without exploding.
    pub fn strike(&mut self, target: Id) -> Option<ProjectileEvent> {
        if self.spent {
            return None;
        }
        let event = ProjectileEvent::HitEnemy {
            target,
            damage: self.damage,
        };
        Some(self.finish(event))
    }

    /// Mark finished without any effect
    pub fn retire(&mut self) {
        self.spent = true;
    }

    /// Detonate at `center`
    ///
    /// Returns the falloff damage per enemy the first time; `None` for
    /// non-explosive projectiles and on every later call.
    pub fn explode(&mut self, center: Vec3, enemies: &dyn EnemyRegistry) -> Option<Vec<(Id, f32)>> {
        let explosive = self.explosive.as_mut()?;
        if explosive.has_exploded {
            return None;
        }
        explosive.has_exploded = true;

        let radius = explosive.radius;
        let hits = enemies
            .enemies_within(center, radius)
            .into_iter()
            .filter_map(|(id, distance)| {
                let damage = falloff_damage(self.damage, distance, radius);
                (damage > 0.0).then_some((id, damage))
            })
            .collect();
        Some(hits)
    }

    fn finish(&mut self, event: ProjectileEvent) -> ProjectileEvent {
        self.spent = true;
        event
    }
}

//! What a component sees while it updates, and what it may ask for
//!
//! Components never mutate the scene structure directly. Spawns, damage to
//! other entities, destruction and sounds are queued as [`Command`]s and
//! applied by the game once the update pass is over.

use super::component::Components;
use super::entity::Body;
use crate::scheduler::FrameTime;
use rand::rngs::StdRng;
use ranch_ai::{Attack, SpawnRequest};
use ranch_combat::{DamageInfo, EnemyRegistry, ProjectileSpawn, WeaponKind};
use ranch_core::Id;
use ranch_math::Vec3;
use ranch_physics::{ColliderHandle, CollisionWorld};

/// Input sampled for this frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub fire: bool,
    pub reload: bool,
    pub switch_to: Option<WeaponKind>,
    /// Pause key went down this frame
    pub pause: bool,
    /// Desired player velocity, units per second
    pub movement: Vec3,
    pub aim: Option<Vec3>,
}

/// Positions of living enemies at the start of the logic stage
#[derive(Debug, Clone, Default)]
pub struct EnemySnapshot {
    entries: Vec<(Id, Vec3)>,
}

impl EnemySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: Id, position: Vec3) {
        self.entries.push((id, position));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn position(&self, id: Id) -> Option<Vec3> {
        self.entries.iter().find(|(e, _)| *e == id).map(|(_, p)| *p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EnemyRegistry for EnemySnapshot {
    fn enemies_within(&self, center: Vec3, radius: f32) -> Vec<(Id, f32)> {
        self.entries
            .iter()
            .map(|(id, p)| (*id, p.distance(center)))
            .filter(|(_, d)| *d <= radius)
            .collect()
    }
}

/// Read-only frame state shared by every component update
pub struct FrameView<'a> {
    pub physics: &'a CollisionWorld,
    pub time: FrameTime,
    pub input: &'a FrameInput,
    pub player: Option<Id>,
    pub player_position: Option<Vec3>,
    /// Unit aim direction of the player
    pub aim: Vec3,
    pub enemies: &'a EnemySnapshot,
}

/// Deferred structural change or side effect
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SpawnProjectile(ProjectileSpawn),
    /// `manager` is the entity holding the `EnemyManager` that reserved the slot
    SpawnEnemy { manager: Id, request: SpawnRequest },
    DamageEnemy { target: Id, info: DamageInfo },
    AttackPlayer { enemy: Id, attack: Attack },
    /// Death delay elapsed
    EnemyDespawned { enemy: Id },
    Destroy(Id),
    PlaySound {
        cue: &'static str,
        position: Option<Vec3>,
    },
}

/// Command queue for one stage
#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push(command);
    }

    pub fn play(&mut self, cue: &'static str, position: Option<Vec3>) {
        self.queue.push(Command::PlaySound { cue, position });
    }

    pub fn destroy(&mut self, id: Id) {
        self.queue.push(Command::Destroy(id));
    }

    /// Take every queued command, oldest first
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Everything one component update can touch
pub struct ComponentContext<'a> {
    pub owner: Id,
    pub body: &'a mut Body,
    pub collider: Option<ColliderHandle>,
    /// The owner's other components; the updating one is taken out
    pub siblings: &'a mut Components,
    pub frame: &'a FrameView<'a>,
    pub rng: &'a mut StdRng,
    pub commands: &'a mut Commands,
}

impl ComponentContext<'_> {
    pub fn delta_ms(&self) -> f32 {
        self.frame.time.delta_ms
    }

    pub fn position(&self) -> Vec3 {
        self.body.transform.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_radius_query() {
        let mut snapshot = EnemySnapshot::new();
        snapshot.push(Id::new(1, 0), Vec3::new(3.0, 0.0, 0.0));
        snapshot.push(Id::new(2, 0), Vec3::new(9.0, 0.0, 0.0));

        let near = snapshot.enemies_within(Vec3::ZERO, 8.0);
        assert_eq!(near, vec![(Id::new(1, 0), 3.0)]);
        assert_eq!(snapshot.position(Id::new(2, 0)), Some(Vec3::new(9.0, 0.0, 0.0)));
    }

    #[test]
    fn test_commands_drain_in_order() {
        let mut commands = Commands::new();
        commands.destroy(Id::new(4, 1));
        commands.play("reload", None);
        let drained = commands.drain();
        assert_eq!(drained[0], Command::Destroy(Id::new(4, 1)));
        assert!(matches!(drained[1], Command::PlaySound { cue: "reload", .. }));
        assert!(commands.is_empty());
    }
}

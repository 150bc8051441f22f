//! Combat manager
//!
//! Lives on the player entity next to the `WeaponSystem` and the
//! `EnemyManager`. Owns player health, match stats, the reward table, the
//! delayed event queue and the signal channel.

use crate::config::{CombatConfig, EnemyConfig};
use crate::error::Result;
use crate::scene::{Attachable, Command, ComponentContext, Scene, Updatable};
use crossbeam_channel::{unbounded, Receiver, Sender};
use rand::Rng;
use ranch_ai::{DamageTaken, EnemyAi, EnemyManager};
use ranch_combat::{
    CombatStats, DamageInfo, HitResult, PlayerHealth, Reward, RewardTable, WeaponKind, WeaponSystem,
};
use ranch_core::Id;
use ranch_physics::{CollisionEvent, CollisionLayer};
use serde::{Deserialize, Serialize};

/// Fire action name
pub const ACTION_FIRE: &str = "fire";
/// Reload key code
pub const KEY_RELOAD: &str = "KeyR";
/// Weapon switch key codes
pub const WEAPON_KEYS: [(&str, WeaponKind); 3] = [
    ("Digit1", WeaponKind::Rifle),
    ("Digit2", WeaponKind::Shotgun),
    ("Digit3", WeaponKind::Tnt),
];
/// Distance in front of the player where projectiles appear
pub const MUZZLE_OFFSET: f32 = 0.5;

/// Notable combat outcomes, broadcast to every subscriber
#[derive(Debug, Clone, PartialEq)]
pub enum CombatSignal {
    PlayerDamaged { amount: f32, remaining: f32 },
    /// Sent exactly once per match
    PlayerDied { stats: CombatStats },
    EnemyKilled { enemy: Id, total_kills: u32 },
    RewardGranted(Reward),
}

/// Combat-relevant classification of a collision pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatPair {
    ProjectileHitEnemy { projectile: Id, enemy: Id },
    EnemyTouchPlayer { enemy: Id, player: Id },
}

/// Work deferred by a delay
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DelayedEvent {
    SpawnEnemy,
    AwardAmmo { weapon: WeaponKind, amount: u32 },
    HealPlayer(f32),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    remaining_ms: f32,
    event: DelayedEvent,
}

/// HUD snapshot of player health
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerHealthInfo {
    pub current: f32,
    pub max: f32,
    pub percent: f32,
    pub immune: bool,
}

#[derive(Debug)]
pub struct CombatManager {
    health: PlayerHealth,
    stats: CombatStats,
    rewards: RewardTable,
    subscribers: Vec<Sender<CombatSignal>>,
    delayed: Vec<Scheduled>,
    death_reported: bool,
    owner: Option<Id>,
}

impl Default for CombatManager {
    fn default() -> Self {
        Self::new(&CombatConfig::default())
    }
}

impl CombatManager {
    pub fn new(config: &CombatConfig) -> Self {
        Self {
            health: PlayerHealth::new(config.player_max_health).with_immunity(config.immunity_ms),
            stats: CombatStats::default(),
            rewards: RewardTable::default(),
            subscribers: Vec::new(),
            delayed: Vec::new(),
            owner: None,
            death_reported: false,
        }
    }

    pub fn with_rewards(mut self, rewards: RewardTable) -> Self {
        self.rewards = rewards;
        self
    }

    /// Give `player` a weapon system, an enemy manager and a combat manager
    pub fn attach_to(scene: &mut Scene, player: Id, combat: &CombatConfig, enemy: &EnemyConfig) -> Result<()> {
        scene.add_component(player, WeaponSystem::new())?;
        scene.add_component(
            player,
            EnemyManager::new()
                .with_max_enemies(enemy.max_enemies)
                .with_spawn_cooldown(enemy.spawn_cooldown_ms),
        )?;
        scene.add_component(player, CombatManager::new(combat))?;
        Ok(())
    }

    /// Receive every signal sent from now on
    pub fn subscribe(&mut self) -> Receiver<CombatSignal> {
        let (sender, receiver) = unbounded();
        self.subscribers.push(sender);
        receiver
    }

    pub fn health(&self) -> &PlayerHealth {
        &self.health
    }

    pub fn player_health(&self) -> PlayerHealthInfo {
        PlayerHealthInfo {
            current: self.health.current,
            max: self.health.max,
            percent: self.health.percent(),
            immune: self.health.is_immune(),
        }
    }

    pub fn stats(&self) -> &CombatStats {
        &self.stats
    }

    /// Set once the player dies; cleared by [`CombatManager::reset`]
    pub fn is_player_dead(&self) -> bool {
        self.death_reported
    }

    /// Entity the manager is attached to
    pub fn owner(&self) -> Option<Id> {
        self.owner
    }

    pub fn pending_events(&self) -> usize {
        self.delayed.len()
    }

    /// Sort a collision into the pairs combat cares about
    pub fn classify(event: &CollisionEvent) -> Option<CombatPair> {
        if let Some((projectile, enemy)) = event.owners_by_layer(CollisionLayer::PROJECTILE, CollisionLayer::ENEMY) {
            return Some(CombatPair::ProjectileHitEnemy { projectile, enemy });
        }
        event
            .owners_by_layer(CollisionLayer::ENEMY, CollisionLayer::PLAYER)
            .map(|(enemy, player)| CombatPair::EnemyTouchPlayer { enemy, player })
    }

    pub fn record_shot(&mut self) {
        self.stats.record_shot();
    }

    /// Apply damage to an enemy and count it toward the stats
    pub fn apply_enemy_damage(&mut self, enemy: &mut EnemyAi, info: DamageInfo) -> DamageTaken {
        if self.death_reported {
            return DamageTaken {
                dealt: 0.0,
                remaining: enemy.health(),
                killed: false,
            };
        }
        let taken = enemy.take_damage(info.amount);
        self.stats.record_damage_dealt(taken.dealt);
        taken
    }

    /// Count a kill and roll its reward
    pub fn handle_enemy_killed(&mut self, enemy: Id, rng: &mut impl Rng) -> Option<Reward> {
        self.stats.record_kill();
        log::info!(
            "Enemy {} killed ({} total, accuracy {:.1}%)",
            enemy,
            self.stats.enemies_killed,
            self.stats.accuracy
        );
        self.publish(CombatSignal::EnemyKilled {
            enemy,
            total_kills: self.stats.enemies_killed,
        });

        let reward = self.rewards.roll(rng)?;
        log::info!("Reward: {} +{}", reward.weapon.name(), reward.amount);
        self.publish(CombatSignal::RewardGranted(reward));
        Some(reward)
    }

    /// Apply an enemy attack, honoring the immunity window
    pub fn handle_enemy_attack(&mut self, damage: f32) -> HitResult {
        if self.death_reported {
            return HitResult::Dead;
        }

        let result = self.health.apply_hit(damage);
        if let HitResult::Applied {
            amount,
            remaining,
            killed,
        } = result
        {
            self.stats.record_damage_taken(amount);
            log::debug!("Player hit for {:.1}, {:.1} left", amount, remaining);
            self.publish(CombatSignal::PlayerDamaged { amount, remaining });
            if killed {
                self.death_reported = true;
                log::info!("Player died after {} kills", self.stats.enemies_killed);
                self.publish(CombatSignal::PlayerDied {
                    stats: self.stats.clone(),
                });
            }
        }
        result
    }

    /// Returns the health actually restored
    pub fn heal_player(&mut self, amount: f32) -> f32 {
        if self.death_reported {
            return 0.0;
        }
        self.health.heal(amount)
    }

    /// Queue `event` to run after `delay_ms`
    pub fn schedule(&mut self, event: DelayedEvent, delay_ms: f32) {
        self.delayed.push(Scheduled {
            remaining_ms: delay_ms.max(0.0),
            event,
        });
    }

    /// Restore health, stats, immunity and the death latch
    pub fn reset(&mut self) {
        self.health.reset();
        self.stats.reset();
        self.delayed.clear();
        self.death_reported = false;
        log::info!("Combat reset");
    }

    /// Advance the delayed queue, returning due events in schedule order
    fn due_events(&mut self, delta_ms: f32) -> Vec<DelayedEvent> {
        let mut due = Vec::new();
        self.delayed.retain_mut(|s| {
            s.remaining_ms -= delta_ms;
            if s.remaining_ms <= 0.0 {
                due.push(s.event);
                false
            } else {
                true
            }
        });
        due
    }

    fn publish(&mut self, signal: CombatSignal) {
        self.subscribers.retain(|s| s.send(signal.clone()).is_ok());
    }
}

impl Attachable for CombatManager {
    fn on_attach(&mut self, owner: Id) {
        log::debug!("Combat manager attached to {}", owner);
        self.owner = Some(owner);
    }

    fn on_detach(&mut self, _owner: Id) {
        self.owner = None;
    }

    fn on_destroy(&mut self, _owner: Id) {
        self.delayed.clear();
    }
}

impl Updatable for CombatManager {
    fn update(&mut self, ctx: &mut ComponentContext<'_>) {
        if self.death_reported {
            return;
        }
        let delta_ms = ctx.frame.time.delta_ms;
        self.health.update(delta_ms);

        let input = ctx.frame.input;
        if let Some(weapons) = ctx.siblings.get_mut::<WeaponSystem>() {
            if let Some(kind) = input.switch_to {
                weapons.switch_weapon(kind);
            }
            if input.reload && weapons.reload() {
                ctx.commands.play("reload", None);
            }
            if input.fire {
                let aim = ctx.frame.aim;
                let origin = ctx.body.transform.position() + aim * MUZZLE_OFFSET;
                let outcome = weapons.fire(origin, aim, ctx.rng);
                if outcome.fired() {
                    self.stats.record_shot();
                    for spawn in outcome.projectiles() {
                        ctx.commands.push(Command::SpawnProjectile(*spawn));
                    }
                }
                if let Some(cue) = outcome.cue() {
                    ctx.commands.play(cue.name(), Some(origin));
                }
            }
        }

        for event in self.due_events(delta_ms) {
            match event {
                DelayedEvent::AwardAmmo { weapon, amount } => {
                    if let Some(weapons) = ctx.siblings.get_mut::<WeaponSystem>() {
                        weapons.add_ammo(weapon, amount);
                    }
                }
                DelayedEvent::HealPlayer(amount) => {
                    self.heal_player(amount);
                }
                DelayedEvent::SpawnEnemy => {
                    let request = ctx
                        .siblings
                        .get_mut::<EnemyManager>()
                        .and_then(|m| m.spawn_random(ctx.rng));
                    if let Some(request) = request {
                        ctx.commands.push(Command::SpawnEnemy {
                            manager: ctx.owner,
                            request,
                        });
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ranch_ai::EnemyVariant;
    use ranch_combat::RewardBand;

    fn manager() -> CombatManager {
        CombatManager::new(&CombatConfig::default())
    }

    #[test]
    fn test_immunity_drops_second_attack() {
        let mut combat = manager();
        assert!(combat.handle_enemy_attack(20.0).applied());

        combat.health.update(500.0);
        assert_eq!(combat.handle_enemy_attack(20.0), HitResult::Immune);
        assert_eq!(combat.player_health().current, 80.0);
        assert_eq!(combat.stats().damage_taken, 20.0);

        combat.health.update(500.0);
        assert!(combat.handle_enemy_attack(20.0).applied());
    }

    #[test]
    fn test_death_signal_sent_once() {
        let mut combat = CombatManager::new(&CombatConfig {
            immunity_ms: 0.0,
            ..CombatConfig::default()
        });
        let signals = combat.subscribe();

        assert!(combat.handle_enemy_attack(150.0).killed());
        assert_eq!(combat.handle_enemy_attack(10.0), HitResult::Dead);
        assert!(combat.is_player_dead());

        let deaths = signals
            .try_iter()
            .filter(|s| matches!(s, CombatSignal::PlayerDied { .. }))
            .count();
        assert_eq!(deaths, 1);

        combat.reset();
        assert!(!combat.is_player_dead());
        assert_eq!(combat.player_health().percent, 100.0);
    }

    #[test]
    fn test_kill_updates_accuracy_and_reward() {
        let mut combat = manager().with_rewards(RewardTable::new(vec![RewardBand {
            threshold: 1.0,
            reward: Reward {
                weapon: WeaponKind::Tnt,
                amount: 1,
            },
        }]));
        let signals = combat.subscribe();
        let mut rng = StdRng::seed_from_u64(1);

        combat.record_shot();
        combat.record_shot();
        let reward = combat.handle_enemy_killed(Id::new(3, 0), &mut rng);

        assert_eq!(
            reward,
            Some(Reward {
                weapon: WeaponKind::Tnt,
                amount: 1
            })
        );
        assert_eq!(combat.stats().accuracy, 50.0);
        let received: Vec<_> = signals.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert!(matches!(received[0], CombatSignal::EnemyKilled { total_kills: 1, .. }));
    }

    #[test]
    fn test_enemy_damage_counts_dealt_only() {
        let mut combat = manager();
        let mut boar = EnemyAi::new(EnemyVariant::V1);

        let taken = combat.apply_enemy_damage(&mut boar, DamageInfo::new(80.0));
        assert!(taken.killed);
        assert_eq!(combat.stats().damage_dealt, 50.0);
    }

    #[test]
    fn test_delayed_events_fire_in_order() {
        let mut combat = manager();
        combat.schedule(DelayedEvent::HealPlayer(5.0), 100.0);
        combat.schedule(DelayedEvent::SpawnEnemy, 50.0);

        assert!(combat.due_events(40.0).is_empty());
        assert_eq!(combat.due_events(20.0), vec![DelayedEvent::SpawnEnemy]);
        assert_eq!(combat.due_events(40.0), vec![DelayedEvent::HealPlayer(5.0)]);
        assert_eq!(combat.pending_events(), 0);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut combat = manager();
        drop(combat.subscribe());
        let live = combat.subscribe();
        combat.handle_enemy_attack(10.0);
        assert_eq!(combat.subscribers.len(), 1);
        assert_eq!(live.try_iter().count(), 1);
    }
}

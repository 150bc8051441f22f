//! Weapon system
//!
//! Every weapon kind keeps its own ammo pool, fire-rate timer and reload
//! state. Time is tracked in milliseconds on an internal clock advanced by
//! `WeaponSystem::update`.

use crate::error::{CombatError, Result};
use crate::projectile::{Explosive, ProjectileKind, ProjectileSpawn};
use rand::Rng;
use ranch_math::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weapon kinds in the fixed registered set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    Rifle,
    Shotgun,
    Tnt,
}

impl WeaponKind {
    pub const ALL: [Self; 3] = [Self::Rifle, Self::Shotgun, Self::Tnt];

    pub fn name(self) -> &'static str {
        match self {
            Self::Rifle => "rifle",
            Self::Shotgun => "shotgun",
            Self::Tnt => "tnt",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rifle" => Some(Self::Rifle),
            "shotgun" => Some(Self::Shotgun),
            "tnt" => Some(Self::Tnt),
            _ => None,
        }
    }

    fn fire_cue(self) -> SoundCue {
        match self {
            Self::Rifle => SoundCue::Gunshot,
            Self::Shotgun => SoundCue::ShotgunBlast,
            Self::Tnt => SoundCue::TntThrow,
        }
    }
}

/// Named sound cues emitted by weapons and projectiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Gunshot,
    ShotgunBlast,
    TntThrow,
    Reload,
    EmptyClick,
    BulletImpact,
    Explosion,
}

impl SoundCue {
    pub fn name(self) -> &'static str {
        match self {
            Self::Gunshot => "gunshot",
            Self::ShotgunBlast => "shotgun_blast",
            Self::TntThrow => "tnt_throw",
            Self::Reload => "reload",
            Self::EmptyClick => "empty_click",
            Self::BulletImpact => "bullet_impact",
            Self::Explosion => "explosion",
        }
    }
}

/// Weapon statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Damage per projectile
    pub damage: f32,
    /// Minimum time between shots
    pub fire_interval_ms: f32,
    pub clip_size: u32,
    pub reload_ms: f32,
    pub projectile_speed: f32,
    pub range: f32,
    /// Projectiles per shot
    pub pellets: u32,
    /// Per-pellet jitter on X and Y
    pub spread: f32,
    pub starting_ammo: u32,
    pub max_ammo: u32,
    pub projectile_lifetime_ms: f32,
    /// TNT only
    pub explosion_radius: f32,
    /// TNT only
    pub fuse_ms: f32,
}

impl WeaponStats {
    /// Stats for a weapon kind
    pub fn for_kind(kind: WeaponKind) -> Self {
        match kind {
            WeaponKind::Rifle => Self {
                damage: 25.0,
                fire_interval_ms: 800.0,
                clip_size: 8,
                reload_ms: 1500.0,
                projectile_speed: 80.0,
                range: 150.0,
                pellets: 1,
                spread: 0.0,
                starting_ammo: 30,
                max_ammo: 100,
                projectile_lifetime_ms: 2000.0,
                explosion_radius: 0.0,
                fuse_ms: 0.0,
            },
            WeaponKind::Shotgun => Self {
                damage: 15.0,
                fire_interval_ms: 1200.0,
                clip_size: 6,
                reload_ms: 2500.0,
                projectile_speed: 60.0,
                range: 80.0,
                pellets: 6,
                spread: 0.3,
                starting_ammo: 12,
                max_ammo: 50,
                projectile_lifetime_ms: 1500.0,
                explosion_radius: 0.0,
                fuse_ms: 0.0,
            },
            WeaponKind::Tnt => Self {
                damage: 100.0,
                fire_interval_ms: 2000.0,
                clip_size: 1,
                reload_ms: 3000.0,
                projectile_speed: 25.0,
                range: 50.0,
                pellets: 1,
                spread: 0.0,
                starting_ammo: 3,
                max_ammo: 10,
                projectile_lifetime_ms: 5000.0,
                explosion_radius: 8.0,
                fuse_ms: 3000.0,
            },
        }
    }
}

/// One weapon's state
#[derive(Debug, Clone)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub stats: WeaponStats,
    ammo: u32,
    last_fire_ms: Option<f32>,
    reload_remaining_ms: Option<f32>,
}

impl Weapon {
    /// Create a weapon with its starting ammo
    pub fn new(kind: WeaponKind) -> Self {
        Self::with_stats(kind, WeaponStats::for_kind(kind))
    }

    /// Create a weapon with custom stats
    pub fn with_stats(kind: WeaponKind, stats: WeaponStats) -> Self {
        let ammo = stats.starting_ammo.min(stats.max_ammo);
        Self {
            kind,
            stats,
            ammo,
            last_fire_ms: None,
            reload_remaining_ms: None,
        }
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn last_fire_ms(&self) -> Option<f32> {
        self.last_fire_ms
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_remaining_ms.is_some()
    }

    /// Fire-rate interval has elapsed since the last shot
    pub fn cooled_down(&self, now_ms: f32) -> bool {
        self.last_fire_ms
            .map_or(true, |last| now_ms - last >= self.stats.fire_interval_ms)
    }

    /// Ready to fire: has ammo, not reloading, interval elapsed
    pub fn can_fire(&self, now_ms: f32) -> bool {
        self.ammo > 0 && !self.is_reloading() && self.cooled_down(now_ms)
    }

    /// Reload is possible while below the clip size and the ammo cap
    pub fn can_reload(&self) -> bool {
        !self.is_reloading() && self.ammo < self.stats.clip_size && self.stats.max_ammo > self.ammo
    }

    /// Start a reload. Returns false if the reload is not allowed.
    pub fn begin_reload(&mut self) -> bool {
        if !self.can_reload() {
            return false;
        }
        self.reload_remaining_ms = Some(self.stats.reload_ms);
        true
    }

    /// Add ammo clamped to the cap. Returns the amount actually added.
    pub fn add_ammo(&mut self, amount: u32) -> u32 {
        let room = self.stats.max_ammo.saturating_sub(self.ammo);
        let added = amount.min(room);
        self.ammo += added;
        added
    }

    /// Advance the reload timer. Returns the ammo granted if a reload finished.
    pub fn update(&mut self, delta_ms: f32) -> Option<u32> {
        let remaining = self.reload_remaining_ms.as_mut()?;
        *remaining -= delta_ms;
        if *remaining > 0.0 {
            return None;
        }
        self.reload_remaining_ms = None;
        let fill = self
            .stats
            .clip_size
            .saturating_sub(self.ammo)
            .min(self.stats.max_ammo.saturating_sub(self.ammo));
        self.ammo += fill;
        Some(fill)
    }

    fn consume(&mut self, now_ms: f32) {
        self.ammo -= 1;
        self.last_fire_ms = Some(now_ms);
    }

    fn spawn_for(&self, origin: Vec3, aim: Vec3, rng: &mut impl Rng) -> Vec<ProjectileSpawn> {
        let explosive = (self.stats.explosion_radius > 0.0).then(|| Explosive::new(
            self.stats.explosion_radius,
            self.stats.fuse_ms,
        ));
        let kind = match self.kind {
            WeaponKind::Rifle => ProjectileKind::Bullet,
            WeaponKind::Shotgun => ProjectileKind::Pellet,
            WeaponKind::Tnt => ProjectileKind::Tnt,
        };

        (0..self.stats.pellets.max(1))
            .map(|_| {
                let direction = if self.stats.spread > 0.0 {
                    let jitter = Vec3::new(
                        (rng.gen::<f32>() - 0.5) * self.stats.spread,
                        (rng.gen::<f32>() - 0.5) * self.stats.spread,
                        0.0,
                    );
                    (aim + jitter).normalize_or_zero()
                } else {
                    aim
                };
                ProjectileSpawn {
                    kind,
                    origin,
                    direction,
                    speed: self.stats.projectile_speed,
                    damage: self.stats.damage,
                    lifetime_ms: self.stats.projectile_lifetime_ms,
                    explosive,
                }
            })
            .collect()
    }
}

/// Result of a fire attempt
#[derive(Debug, Clone)]
pub enum FireOutcome {
    /// Shot fired
    Fired {
        kind: WeaponKind,
        projectiles: Vec<ProjectileSpawn>,
        cue: SoundCue,
    },
    /// Out of ammo; only the empty cue plays
    Empty,
    /// Still cooling down or reloading
    NotReady,
    /// No weapon selected
    NoWeapon,
}

impl FireOutcome {
    pub fn fired(&self) -> bool {
        matches!(self, Self::Fired { .. })
    }

    pub fn projectiles(&self) -> &[ProjectileSpawn] {
        match self {
            Self::Fired { projectiles, .. } => projectiles,
            _ => &[],
        }
    }

    /// Cue to play, if any
    pub fn cue(&self) -> Option<SoundCue> {
        match self {
            Self::Fired { cue, .. } => Some(*cue),
            Self::Empty => Some(SoundCue::EmptyClick),
            Self::NotReady | Self::NoWeapon => None,
        }
    }
}

/// Snapshot of the current weapon for a HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponInfo {
    pub name: &'static str,
    pub ammo: u32,
    pub max_ammo: u32,
    pub is_reloading: bool,
}

/// The player's weapons and the current selection
#[derive(Debug, Clone)]
pub struct WeaponSystem {
    weapons: BTreeMap<WeaponKind, Weapon>,
    current: Option<WeaponKind>,
    clock_ms: f32,
}

impl WeaponSystem {
    /// Rifle, shotgun and TNT with the rifle selected
    pub fn new() -> Self {
        Self::with_weapons(WeaponKind::ALL.iter().map(|k| Weapon::new(*k)))
    }

    /// Register a custom set; the first weapon is selected
    pub fn with_weapons(weapons: impl IntoIterator<Item = Weapon>) -> Self {
        let weapons: BTreeMap<_, _> = weapons.into_iter().map(|w| (w.kind, w)).collect();
        let current = weapons.keys().next().copied();
        Self {
            weapons,
            current,
            clock_ms: 0.0,
        }
    }

    /// Internal clock in milliseconds
    pub fn now_ms(&self) -> f32 {
        self.clock_ms
    }

    pub fn current_kind(&self) -> Option<WeaponKind> {
        self.current
    }

    pub fn current(&self) -> Option<&Weapon> {
        self.weapons.get(&self.current?)
    }

    pub fn weapon(&self, kind: WeaponKind) -> Option<&Weapon> {
        self.weapons.get(&kind)
    }

    pub fn weapon_mut(&mut self, kind: WeaponKind) -> Option<&mut Weapon> {
        self.weapons.get_mut(&kind)
    }

    pub fn ammo(&self, kind: WeaponKind) -> u32 {
        self.weapons.get(&kind).map_or(0, |w| w.ammo())
    }

    /// Select a registered weapon. Instantaneous.
    pub fn switch_weapon(&mut self, kind: WeaponKind) -> bool {
        if !self.weapons.contains_key(&kind) {
            log::warn!("Cannot switch to unregistered weapon {}", kind.name());
            return false;
        }
        if self.current != Some(kind) {
            log::debug!("Switched to {}", kind.name());
        }
        self.current = Some(kind);
        true
    }

    /// Select a weapon by name
    pub fn switch_by_name(&mut self, name: &str) -> Result<()> {
        let kind = WeaponKind::from_name(name)
            .filter(|k| self.weapons.contains_key(k))
            .ok_or_else(|| CombatError::UnknownWeapon(name.to_string()))?;
        self.current = Some(kind);
        Ok(())
    }

    /// Try to fire the current weapon along `aim` from `origin`
    ///
    /// An empty weapon reports `Empty` without touching the fire-rate timer.
    pub fn fire(&mut self, origin: Vec3, aim: Vec3, rng: &mut impl Rng) -> FireOutcome {
        let now = self.clock_ms;
        let Some(weapon) = self.current.and_then(|k| self.weapons.get_mut(&k)) else {
            log::warn!("{}", CombatError::NoWeaponSelected);
            return FireOutcome::NoWeapon;
        };
        if weapon.ammo() == 0 {
            return FireOutcome::Empty;
        }
        if !weapon.can_fire(now) {
            return FireOutcome::NotReady;
        }

        let aim = aim.normalize_or_zero();
        let projectiles = weapon.spawn_for(origin, aim, rng);
        weapon.consume(now);
        FireOutcome::Fired {
            kind: weapon.kind,
            projectiles,
            cue: weapon.kind.fire_cue(),
        }
    }

    /// Start reloading the current weapon
    pub fn reload(&mut self) -> bool {
        self.current
            .and_then(|k| self.weapons.get_mut(&k))
            .map_or(false, |w| w.begin_reload())
    }

    /// Add ammo to a weapon's pool, clamped to its cap
    pub fn add_ammo(&mut self, kind: WeaponKind, amount: u32) -> u32 {
        self.weapons.get_mut(&kind).map_or(0, |w| w.add_ammo(amount))
    }

    /// Advance the clock and every reload timer. Returns the kinds whose reload finished.
    pub fn update(&mut self, delta_ms: f32) -> Vec<WeaponKind> {
        self.clock_ms += delta_ms;
        self.weapons
            .values_mut()
            .filter_map(|w| w.update(delta_ms).map(|_| w.kind))
            .collect()
    }

    /// Current weapon snapshot
    pub fn weapon_info(&self) -> Option<WeaponInfo> {
        self.current().map(|w| WeaponInfo {
            name: w.kind.name(),
            ammo: w.ammo(),
            max_ammo: w.stats.max_ammo,
            is_reloading: w.is_reloading(),
        })
    }

    /// Restore starting ammo and clear timers
    pub fn reset(&mut self) {
        for weapon in self.weapons.values_mut() {
            *weapon = Weapon::with_stats(weapon.kind, weapon.stats.clone());
        }
        self.current = self.weapons.keys().next().copied();
        self.clock_ms = 0.0;
    }
}

impl Default for WeaponSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_starts_with_rifle() {
        let weapons = WeaponSystem::new();
        assert_eq!(weapons.current_kind(), Some(WeaponKind::Rifle));
        assert_eq!(weapons.ammo(WeaponKind::Rifle), 30);
        assert_eq!(weapons.ammo(WeaponKind::Shotgun), 12);
        assert_eq!(weapons.ammo(WeaponKind::Tnt), 3);
    }

    #[test]
    fn test_fire_rate_gate() {
        let mut weapons = WeaponSystem::new();
        let mut rng = rng();

        let first = weapons.fire(Vec3::ZERO, Vec3::Z, &mut rng);
        assert!(first.fired());
        assert_eq!(first.cue(), Some(SoundCue::Gunshot));
        assert_eq!(first.projectiles().len(), 1);

        weapons.update(400.0);
        assert!(matches!(weapons.fire(Vec3::ZERO, Vec3::Z, &mut rng), FireOutcome::NotReady));

        weapons.update(400.0);
        assert!(weapons.fire(Vec3::ZERO, Vec3::Z, &mut rng).fired());
        assert_eq!(weapons.ammo(WeaponKind::Rifle), 28);
    }

    #[test]
    fn test_empty_fire_keeps_timer() {
        let mut weapons = WeaponSystem::with_weapons([Weapon::with_stats(
            WeaponKind::Rifle,
            WeaponStats {
                starting_ammo: 0,
                ..WeaponStats::for_kind(WeaponKind::Rifle)
            },
        )]);
        let outcome = weapons.fire(Vec3::ZERO, Vec3::Z, &mut rng());

        assert!(!outcome.fired());
        assert!(outcome.projectiles().is_empty());
        assert_eq!(outcome.cue(), Some(SoundCue::EmptyClick));
        assert_eq!(weapons.current().unwrap().last_fire_ms(), None);
    }

    #[test]
    fn test_shotgun_pellets_are_unit_and_jittered() {
        let mut weapons = WeaponSystem::new();
        weapons.switch_weapon(WeaponKind::Shotgun);
        let outcome = weapons.fire(Vec3::ZERO, Vec3::Z, &mut rng());

        let pellets = outcome.projectiles();
        assert_eq!(pellets.len(), 6);
        for p in pellets {
            assert_relative_eq!(p.direction.length(), 1.0, epsilon = 1e-5);
            assert!(p.direction.z > 0.9);
            assert_eq!(p.kind, ProjectileKind::Pellet);
        }
        assert!(pellets.iter().any(|p| p.direction != pellets[0].direction));
        assert_eq!(weapons.ammo(WeaponKind::Shotgun), 11);
    }

    #[test]
    fn test_tnt_spawn_is_explosive() {
        let mut weapons = WeaponSystem::new();
        weapons.switch_weapon(WeaponKind::Tnt);
        let outcome = weapons.fire(Vec3::ZERO, Vec3::X, &mut rng());
        let spawn = outcome.projectiles()[0];
        let explosive = spawn.explosive.unwrap();
        assert_eq!(explosive.radius, 8.0);
        assert_eq!(explosive.fuse_ms, 3000.0);
        assert_eq!(spawn.speed, 25.0);
    }

    #[test]
    fn test_reload_timed_and_capped() {
        let mut weapon = Weapon::with_stats(
            WeaponKind::Rifle,
            WeaponStats {
                starting_ammo: 3,
                ..WeaponStats::for_kind(WeaponKind::Rifle)
            },
        );
        assert!(weapon.begin_reload());
        assert!(!weapon.begin_reload());
        assert!(!weapon.can_fire(10_000.0));

        assert_eq!(weapon.update(1000.0), None);
        assert_eq!(weapon.update(500.0), Some(5));
        assert_eq!(weapon.ammo(), 8);
        assert!(!weapon.can_reload());
    }

    #[test]
    fn test_reload_respects_max_ammo() {
        let mut weapon = Weapon::with_stats(
            WeaponKind::Tnt,
            WeaponStats {
                starting_ammo: 0,
                clip_size: 5,
                max_ammo: 2,
                ..WeaponStats::for_kind(WeaponKind::Tnt)
            },
        );
        assert!(weapon.begin_reload());
        assert_eq!(weapon.update(3000.0), Some(2));
        assert_eq!(weapon.ammo(), 2);
    }

    #[test]
    fn test_add_ammo_clamps() {
        let mut weapons = WeaponSystem::new();
        assert_eq!(weapons.add_ammo(WeaponKind::Tnt, 20), 7);
        assert_eq!(weapons.ammo(WeaponKind::Tnt), 10);
        assert_eq!(weapons.add_ammo(WeaponKind::Tnt, 1), 0);
    }

    #[test]
    fn test_switch_by_name() {
        let mut weapons = WeaponSystem::new();
        assert!(weapons.switch_by_name("Shotgun").is_ok());
        assert_eq!(weapons.weapon_info().unwrap().name, "shotgun");
        assert!(matches!(
            weapons.switch_by_name("crossbow"),
            Err(CombatError::UnknownWeapon(_))
        ));
    }

    #[test]
    fn test_no_weapon_selected() {
        let mut weapons = WeaponSystem::with_weapons(Vec::new());
        let outcome = weapons.fire(Vec3::ZERO, Vec3::Z, &mut rng());
        assert!(matches!(outcome, FireOutcome::NoWeapon));
        assert!(!weapons.reload());
    }
}

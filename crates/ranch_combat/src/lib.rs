//! Ranch Combat - Weapons, Projectiles and Scoring
//!
//! Pure combat rules for the simulation core. Nothing here touches the
//! scene directly: weapons return the projectiles to spawn, projectiles
//! return what they hit, and the caller applies the results.
//!
//! # Features
//!
//! - Rifle, shotgun and TNT with fire-rate, ammo and timed reload
//! - Shotgun pellet spread with per-pellet jitter
//! - Projectile lifetime, hit resolution and once-only TNT explosions
//!   with linear falloff
//! - Player health with a damage-immunity window
//! - Per-match stats and the kill reward table
//!
//! # Example
//!
//! ```ignore
//! use ranch_combat::prelude::*;
//!
//! let mut weapons = WeaponSystem::new();
//! let outcome = weapons.fire(muzzle, aim, &mut rng);
//! for spawn in outcome.projectiles() {
//!     // create a projectile entity from `spawn`
//! }
//!
//! weapons.update(16.0);
//! ```

pub mod damage;
pub mod error;
pub mod health;
pub mod projectile;
pub mod reward;
pub mod stats;
pub mod weapon;

pub mod prelude {
    pub use crate::damage::{falloff_damage, DamageInfo};
    pub use crate::error::{CombatError, Result};
    pub use crate::health::{HitResult, PlayerHealth, DEFAULT_IMMUNITY_MS, DEFAULT_MAX_HEALTH};
    pub use crate::projectile::{
        EnemyRegistry, Explosive, Projectile, ProjectileEvent, ProjectileKind, ProjectileSpawn,
        PROJECTILE_RADIUS,
    };
    pub use crate::reward::{Reward, RewardBand, RewardTable};
    pub use crate::stats::CombatStats;
    pub use crate::weapon::{FireOutcome, SoundCue, Weapon, WeaponInfo, WeaponKind, WeaponStats, WeaponSystem};
}

pub use prelude::*;

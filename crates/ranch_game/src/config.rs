//! Game configuration
//!
//! # Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. Config file: `ranch.toml` or `config/ranch.toml`
//! 3. Environment: `RANCH_SEED`, `RANCH_MAX_ENEMIES`, `RANCH_LOG_FRAMES`
//!
//! # Example Config File
//!
//! ```toml
//! [frame]
//! max_delta_ms = 50.0
//!
//! [physics]
//! cell_size = 10.0
//!
//! [combat]
//! player_max_health = 100.0
//! immunity_ms = 1000.0
//! kill_target = 25
//!
//! [enemy]
//! max_enemies = 10
//! spawn_cooldown_ms = 5000.0
//!
//! [simulation]
//! seed = 1234
//! ```

use crate::error::{GameError, Result};
use ranch_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

const CONFIG_PATHS: [&str; 2] = ["ranch.toml", "config/ranch.toml"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Upper bound on one frame's simulated time
    pub max_delta_ms: f32,
    /// Log frame statistics every this many frames (0 = never)
    pub log_every_frames: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_delta_ms: 50.0,
            log_every_frames: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub player_max_health: f32,
    pub immunity_ms: f32,
    pub kill_target: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            player_max_health: ranch_combat::DEFAULT_MAX_HEALTH,
            immunity_ms: ranch_combat::DEFAULT_IMMUNITY_MS,
            kill_target: ranch_gamestate::DEFAULT_KILL_TARGET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub max_enemies: usize,
    pub spawn_cooldown_ms: f32,
    pub aggro_range: f32,
    pub attack_range: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_enemies: ranch_ai::DEFAULT_MAX_ENEMIES,
            spawn_cooldown_ms: ranch_ai::DEFAULT_SPAWN_COOLDOWN_MS,
            aggro_range: 15.0,
            attack_range: 2.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
}

/// Complete game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub frame: FrameConfig,
    pub physics: PhysicsConfig,
    pub combat: CombatConfig,
    pub enemy: EnemyConfig,
    pub simulation: SimulationConfig,
    /// File this config was read from
    #[serde(skip)]
    pub config_path: Option<String>,
}

impl GameConfig {
    /// Defaults, then the first config file found, then environment overrides
    pub fn load() -> Self {
        let mut config = Self::default();

        for path in CONFIG_PATHS {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::load_from_file(path) {
                Ok(loaded) => {
                    config = loaded;
                    log::info!("Loaded game config from {}", path);
                    break;
                }
                Err(e) => log::warn!("Ignoring config {}: {}", path, e),
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.as_ref().display().to_string());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `RANCH_*` overrides; unparsable values are logged and skipped
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(seed) = var("RANCH_SEED") {
            match seed.parse() {
                Ok(seed) => {
                    self.simulation.seed = seed;
                    log::info!("Seed from env: {}", seed);
                }
                Err(_) => log::warn!("Invalid RANCH_SEED: {}", seed),
            }
        }

        if let Some(max) = var("RANCH_MAX_ENEMIES") {
            match max.parse() {
                Ok(max) => {
                    self.enemy.max_enemies = max;
                    log::info!("Enemy cap from env: {}", max);
                }
                Err(_) => log::warn!("Invalid RANCH_MAX_ENEMIES: {}", max),
            }
        }

        if let Some(every) = var("RANCH_LOG_FRAMES") {
            match every.parse() {
                Ok(every) => self.frame.log_every_frames = every,
                Err(_) => log::warn!("Invalid RANCH_LOG_FRAMES: {}", every),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.frame.max_delta_ms > 0.0) {
            return Err(GameError::InvalidConfig("frame.max_delta_ms must be positive".into()));
        }
        if !(self.combat.player_max_health > 0.0) {
            return Err(GameError::InvalidConfig("combat.player_max_health must be positive".into()));
        }
        if self.combat.immunity_ms < 0.0 {
            return Err(GameError::InvalidConfig("combat.immunity_ms must not be negative".into()));
        }
        self.physics
            .validate()
            .map_err(|e| GameError::InvalidConfig(e.to_string()))
    }
}

//! Ranch Game - Scene, Combat Orchestration and Frame Scheduling
//!
//! Ties the simulation crates together into a playable match: the player
//! defends the ranch while wild hogs spawn, patrol and charge.
//!
//! # Features
//!
//! - Entity/component scene with a parent/child tree and deferred destruction
//! - Combat manager on the player entity: health, stats, rewards, delayed events
//! - Broadcast combat signals over `crossbeam-channel`
//! - Fixed frame order: input, logic, collision, reconcile, render
//! - Level hydration and boundary transitions
//! - Headless services for tests and tools
//!
//! # Example
//!
//! ```ignore
//! use ranch_game::prelude::*;
//!
//! let mut game = Game::new(GameConfig::load(), Services::headless())?;
//! game.world_mut().load_level("ranch_entrance", None)?;
//!
//! let signals = game.world_mut().subscribe();
//! loop {
//!     game.tick(16.0);
//! }
//! ```

pub mod components;
pub mod config;
pub mod error;
pub mod game;
pub mod scene;
pub mod scheduler;
pub mod services;

pub mod prelude {
    pub use crate::components::{
        CombatManager, CombatPair, CombatSignal, DelayedEvent, PlayerHealthInfo, ACTION_FIRE, KEY_RELOAD,
        WEAPON_KEYS,
    };
    pub use crate::config::{CombatConfig, EnemyConfig, FrameConfig, GameConfig, SimulationConfig};
    pub use crate::error::{GameError, Result};
    pub use crate::game::{Game, GameWorld, KEY_PAUSE, PLAYER_NAME};
    pub use crate::scene::{
        Body, Command, Commands, Component, ComponentContext, ComponentKind, Entity, FrameInput, FrameView, Scene,
    };
    pub use crate::scheduler::{FrameScheduler, FrameStages, FrameStats, FrameTime, DEFAULT_MAX_DELTA_MS};
    pub use crate::services::{AudioSink, InputSource, NullAudio, NullInput, NullRenderer, Renderer, Services};
}

pub use prelude::*;

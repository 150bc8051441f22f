//! Ranch GameState - Levels and Match State
//!
//! # Features
//!
//! - JSON level definitions (geometry, spawn points, gates, boundaries)
//! - Level loading into a hydration plan of static colliders and spawns
//! - Keycard and switch progression gating level transitions
//! - Match state machine and the win rule
//!
//! # Example
//!
//! ```ignore
//! use ranch_gamestate::prelude::*;
//!
//! let mut levels = LevelManager::new();
//! levels.register_level(ranch_entrance()?);
//! let plan = levels.load_level("ranch_entrance", None)?;
//! for static_box in &plan.static_boxes {
//!     // add a static collider
//! }
//! ```

pub mod error;
pub mod level;
pub mod manager;
pub mod progress;
pub mod state;

pub mod prelude {
    pub use crate::error::{GameStateError, Result};
    pub use crate::level::{
        ranch_entrance, BoundaryDef, BoundaryKind, Bounds, Dimensions, EnemySpawnDef, EnvironmentDef,
        GeometryDef, GeometryKind, LevelDef, PlayerSpawn, DEFAULT_PLAYER_SPAWN, DEFAULT_SPAWN, INTERACTION_RANGE,
    };
    pub use crate::manager::{BoundaryEvent, Interaction, LevelManager, LevelPlan, StaticBox};
    pub use crate::progress::{Progress, Requirements};
    pub use crate::state::{GameState, GameStateManager, StateTransition, WinRule, DEFAULT_KILL_TARGET};
}

pub use prelude::*;

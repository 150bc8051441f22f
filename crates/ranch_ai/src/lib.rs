//! Ranch AI - Enemy Behavior
//!
//! # Features
//!
//! - Generic finite state machine with terminal states and per-state timers
//! - Wild boar AI: patrol, zig-zag charge, attack and death
//! - Enemy manager with a spawn cap, cooldown and spawn points
//!
//! # Example
//!
//! ```ignore
//! use ranch_ai::prelude::*;
//!
//! let mut boar = EnemyAi::new(EnemyVariant::V1);
//! let out = boar.update(&AiInput { position, player_position, hit_wall: false }, 16.0, &mut rng);
//! body.velocity = out.velocity;
//! ```

pub mod enemy;
pub mod manager;
pub mod state_machine;

pub mod prelude {
    pub use crate::enemy::{
        AiInput, AiOutput, Attack, DamageTaken, EnemyAi, EnemyCue, EnemyState, EnemyStats, EnemyVariant,
    };
    pub use crate::manager::{
        default_spawn_points, EnemyManager, SpawnPoint, SpawnRequest, DEFAULT_MAX_ENEMIES,
        DEFAULT_SPAWN_COOLDOWN_MS,
    };
    pub use crate::state_machine::{State, StateChange, StateMachine, Transition};
}

pub use prelude::*;

//! Error types for the game layer

use crate::scene::ComponentKind;
use ranch_combat::CombatError;
use ranch_core::Id;
use ranch_gamestate::GameStateError;
use ranch_physics::PhysicsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Entity not found: {0}")]
    EntityNotFound(Id),

    #[error("Setting {parent} as parent of {child} would create a cycle")]
    HierarchyCycle { child: Id, parent: Id },

    #[error("Component {0} already attached")]
    DuplicateComponent(ComponentKind),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Physics(#[from] PhysicsError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    GameState(#[from] GameStateError),
}

pub type Result<T> = std::result::Result<T, GameError>;

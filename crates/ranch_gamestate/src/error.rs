//! Error types for level loading

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameStateError {
    #[error("Level not found: {0}")]
    LevelNotFound(String),

    #[error("Level data invalid: {0}")]
    InvalidLevel(String),

    #[error("Level parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameStateError>;

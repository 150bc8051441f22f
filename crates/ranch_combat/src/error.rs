//! Error types for combat

use thiserror::Error;

/// Combat errors
#[derive(Debug, Error)]
pub enum CombatError {
    /// Weapon name does not match a registered weapon
    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),

    /// No weapon is selected
    #[error("No weapon selected")]
    NoWeaponSelected,
}

/// Result type for combat operations
pub type Result<T> = std::result::Result<T, CombatError>;

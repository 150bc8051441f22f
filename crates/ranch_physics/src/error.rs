//! Error types for the collision system

use thiserror::Error;

/// Collision system errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Collider not found (removed or never added)
    #[error("Collider not found: {0:?}")]
    ColliderNotFound(crate::collider::ColliderHandle),

    /// Shape parameters are not positive finite numbers
    #[error("Invalid collider shape: {0}")]
    InvalidShape(String),

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;

//! Collision world configuration

use crate::error::{PhysicsError, Result};
use serde::{Deserialize, Serialize};

/// Default grid cell edge length in world units
pub const DEFAULT_CELL_SIZE: f32 = 10.0;

/// Collision world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Edge length of a spatial grid cell on X/Z
    pub cell_size: f32,

    /// Apply positional correction to non-trigger pairs
    pub response_enabled: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            response_enabled: true,
        }
    }
}

impl PhysicsConfig {
    /// Set the grid cell size
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(PhysicsError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }
}

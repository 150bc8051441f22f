//! Level definitions
//!
//! Levels are plain JSON. Positions are `[x, y, z]` arrays; geometry
//! positions name the base of the shape, so a collision box sits on top
//! of its position.

use crate::error::{GameStateError, Result};
use crate::progress::Requirements;
use ranch_math::consts::FRAC_PI_2;
use ranch_math::{Vec3, AABB};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the spawn used when none is requested
pub const DEFAULT_SPAWN: &str = "default";
/// Player spawn used by levels that define none
pub const DEFAULT_PLAYER_SPAWN: [f32; 3] = [0.0, 1.0, 15.0];

/// Reach of gates, switches and keycards
pub const INTERACTION_RANGE: f32 = 2.0;

/// Fence thickness when the definition gives only a length
const FENCE_THICKNESS: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpawn {
    pub position: [f32; 3],
    /// Pitch, yaw, roll
    #[serde(default)]
    pub rotation: [f32; 3],
}

impl PlayerSpawn {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

impl Default for PlayerSpawn {
    fn default() -> Self {
        Self {
            position: DEFAULT_PLAYER_SPAWN,
            rotation: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Floor,
    Fence,
    Wall,
    Structure,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub depth: Option<f32>,
    /// Fences and walls
    pub length: Option<f32>,
}

/// A piece of static level geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryDef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub collision: bool,
}

impl GeometryDef {
    /// World-space size; quarter turns about Y swap width and depth
    pub fn size(&self) -> Vec3 {
        let d = &self.dimensions;
        let thin = matches!(self.kind, GeometryKind::Fence | GeometryKind::Wall);
        let width = d.width.or(d.length).unwrap_or(1.0);
        let height = d.height.unwrap_or(if self.kind == GeometryKind::Floor { 0.0 } else { 1.0 });
        let depth = d.depth.unwrap_or(if thin { FENCE_THICKNESS } else { 1.0 });

        let quarter_turns = (self.rotation[1] / FRAC_PI_2).round() as i32;
        if quarter_turns.rem_euclid(2) == 1 {
            Vec3::new(depth, height, width)
        } else {
            Vec3::new(width, height, depth)
        }
    }

    /// Box sitting on `position`, or `None` without collision
    pub fn collision_box(&self) -> Option<AABB> {
        if !self.collision {
            return None;
        }
        let half = self.size() * 0.5;
        let center = Vec3::from_array(self.position) + Vec3::new(0.0, half.y, 0.0);
        Some(AABB::from_center_half_extents(center, half))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnvironmentDef {
    Gate {
        id: String,
        position: [f32; 3],
        #[serde(default)]
        requirements: Requirements,
    },
    Switch {
        id: String,
        switch_id: String,
        position: [f32; 3],
    },
    Keycard {
        id: String,
        keycard_id: String,
        position: [f32; 3],
    },
    Decoration {
        id: String,
        position: [f32; 3],
    },
}

impl EnvironmentDef {
    pub fn id(&self) -> &str {
        match self {
            Self::Gate { id, .. } | Self::Switch { id, .. } | Self::Keycard { id, .. } | Self::Decoration { id, .. } => id,
        }
    }

    /// Gates, switches and keycards react to the player; decorations do not
    pub fn is_interactive(&self) -> bool {
        !matches!(self, Self::Decoration { .. })
    }

    pub fn position(&self) -> Vec3 {
        match self {
            Self::Gate { position, .. }
            | Self::Switch { position, .. }
            | Self::Keycard { position, .. }
            | Self::Decoration { position, .. } => Vec3::from_array(*position),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Bounds {
    /// Inclusive on every face
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min_x
            && p.x <= self.max_x
            && p.y >= self.min_y
            && p.y <= self.max_y
            && p.z >= self.min_z
            && p.z <= self.max_z
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    Transition,
    Gate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryDef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BoundaryKind,
    pub bounds: Bounds,
    #[serde(default)]
    pub target_level: Option<String>,
    #[serde(default)]
    pub target_spawn: Option<String>,
    #[serde(default)]
    pub requirements: Requirements,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawnDef {
    pub position: [f32; 3],
    /// Boar model variant, 1 or 2
    #[serde(default = "default_variant")]
    pub variant: u8,
}

fn default_variant() -> u8 {
    1
}

/// A complete level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub spawn_points: BTreeMap<String, PlayerSpawn>,
    #[serde(default)]
    pub geometry: Vec<GeometryDef>,
    #[serde(default)]
    pub environment: Vec<EnvironmentDef>,
    #[serde(default)]
    pub boundaries: Vec<BoundaryDef>,
    /// Empty keeps the enemy manager's own spawn points
    #[serde(default)]
    pub enemy_spawns: Vec<EnemySpawnDef>,
}

impl LevelDef {
    pub fn from_json(json: &str) -> Result<Self> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loading level from {}", path.as_ref().display());
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(GameStateError::InvalidLevel("empty level id".into()));
        }
        for boundary in &self.boundaries {
            if boundary.kind == BoundaryKind::Transition && boundary.target_level.is_none() {
                return Err(GameStateError::InvalidLevel(format!(
                    "transition '{}' has no target level",
                    boundary.id
                )));
            }
        }
        Ok(())
    }

    /// Named spawn, falling back to `default`, then to the built-in spawn
    pub fn player_spawn(&self, name: &str) -> PlayerSpawn {
        if let Some(spawn) = self.spawn_points.get(name) {
            return *spawn;
        }
        if name != DEFAULT_SPAWN {
            log::warn!("Spawn point not found: {}:{}", self.id, name);
        }
        self.spawn_points.get(DEFAULT_SPAWN).copied().unwrap_or_default()
    }
}

/// The starting level shipped with the game
pub fn ranch_entrance() -> Result<LevelDef> {
    LevelDef::from_json(include_str!("../levels/ranch_entrance.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_level_defaults() {
        let level = LevelDef::from_json(r#"{ "id": "empty", "name": "Empty" }"#).unwrap();
        assert_eq!(level.player_spawn(DEFAULT_SPAWN).position, DEFAULT_PLAYER_SPAWN);
        assert!(level.geometry.is_empty());
    }

    #[test]
    fn test_rotated_fence_box() {
        let fence = GeometryDef {
            id: "fence".into(),
            kind: GeometryKind::Fence,
            position: [-15.0, 0.0, 10.0],
            rotation: [0.0, FRAC_PI_2, 0.0],
            dimensions: Dimensions {
                length: Some(20.0),
                height: Some(2.0),
                ..Dimensions::default()
            },
            texture: None,
            collision: true,
        };
        let aabb = fence.collision_box().unwrap();
        assert!((aabb.min.x + 15.1).abs() < 1e-4);
        assert!((aabb.max.x + 14.9).abs() < 1e-4);
        assert_eq!((aabb.min.y, aabb.min.z), (0.0, 0.0));
        assert_eq!((aabb.max.y, aabb.max.z), (2.0, 20.0));
    }

    #[test]
    fn test_floor_has_no_box() {
        let json = r#"{ "id": "g", "type": "floor", "position": [0, 0, 0],
                        "dimensions": { "width": 50, "depth": 30 } }"#;
        let floor: GeometryDef = serde_json::from_str(json).unwrap();
        assert!(floor.collision_box().is_none());
    }

    #[test]
    fn test_transition_needs_target() {
        let json = r#"{ "id": "a", "name": "A", "boundaries": [
            { "id": "out", "type": "transition",
              "bounds": { "min_x": 0, "max_x": 1, "min_y": 0, "max_y": 1, "min_z": 0, "max_z": 1 } }
        ] }"#;
        assert!(matches!(LevelDef::from_json(json), Err(GameStateError::InvalidLevel(_))));
    }

    #[test]
    fn test_bundled_level_parses() {
        let level = ranch_entrance().unwrap();
        assert_eq!(level.id, "ranch_entrance");
        assert!(level.geometry.iter().any(|g| g.collision));
    }
}

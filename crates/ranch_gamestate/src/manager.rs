//! Level registry, loading and boundary checks

use crate::error::{GameStateError, Result};
use crate::level::{BoundaryKind, EnemySpawnDef, EnvironmentDef, LevelDef, PlayerSpawn, DEFAULT_SPAWN};
use crate::progress::{Progress, Requirements};
use ranch_math::{Vec3, AABB};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A static collision box produced by level loading
#[derive(Debug, Clone, PartialEq)]
pub struct StaticBox {
    pub id: String,
    pub aabb: AABB,
}

/// Everything the game needs to hydrate a level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelPlan {
    pub level_id: String,
    pub player_spawn: PlayerSpawn,
    pub static_boxes: Vec<StaticBox>,
    pub enemy_spawns: Vec<EnemySpawnDef>,
    pub environment: Vec<EnvironmentDef>,
}

/// Result of the player entering a boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryEvent {
    /// Requirements met; load `target_level` at `target_spawn`
    Transition {
        boundary: String,
        target_level: String,
        target_spawn: String,
    },
    /// A gate boundary opened; reported once per gate
    GateOpened { gate: String },
    /// Inside a boundary whose requirements are not met
    Blocked { boundary: String },
}

/// Outcome of the player reaching an environment object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    KeycardCollected { keycard: String },
    SwitchActivated { switch: String },
    GateOpened { gate: String },
}

impl Interaction {
    /// Sound cue for the host
    pub fn sound(&self) -> &'static str {
        match self {
            Self::KeycardCollected { .. } => "keycard_pickup",
            Self::SwitchActivated { .. } => "switch_activate",
            Self::GateOpened { .. } => "gate_open",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LevelManager {
    levels: BTreeMap<String, LevelDef>,
    current: Option<String>,
    progress: Progress,
    opened_gates: BTreeSet<String>,
}

impl LevelManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_level(&mut self, level: LevelDef) {
        log::info!("Level registered: {}", level.id);
        self.levels.insert(level.id.clone(), level);
    }

    pub fn register_json(&mut self, json: &str) -> Result<String> {
        let level = LevelDef::from_json(json)?;
        let id = level.id.clone();
        self.register_level(level);
        Ok(id)
    }

    /// Register every `*.json` level in `dir`. Returns the ids loaded.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<Vec<String>> {
        let mut paths: Vec<_> = std::fs::read_dir(dir.as_ref())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().map_or(false, |ext| ext == "json"))
            .collect();
        paths.sort();

        let mut ids = Vec::with_capacity(paths.len());
        for path in paths {
            let level = LevelDef::load_from_file(&path)?;
            ids.push(level.id.clone());
            self.register_level(level);
        }
        Ok(ids)
    }

    pub fn level(&self, id: &str) -> Option<&LevelDef> {
        self.levels.get(id)
    }

    pub fn level_ids(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }

    pub fn current_level(&self) -> Option<&LevelDef> {
        self.current.as_deref().and_then(|id| self.levels.get(id))
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Make `id` current and return what to hydrate
    ///
    /// Progress (keycards, switches) carries across levels; opened gates do not.
    pub fn load_level(&mut self, id: &str, spawn: Option<&str>) -> Result<LevelPlan> {
        let level = self
            .levels
            .get(id)
            .ok_or_else(|| GameStateError::LevelNotFound(id.to_string()))?;

        let static_boxes = level
            .geometry
            .iter()
            .filter_map(|g| {
                g.collision_box().map(|aabb| StaticBox {
                    id: g.id.clone(),
                    aabb,
                })
            })
            .collect();
        let plan = LevelPlan {
            level_id: level.id.clone(),
            player_spawn: level.player_spawn(spawn.unwrap_or(DEFAULT_SPAWN)),
            static_boxes,
            enemy_spawns: level.enemy_spawns.clone(),
            environment: level.environment.clone(),
        };

        if let Some(previous) = self.current.replace(id.to_string()) {
            log::info!("Level unloaded: {}", previous);
        }
        self.progress.current_level = Some(id.to_string());
        self.opened_gates.clear();
        log::info!("Level loaded: {} ({} colliders)", id, plan.static_boxes.len());
        Ok(plan)
    }

    pub fn can_progress(&self, requirements: &Requirements) -> bool {
        self.progress.satisfies(requirements)
    }

    pub fn add_keycard(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.progress.add_keycard(id.clone()) {
            log::info!("Keycard acquired: {}", id);
        }
    }

    pub fn activate_switch(&mut self, id: impl Into<String>) {
        let id = id.into();
        if self.progress.activate_switch(id.clone()) {
            log::info!("Switch activated: {}", id);
        }
    }

    /// Let the player use an environment object
    ///
    /// Returns `None` when nothing changes: the keycard is already held, the
    /// switch is already on, the gate is open or its requirements are unmet.
    pub fn interact(&mut self, object: &EnvironmentDef) -> Option<Interaction> {
        match object {
            EnvironmentDef::Keycard { keycard_id, .. } => {
                self.progress.add_keycard(keycard_id.clone()).then(|| {
                    log::info!("Keycard acquired: {}", keycard_id);
                    Interaction::KeycardCollected {
                        keycard: keycard_id.clone(),
                    }
                })
            }
            EnvironmentDef::Switch { switch_id, .. } => {
                self.progress.activate_switch(switch_id.clone()).then(|| {
                    log::info!("Switch activated: {}", switch_id);
                    Interaction::SwitchActivated {
                        switch: switch_id.clone(),
                    }
                })
            }
            EnvironmentDef::Gate { id, requirements, .. } => {
                if self.opened_gates.contains(id) {
                    return None;
                }
                if !self.can_progress(requirements) {
                    log::trace!("Gate {} locked", id);
                    return None;
                }
                log::info!("Gate opened: {}", id);
                self.opened_gates.insert(id.clone());
                Some(Interaction::GateOpened { gate: id.clone() })
            }
            EnvironmentDef::Decoration { .. } => None,
        }
    }

    pub fn is_gate_open(&self, gate: &str) -> bool {
        self.opened_gates.contains(gate)
    }

    /// Test the player position against the current level's boundaries
    ///
    /// Returns the first event in definition order.
    pub fn check_boundaries(&mut self, position: Vec3) -> Option<BoundaryEvent> {
        let level = self.current.as_deref().and_then(|id| self.levels.get(id))?;

        for boundary in level.boundaries.iter().filter(|b| b.bounds.contains(position)) {
            match boundary.kind {
                BoundaryKind::Gate if self.opened_gates.contains(&boundary.id) => continue,
                _ if !self.progress.satisfies(&boundary.requirements) => {
                    return Some(BoundaryEvent::Blocked {
                        boundary: boundary.id.clone(),
                    });
                }
                BoundaryKind::Transition => {
                    let target_level = boundary.target_level.clone()?;
                    return Some(BoundaryEvent::Transition {
                        boundary: boundary.id.clone(),
                        target_level,
                        target_spawn: boundary
                            .target_spawn
                            .clone()
                            .unwrap_or_else(|| DEFAULT_SPAWN.to_string()),
                    });
                }
                BoundaryKind::Gate => {
                    let gate = boundary.id.clone();
                    log::info!("Gate opened: {}", gate);
                    self.opened_gates.insert(gate.clone());
                    return Some(BoundaryEvent::GateOpened { gate });
                }
            }
        }
        None
    }
}

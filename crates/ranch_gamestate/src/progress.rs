//! Player progression through gates and levels

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Keycards and switches needed to pass a gate or boundary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub keycards: Vec<String>,
    #[serde(default)]
    pub switches: Vec<String>,
}

impl Requirements {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn keycard(mut self, id: impl Into<String>) -> Self {
        self.keycards.push(id.into());
        self
    }

    pub fn switch(mut self, id: impl Into<String>) -> Self {
        self.switches.push(id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keycards.is_empty() && self.switches.is_empty()
    }
}

/// What the player has collected and activated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub keycards: BTreeSet<String>,
    pub switches: BTreeSet<String>,
    pub current_level: Option<String>,
}

impl Progress {
    pub fn satisfies(&self, requirements: &Requirements) -> bool {
        requirements.keycards.iter().all(|k| self.keycards.contains(k))
            && requirements.switches.iter().all(|s| self.switches.contains(s))
    }

    /// Returns false if the keycard was already held
    pub fn add_keycard(&mut self, id: impl Into<String>) -> bool {
        self.keycards.insert(id.into())
    }

    /// Returns false if the switch was already active
    pub fn activate_switch(&mut self, id: impl Into<String>) -> bool {
        self.switches.insert(id.into())
    }
}

//! Per-match combat statistics

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub enemies_killed: u32,
    pub shots_fired: u32,
    /// kills / shots × 100, recomputed on every kill
    pub accuracy: f32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
}

impl CombatStats {
    pub fn record_shot(&mut self) {
        self.shots_fired += 1;
    }

    pub fn record_damage_dealt(&mut self, amount: f32) {
        self.damage_dealt += amount;
    }

    pub fn record_damage_taken(&mut self, amount: f32) {
        self.damage_taken += amount;
    }

    pub fn record_kill(&mut self) {
        self.enemies_killed += 1;
        self.recompute_accuracy();
    }

    pub fn recompute_accuracy(&mut self) {
        self.accuracy = if self.shots_fired == 0 {
            0.0
        } else {
            self.enemies_killed as f32 / self.shots_fired as f32 * 100.0
        };
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

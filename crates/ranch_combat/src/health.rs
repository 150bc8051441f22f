//! Player health with a damage-immunity window

use serde::{Deserialize, Serialize};

/// Default player health
pub const DEFAULT_MAX_HEALTH: f32 = 100.0;
/// Default immunity window after a hit, in milliseconds
pub const DEFAULT_IMMUNITY_MS: f32 = 1000.0;

/// Outcome of one incoming hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitResult {
    /// Damage landed; `killed` is true only on the hit that reached 0
    Applied { amount: f32, remaining: f32, killed: bool },
    /// Dropped because the immunity window is still open
    Immune,
    /// Dropped because the player is already dead
    Dead,
}

impl HitResult {
    pub fn applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    pub fn killed(&self) -> bool {
        matches!(self, Self::Applied { killed: true, .. })
    }
}

/// Player health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerHealth {
    pub current: f32,
    pub max: f32,
    /// Length of the immunity window
    pub immunity_ms: f32,
    #[serde(skip)]
    immunity_remaining_ms: f32,
    #[serde(skip)]
    dead: bool,
}

impl PlayerHealth {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            immunity_ms: DEFAULT_IMMUNITY_MS,
            immunity_remaining_ms: 0.0,
            dead: false,
        }
    }

    pub fn with_immunity(mut self, immunity_ms: f32) -> Self {
        self.immunity_ms = immunity_ms.max(0.0);
        self
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_immune(&self) -> bool {
        self.immunity_remaining_ms > 0.0
    }

    pub fn immunity_remaining_ms(&self) -> f32 {
        self.immunity_remaining_ms
    }

    /// Health as a percentage of max
    pub fn percent(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max * 100.0
        }
    }

    /// Apply an enemy hit. Hits inside the immunity window are dropped.
    pub fn apply_hit(&mut self, amount: f32) -> HitResult {
        if self.dead {
            return HitResult::Dead;
        }
        if self.is_immune() {
            return HitResult::Immune;
        }

        let amount = amount.max(0.0);
        self.current = (self.current - amount).max(0.0);
        self.immunity_remaining_ms = self.immunity_ms;

        let killed = self.current <= 0.0;
        if killed {
            self.dead = true;
        }
        HitResult::Applied {
            amount,
            remaining: self.current,
            killed,
        }
    }

    /// Heal, clamped to max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.dead || amount <= 0.0 {
            return 0.0;
        }
        let before = self.current;
        self.current = (self.current + amount).min(self.max);
        self.current - before
    }

    /// Count the immunity window down
    pub fn update(&mut self, delta_ms: f32) {
        if self.immunity_remaining_ms > 0.0 {
            self.immunity_remaining_ms = (self.immunity_remaining_ms - delta_ms).max(0.0);
        }
    }

    /// Full health, no immunity, alive
    pub fn reset(&mut self) {
        self.current = self.max;
        self.immunity_remaining_ms = 0.0;
        self.dead = false;
    }
}

impl Default for PlayerHealth {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEALTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_starts_immunity() {
        let mut health = PlayerHealth::default();
        let hit = health.apply_hit(20.0);
        assert_eq!(
            hit,
            HitResult::Applied {
                amount: 20.0,
                remaining: 80.0,
                killed: false
            }
        );
        assert!(health.is_immune());
    }

    #[test]
    fn test_hits_inside_window_are_dropped() {
        let mut health = PlayerHealth::default();
        health.apply_hit(20.0);

        health.update(500.0);
        assert_eq!(health.apply_hit(20.0), HitResult::Immune);
        assert_eq!(health.current, 80.0);

        health.update(500.0);
        assert!(health.apply_hit(20.0).applied());
        assert_eq!(health.current, 60.0);
    }

    #[test]
    fn test_death_once() {
        let mut health = PlayerHealth::new(30.0).with_immunity(0.0);
        assert!(!health.apply_hit(20.0).killed());
        assert!(health.apply_hit(20.0).killed());
        assert_eq!(health.current, 0.0);
        assert_eq!(health.apply_hit(20.0), HitResult::Dead);
    }

    #[test]
    fn test_heal_clamps() {
        let mut health = PlayerHealth::default();
        health.apply_hit(30.0);
        assert_eq!(health.heal(50.0), 30.0);
        assert_eq!(health.current, 100.0);
        assert_eq!(health.percent(), 100.0);
    }

    #[test]
    fn test_reset() {
        let mut health = PlayerHealth::new(10.0);
        health.apply_hit(50.0);
        assert!(health.is_dead());

        health.reset();
        assert!(!health.is_dead());
        assert!(!health.is_immune());
        assert_eq!(health.current, 10.0);
    }
}

//! Match state and the win rule

use serde::{Deserialize, Serialize};

/// Default kill target for a win
pub const DEFAULT_KILL_TARGET: u32 = 25;

/// Match states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Level being hydrated
    #[default]
    Loading,
    Menu,
    Playing,
    Paused,
    /// Win rule met
    Won,
    /// Player died
    GameOver,
}

impl GameState {
    /// Simulation advances only while playing
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Match over; only a restart leaves these
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Won | Self::GameOver)
    }
}

/// A recorded state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: GameState,
    pub to: GameState,
}

/// Tracks the match state and its history
#[derive(Debug, Clone, Default)]
pub struct GameStateManager {
    current: GameState,
    history: Vec<StateTransition>,
}

impl GameStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> GameState {
        self.current
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Change state. Finished matches refuse everything but `Loading`.
    pub fn set(&mut self, to: GameState) -> bool {
        if self.current == to {
            return false;
        }
        if self.current.is_finished() && to != GameState::Loading {
            log::debug!("Ignoring {:?} after match end", to);
            return false;
        }
        log::info!("Game state: {:?} -> {:?}", self.current, to);
        self.history.push(StateTransition {
            from: self.current,
            to,
        });
        self.current = to;
        true
    }

    /// Playing <-> Paused; any other state is left alone
    pub fn toggle_pause(&mut self) -> GameState {
        match self.current {
            GameState::Playing => {
                self.set(GameState::Paused);
            }
            GameState::Paused => {
                self.set(GameState::Playing);
            }
            _ => {}
        }
        self.current
    }
}

/// Kill target plus a cleared field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRule {
    pub kill_target: u32,
}

impl WinRule {
    pub fn new(kill_target: u32) -> Self {
        Self { kill_target }
    }

    pub fn is_met(&self, kills: u32, active_enemies: usize) -> bool {
        kills >= self.kill_target && active_enemies == 0
    }
}

impl Default for WinRule {
    fn default() -> Self {
        Self::new(DEFAULT_KILL_TARGET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_pause() {
        let mut states = GameStateManager::new();
        assert_eq!(states.toggle_pause(), GameState::Loading);

        states.set(GameState::Playing);
        assert_eq!(states.toggle_pause(), GameState::Paused);
        assert_eq!(states.toggle_pause(), GameState::Playing);
        assert_eq!(states.history().len(), 3);
    }

    #[test]
    fn test_finished_is_sticky() {
        let mut states = GameStateManager::new();
        states.set(GameState::Playing);
        states.set(GameState::GameOver);
        assert!(!states.set(GameState::Playing));
        assert_eq!(states.toggle_pause(), GameState::GameOver);
        assert!(states.set(GameState::Loading));
    }

    #[test]
    fn test_win_rule() {
        let rule = WinRule::default();
        assert!(!rule.is_met(24, 0));
        assert!(!rule.is_met(25, 1));
        assert!(rule.is_met(25, 0));
        assert!(rule.is_met(30, 0));
    }
}

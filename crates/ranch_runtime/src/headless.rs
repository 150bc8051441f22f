//! Services for running without a window
//!
//! Nothing is drawn. Sounds go to the log and an autopilot stands in for
//! the player.

use ranch_game::{AudioSink, InputSource, ACTION_FIRE, KEY_RELOAD};
use ranch_math::Vec3;
use std::cell::Cell;
use std::rc::Rc;

/// Logs every sound at debug level
#[derive(Debug, Default)]
pub struct LogAudio {
    played: Rc<Cell<u64>>,
}

impl LogAudio {
    /// Shared count of sounds played
    pub fn counter(&self) -> Rc<Cell<u64>> {
        self.played.clone()
    }
}

impl AudioSink for LogAudio {
    fn play_sound(&mut self, name: &str, position: Option<Vec3>) {
        self.played.set(self.played.get() + 1);
        match position {
            Some(p) => log::debug!("Sound {} at ({:.1}, {:.1}, {:.1})", name, p.x, p.y, p.z),
            None => log::debug!("Sound {}", name),
        }
    }
}

/// Sweeps its aim around the player and pulls the trigger on a duty cycle
///
/// Reads the frame number from a shared clock the runner advances.
#[derive(Debug)]
pub struct Autopilot {
    clock: Rc<Cell<u64>>,
    fire_every: u64,
    reload_every: u64,
    /// Radians per frame
    sweep_rate: f32,
}

impl Autopilot {
    pub fn new(clock: Rc<Cell<u64>>) -> Self {
        Self {
            clock,
            fire_every: 10,
            reload_every: 240,
            sweep_rate: 0.02,
        }
    }

    fn every(&self, n: u64) -> bool {
        n > 0 && self.clock.get() % n == 0
    }
}

impl InputSource for Autopilot {
    fn get_action(&self, action: &str) -> bool {
        action == ACTION_FIRE && self.every(self.fire_every)
    }

    fn is_key_pressed(&self, key: &str) -> bool {
        key == KEY_RELOAD && self.every(self.reload_every)
    }

    fn aim(&self) -> Option<Vec3> {
        let yaw = self.clock.get() as f32 * self.sweep_rate;
        Some(Vec3::new(yaw.sin(), 0.0, yaw.cos()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autopilot_duty_cycle() {
        let clock = Rc::new(Cell::new(0));
        let pilot = Autopilot::new(clock.clone());
        assert!(pilot.get_action(ACTION_FIRE));
        assert!(!pilot.get_action("jump"));

        clock.set(5);
        assert!(!pilot.get_action(ACTION_FIRE));
        assert!(!pilot.is_key_pressed(KEY_RELOAD));

        clock.set(240);
        assert!(pilot.get_action(ACTION_FIRE));
        assert!(pilot.is_key_pressed(KEY_RELOAD));
    }

    #[test]
    fn test_aim_stays_flat_and_unit() {
        let clock = Rc::new(Cell::new(77));
        let aim = Autopilot::new(clock).aim().unwrap();
        assert_eq!(aim.y, 0.0);
        assert!((aim.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_log_audio_counts() {
        let mut audio = LogAudio::default();
        let played = audio.counter();
        audio.play_sound("gunshot", Some(Vec3::ZERO));
        audio.play_sound("reload", None);
        assert_eq!(played.get(), 2);
    }
}

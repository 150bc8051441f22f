//! Kill rewards
//!
//! One uniform draw in `[0, 1)` is compared against cumulative thresholds:
//! 30% rifle ammo, 20% shotgun ammo, 10% TNT, 40% nothing.

use crate::weapon::WeaponKind;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ammo granted for a kill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub weapon: WeaponKind,
    pub amount: u32,
}

/// One band of the reward table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardBand {
    /// Cumulative upper bound (exclusive)
    pub threshold: f32,
    pub reward: Reward,
}

/// Cumulative reward bands; draws past the last band give nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTable {
    bands: Vec<RewardBand>,
}

impl RewardTable {
    pub fn new(bands: Vec<RewardBand>) -> Self {
        let mut bands = bands;
        bands.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
        Self { bands }
    }

    pub fn bands(&self) -> &[RewardBand] {
        &self.bands
    }

    /// Reward for a draw in `[0, 1)`
    pub fn pick(&self, draw: f32) -> Option<Reward> {
        self.bands
            .iter()
            .find(|band| draw < band.threshold)
            .map(|band| band.reward)
    }

    pub fn roll(&self, rng: &mut impl Rng) -> Option<Reward> {
        self.pick(rng.gen::<f32>())
    }
}

impl Default for RewardTable {
    fn default() -> Self {
        let band = |threshold, weapon, amount| RewardBand {
            threshold,
            reward: Reward { weapon, amount },
        };
        Self::new(vec![
            band(0.3, WeaponKind::Rifle, 10),
            band(0.5, WeaponKind::Shotgun, 5),
            band(0.6, WeaponKind::Tnt, 1),
        ])
    }
}

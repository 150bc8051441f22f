//! Scene adapters for the combat and AI systems
//!
//! The rules live in `ranch_combat` and `ranch_ai`; the impls here feed
//! them what they need from the frame and turn their results into
//! scene commands.

mod combat;
mod enemy;
mod projectile;
mod weapons;

pub use combat::{
    CombatManager, CombatPair, CombatSignal, DelayedEvent, PlayerHealthInfo, ACTION_FIRE, KEY_RELOAD,
    MUZZLE_OFFSET, WEAPON_KEYS,
};
pub use projectile::projectile_commands;

//! Wild boar behavior
//!
//! Patrol wanders in a random direction, charge runs a zig-zag at the
//! player and attacks in range, death is terminal and despawns the boar
//! after the death delay. The AI never moves anything itself: `update`
//! returns the velocity and actions for the owner to apply.

use crate::state_machine::{State, StateChange, StateMachine};
use rand::Rng;
use ranch_math::consts::TAU;
use ranch_math::Vec3;
use serde::{Deserialize, Serialize};

/// Enemy FSM states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    Patrol,
    Charge,
    Death,
}

impl EnemyState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Patrol => "patrol",
            Self::Charge => "charge",
            Self::Death => "death",
        }
    }
}

impl State for EnemyState {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Death)
    }
}

/// Boar model variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyVariant {
    V1,
    V2,
}

impl EnemyVariant {
    pub fn model_name(self) -> &'static str {
        match self {
            Self::V1 => "boar_v1",
            Self::V2 => "boar_v2",
        }
    }

    /// Variant from its level-data number (1 or 2)
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::V1),
            2 => Some(Self::V2),
            _ => None,
        }
    }
}

/// Sounds an enemy asks its owner to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyCue {
    Grunt,
    Attack,
    Death,
}

impl EnemyCue {
    pub fn name(self) -> &'static str {
        match self {
            Self::Grunt => "boar_grunt",
            Self::Attack => "boar_attack",
            Self::Death => "boar_death",
        }
    }
}

/// Enemy tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    pub max_health: f32,
    /// Units per second
    pub patrol_speed: f32,
    /// Units per second
    pub charge_speed: f32,
    pub attack_damage: f32,
    pub aggro_range: f32,
    pub attack_range: f32,
    /// Charge gives up beyond `aggro_range * deaggro_factor`
    pub deaggro_factor: f32,
    pub zigzag_interval_ms: f32,
    pub zigzag_intensity: f32,
    pub zigzag_blend: f32,
    pub death_delay_ms: f32,
    pub patrol_dwell_ms: (f32, f32),
    pub wall_dwell_ms: (f32, f32),
    pub grunt_cooldown_ms: f32,
    pub grunt_chance: f32,
    /// Magnitude of the push applied to the player on attack
    pub knockback: f32,
    pub collider_radius: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            max_health: 50.0,
            patrol_speed: 3.0,
            charge_speed: 8.0,
            attack_damage: 20.0,
            aggro_range: 15.0,
            attack_range: 2.0,
            deaggro_factor: 1.5,
            zigzag_interval_ms: 500.0,
            zigzag_intensity: 2.0,
            zigzag_blend: 0.3,
            death_delay_ms: 2000.0,
            patrol_dwell_ms: (2000.0, 5000.0),
            wall_dwell_ms: (1000.0, 3000.0),
            grunt_cooldown_ms: 3000.0,
            grunt_chance: 0.3,
            knockback: 5.0,
            collider_radius: 1.0,
        }
    }
}

/// What the AI perceives this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiInput {
    pub position: Vec3,
    pub player_position: Vec3,
    /// Touching environment geometry
    pub hit_wall: bool,
}

/// An attack on the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attack {
    pub damage: f32,
    /// Push-back on the player, away from the enemy
    pub push: Vec3,
}

/// What the AI wants done this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiOutput {
    /// Units per second
    pub velocity: Vec3,
    /// Point to face, if the facing should change
    pub face_towards: Option<Vec3>,
    pub attack: Option<Attack>,
    /// Death delay elapsed; the owner should be destroyed
    pub despawn: bool,
    pub cues: Vec<EnemyCue>,
    pub state_change: Option<StateChange<EnemyState>>,
}

/// Result of [`EnemyAi::take_damage`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageTaken {
    /// Health actually removed
    pub dealt: f32,
    pub remaining: f32,
    /// This hit was the lethal one
    pub killed: bool,
}

struct Senses {
    distance_to_player: f32,
}

/// Per-enemy AI component
#[derive(Debug)]
pub struct EnemyAi {
    pub variant: EnemyVariant,
    pub stats: EnemyStats,
    health: f32,
    fsm: StateMachine<EnemyState, Senses>,
    patrol_direction: Vec3,
    patrol_remaining_ms: f32,
    zigzag_elapsed_ms: f32,
    zigzag_sign: f32,
    grunt_elapsed_ms: f32,
    last_player_position: Vec3,
    death_cue_pending: bool,
    despawned: bool,
}

impl EnemyAi {
    pub fn new(variant: EnemyVariant) -> Self {
        Self::with_stats(variant, EnemyStats::default())
    }

    pub fn with_stats(variant: EnemyVariant, stats: EnemyStats) -> Self {
        let aggro = stats.aggro_range;
        let deaggro = stats.aggro_range * stats.deaggro_factor;

        let mut fsm = StateMachine::new(EnemyState::Patrol);
        fsm.add_transition(EnemyState::Patrol, EnemyState::Charge, move |s: &Senses| {
            s.distance_to_player <= aggro
        });
        fsm.add_transition(EnemyState::Charge, EnemyState::Patrol, move |s: &Senses| {
            s.distance_to_player > deaggro
        });

        Self {
            variant,
            health: stats.max_health,
            stats,
            fsm,
            patrol_direction: Vec3::Z,
            patrol_remaining_ms: 0.0,
            zigzag_elapsed_ms: 0.0,
            zigzag_sign: 1.0,
            grunt_elapsed_ms: 0.0,
            last_player_position: Vec3::ZERO,
            death_cue_pending: false,
            despawned: false,
        }
    }

    pub fn state(&self) -> EnemyState {
        self.fsm.current()
    }

    pub fn time_in_state_ms(&self) -> f32 {
        self.fsm.time_in_state_ms()
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.stats.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.fsm.current() != EnemyState::Death
    }

    pub fn patrol_direction(&self) -> Vec3 {
        self.patrol_direction
    }

    pub fn zigzag_sign(&self) -> f32 {
        self.zigzag_sign
    }

    /// Pick the first patrol heading and dwell time
    pub fn start_patrol(&mut self, rng: &mut impl Rng) {
        self.pick_patrol(rng, self.stats.patrol_dwell_ms);
    }

    /// Apply damage
    ///
    /// Health clamps at 0 and reaching it forces death. Nonzero damage
    /// during patrol provokes a charge. Dead enemies ignore damage.
    pub fn take_damage(&mut self, amount: f32) -> DamageTaken {
        if !self.is_alive() {
            return DamageTaken {
                dealt: 0.0,
                remaining: 0.0,
                killed: false,
            };
        }

        let dealt = amount.max(0.0).min(self.health);
        self.health -= dealt;
        log::debug!(
            "{} takes {:.1} damage, health {:.1}/{:.1}",
            self.variant.model_name(),
            dealt,
            self.health,
            self.stats.max_health
        );

        let killed = self.health <= 0.0;
        if killed {
            self.health = 0.0;
            self.fsm.force_transition(EnemyState::Death);
            self.death_cue_pending = true;
        } else if dealt > 0.0 && self.fsm.is_in(EnemyState::Patrol) {
            self.fsm.force_transition(EnemyState::Charge);
        }

        DamageTaken {
            dealt,
            remaining: self.health,
            killed,
        }
    }

    /// Run one AI tick
    pub fn update(&mut self, input: &AiInput, delta_ms: f32, rng: &mut impl Rng) -> AiOutput {
        let mut out = AiOutput::default();

        if self.death_cue_pending {
            self.death_cue_pending = false;
            out.cues.push(EnemyCue::Death);
        }

        let senses = Senses {
            distance_to_player: input.position.distance(input.player_position),
        };
        out.state_change = self.fsm.update(&senses, delta_ms);
        if let Some(change) = out.state_change {
            log::debug!(
                "{} state: {} -> {}",
                self.variant.model_name(),
                change.from.name(),
                change.to.name()
            );
            if change.to == EnemyState::Patrol {
                self.pick_patrol(rng, self.stats.patrol_dwell_ms);
            }
        }

        match self.fsm.current() {
            EnemyState::Patrol => self.patrol(input, delta_ms, rng, &mut out),
            EnemyState::Charge => self.charge(input, senses.distance_to_player, delta_ms, &mut out),
            EnemyState::Death => {
                if !self.despawned && self.fsm.time_in_state_ms() >= self.stats.death_delay_ms {
                    self.despawned = true;
                    out.despawn = true;
                }
                return out;
            }
        }

        self.grunt_elapsed_ms += delta_ms;
        if self.grunt_elapsed_ms >= self.stats.grunt_cooldown_ms && rng.gen::<f32>() < self.stats.grunt_chance {
            self.grunt_elapsed_ms = 0.0;
            out.cues.push(EnemyCue::Grunt);
        }
        out
    }

    fn patrol(&mut self, input: &AiInput, delta_ms: f32, rng: &mut impl Rng, out: &mut AiOutput) {
        self.patrol_remaining_ms -= delta_ms;
        if self.patrol_remaining_ms <= 0.0 {
            self.pick_patrol(rng, self.stats.patrol_dwell_ms);
        }

        if input.hit_wall {
            self.patrol_direction = -self.patrol_direction;
            self.patrol_remaining_ms = dwell(rng, self.stats.wall_dwell_ms);
        }

        out.velocity = self.patrol_direction * self.stats.patrol_speed;
        out.face_towards = Some(input.position + self.patrol_direction);
    }

    fn charge(&mut self, input: &AiInput, distance: f32, delta_ms: f32, out: &mut AiOutput) {
        self.last_player_position = input.player_position;
        let to_player = (self.last_player_position - input.position).flat().normalize_or_zero();

        self.zigzag_elapsed_ms += delta_ms;
        if self.zigzag_elapsed_ms >= self.stats.zigzag_interval_ms {
            self.zigzag_sign = -self.zigzag_sign;
            self.zigzag_elapsed_ms = 0.0;
        }

        if input.hit_wall {
            self.zigzag_sign = -self.zigzag_sign;
            self.zigzag_elapsed_ms = 0.0;
        }

        let lateral = Vec3::new(-to_player.z, 0.0, to_player.x) * (self.zigzag_sign * self.stats.zigzag_intensity);
        let heading = to_player + lateral * self.stats.zigzag_blend;

        out.velocity = heading * self.stats.charge_speed;
        out.face_towards = Some(self.last_player_position);

        if distance <= self.stats.attack_range {
            let push = (input.player_position - input.position).flat().normalize_or_zero() * self.stats.knockback;
            out.attack = Some(Attack {
                damage: self.stats.attack_damage,
                push,
            });
            out.cues.push(EnemyCue::Attack);
        }
    }

    fn pick_patrol(&mut self, rng: &mut impl Rng, range: (f32, f32)) {
        let angle = rng.gen::<f32>() * TAU;
        self.patrol_direction = Vec3::new(angle.sin(), 0.0, angle.cos());
        self.patrol_remaining_ms = dwell(rng, range);
    }
}

fn dwell(rng: &mut impl Rng, (min, max): (f32, f32)) -> f32 {
    if max <= min {
        min
    } else {
        rng.gen_range(min..max)
    }
}

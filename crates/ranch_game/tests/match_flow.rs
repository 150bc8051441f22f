use approx::assert_relative_eq;
use ranch_ai::{EnemyState, EnemyVariant};
use ranch_combat::{Projectile, Weapon, WeaponKind, WeaponStats, WeaponSystem};
use ranch_game::prelude::*;
use ranch_gamestate::GameState;
use ranch_math::{Mat4, Vec3};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

#[derive(Default)]
struct Pressed {
    actions: HashSet<&'static str>,
    keys: HashSet<&'static str>,
    movement: Vec3,
}

#[derive(Clone, Default)]
struct ScriptedInput(Rc<RefCell<Pressed>>);

impl ScriptedInput {
    fn action(&self, name: &'static str, down: bool) {
        let mut pressed = self.0.borrow_mut();
        if down {
            pressed.actions.insert(name);
        } else {
            pressed.actions.remove(name);
        }
    }

    fn key(&self, code: &'static str, down: bool) {
        let mut pressed = self.0.borrow_mut();
        if down {
            pressed.keys.insert(code);
        } else {
            pressed.keys.remove(code);
        }
    }
}

impl InputSource for ScriptedInput {
    fn get_action(&self, action: &str) -> bool {
        self.0.borrow().actions.contains(action)
    }

    fn is_key_pressed(&self, key: &str) -> bool {
        self.0.borrow().keys.contains(key)
    }

    fn movement(&self) -> Vec3 {
        self.0.borrow().movement
    }
}

#[derive(Clone, Default)]
struct RecordingAudio(Rc<RefCell<Vec<String>>>);

impl RecordingAudio {
    fn played(&self, name: &str) -> usize {
        self.0.borrow().iter().filter(|n| n.as_str() == name).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play_sound(&mut self, name: &str, _position: Option<Vec3>) {
        self.0.borrow_mut().push(name.to_string());
    }
}

#[derive(Clone, Default)]
struct RecordingRenderer(Rc<RefCell<Vec<String>>>);

impl Renderer for RecordingRenderer {
    fn render_mesh(&mut self, mesh: &str, _texture: Option<&str>, _model: &Mat4) {
        self.0.borrow_mut().push(mesh.to_string());
    }
}

/// No automatic spawns, fixed seed
fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.enemy.spawn_cooldown_ms = 1.0e9;
    config.simulation.seed = 7;
    config
}

struct Harness {
    game: Game,
    input: ScriptedInput,
    audio: RecordingAudio,
    renderer: RecordingRenderer,
}

impl Harness {
    fn new(config: GameConfig) -> Self {
        let input = ScriptedInput::default();
        let audio = RecordingAudio::default();
        let renderer = RecordingRenderer::default();
        let services = Services::headless()
            .with_input(input.clone())
            .with_audio(audio.clone())
            .with_renderer(renderer.clone());
        let mut game = Game::new(config, services).unwrap();
        assert!(game.world_mut().start());
        Self {
            game,
            input,
            audio,
            renderer,
        }
    }

    fn world(&mut self) -> &mut GameWorld {
        self.game.world_mut()
    }

    fn run(&mut self, frames: usize) {
        for _ in 0..frames {
            self.game.tick(16.0);
        }
    }
}

#[test]
fn test_rifle_shot_provokes_charge() {
    let mut h = Harness::new(quiet_config());
    h.world().set_player_position(Vec3::new(0.0, 1.0, 0.0));
    h.world().set_aim(Vec3::Z);
    let boar = h.world().spawn_enemy(Vec3::new(0.0, 0.0, 20.0), EnemyVariant::V1).unwrap();
    assert_eq!(h.world().enemy(boar).unwrap().state(), EnemyState::Patrol);

    h.input.action(ACTION_FIRE, true);
    h.run(1);
    h.input.action(ACTION_FIRE, false);
    assert_eq!(h.world().weapons().unwrap().ammo(WeaponKind::Rifle), 29);
    assert_eq!(h.audio.played("gunshot"), 1);

    for _ in 0..40 {
        if h.world().enemy(boar).unwrap().health() < 50.0 {
            break;
        }
        h.run(1);
    }

    let ai = h.world().enemy(boar).unwrap();
    assert_relative_eq!(ai.health(), 25.0);
    assert_eq!(ai.state(), EnemyState::Charge);
    assert_eq!(h.audio.played("enemy_hit"), 1);

    h.run(1);
    assert!(h.world().scene().ids_with::<Projectile>().is_empty());
    let stats = h.world().combat().unwrap().stats().clone();
    assert_eq!(stats.shots_fired, 1);
    assert_relative_eq!(stats.damage_dealt, 25.0);
}

#[test]
fn test_dead_boar_despawns_after_delay() {
    let mut h = Harness::new(quiet_config());
    let signals = h.world().subscribe().unwrap();
    let boar = h.world().spawn_enemy(Vec3::new(0.0, 0.0, 45.0), EnemyVariant::V2).unwrap();

    let first = h.world().damage_enemy(boar, 25.0).unwrap();
    assert_relative_eq!(first.remaining, 25.0);
    let second = h.world().damage_enemy(boar, 25.0).unwrap();
    assert!(second.killed);
    assert_eq!(h.world().enemy(boar).unwrap().state(), EnemyState::Death);
    assert!(h.world().scene().get(boar).unwrap().collider().is_none());
    assert_eq!(h.world().combat().unwrap().stats().enemies_killed, 1);
    assert!(matches!(
        signals.try_recv(),
        Ok(CombatSignal::EnemyKilled { total_kills: 1, .. })
    ));

    // Corpse lingers through most of the death delay
    h.run(100);
    assert!(h.world().scene().contains(boar));

    h.run(40);
    assert!(!h.world().scene().contains(boar));
    assert_eq!(h.world().enemy_manager().unwrap().enemy_count(), 0);
}

#[test]
fn test_empty_rifle_clicks() {
    let mut h = Harness::new(quiet_config());
    let mut empty = WeaponStats::for_kind(WeaponKind::Rifle);
    empty.starting_ammo = 0;
    *h.world().weapons_mut().unwrap() = WeaponSystem::with_weapons([Weapon::with_stats(WeaponKind::Rifle, empty)]);

    h.input.action(ACTION_FIRE, true);
    h.run(1);

    assert!(h.world().scene().ids_with::<Projectile>().is_empty());
    assert_eq!(h.audio.played("empty_click"), 1);
    assert_eq!(h.world().combat().unwrap().stats().shots_fired, 0);
    assert_eq!(h.world().weapons().unwrap().current().unwrap().last_fire_ms(), None);
}

#[test]
fn test_contact_damage_respects_immunity() {
    let mut h = Harness::new(quiet_config());
    let signals = h.world().subscribe().unwrap();
    let player = h.world().player_position().unwrap();
    h.world()
        .spawn_enemy(Vec3::new(player.x, 0.0, player.z + 1.0), EnemyVariant::V1)
        .unwrap();

    h.run(1);
    let health = h.world().combat().unwrap().player_health();
    assert_relative_eq!(health.current, 80.0);
    assert!(health.immune);
    assert_eq!(h.audio.played("player_hurt"), 1);

    h.run(30);
    assert_relative_eq!(h.world().combat().unwrap().player_health().current, 80.0);
    let damaged = signals
        .try_iter()
        .filter(|s| matches!(s, CombatSignal::PlayerDamaged { .. }))
        .count();
    assert_eq!(damaged, 1);
}

#[test]
fn test_player_death_ends_match_once() {
    let mut config = quiet_config();
    config.combat.player_max_health = 20.0;
    let mut h = Harness::new(config);
    let signals = h.world().subscribe().unwrap();
    let player = h.world().player_position().unwrap();
    h.world()
        .spawn_enemy(Vec3::new(player.x, 0.0, player.z + 1.0), EnemyVariant::V1)
        .unwrap();

    h.run(1);
    assert_eq!(h.world().state(), GameState::GameOver);
    assert!(h.world().combat().unwrap().is_player_dead());

    h.run(120);
    let deaths = signals
        .try_iter()
        .filter(|s| matches!(s, CombatSignal::PlayerDied { .. }))
        .count();
    assert_eq!(deaths, 1);
    assert_eq!(h.world().state(), GameState::GameOver);
    assert!(!h.world().start());

    h.world().restart().unwrap();
    assert_eq!(h.world().state(), GameState::Playing);
    assert_relative_eq!(h.world().combat().unwrap().player_health().current, 20.0);
    assert_eq!(h.world().enemy_manager().unwrap().enemy_count(), 0);
}

#[test]
fn test_pause_freezes_simulation() {
    let mut h = Harness::new(quiet_config());
    let boar = h.world().spawn_enemy(Vec3::new(30.0, 0.0, 30.0), EnemyVariant::V1).unwrap();
    h.run(5);

    h.input.key(KEY_PAUSE, true);
    h.run(1);
    assert_eq!(h.world().state(), GameState::Paused);
    // Holding the key does not toggle again
    h.run(1);
    assert_eq!(h.world().state(), GameState::Paused);
    h.input.key(KEY_PAUSE, false);

    let frozen = h.world().scene().get(boar).unwrap().position();
    h.run(30);
    assert_eq!(h.world().scene().get(boar).unwrap().position(), frozen);

    h.input.key(KEY_PAUSE, true);
    h.run(1);
    assert_eq!(h.world().state(), GameState::Playing);
}

#[test]
fn test_weapon_keys_and_reload() {
    let mut h = Harness::new(quiet_config());
    h.input.key("Digit2", true);
    h.run(1);
    h.input.key("Digit2", false);
    assert_eq!(h.world().weapons().unwrap().current_kind(), Some(WeaponKind::Shotgun));

    h.input.action(ACTION_FIRE, true);
    h.run(1);
    h.input.action(ACTION_FIRE, false);
    let pellets = h.world().scene().ids_with::<Projectile>().len();
    assert_eq!(pellets, 6);
    assert_eq!(h.world().weapons().unwrap().ammo(WeaponKind::Shotgun), 11);
}

#[test]
fn test_reload_refills_clip_when_done() {
    let mut h = Harness::new(quiet_config());
    let mut low = WeaponStats::for_kind(WeaponKind::Rifle);
    low.starting_ammo = 4;
    *h.world().weapons_mut().unwrap() = WeaponSystem::with_weapons([Weapon::with_stats(WeaponKind::Rifle, low)]);

    h.input.key(KEY_RELOAD, true);
    h.run(1);
    h.input.key(KEY_RELOAD, false);
    assert_eq!(h.audio.played("reload"), 1);
    assert!(h.world().weapons().unwrap().current().unwrap().is_reloading());
    assert_eq!(h.world().weapons().unwrap().ammo(WeaponKind::Rifle), 4);

    // 1500 ms reload
    h.run(95);
    assert!(!h.world().weapons().unwrap().current().unwrap().is_reloading());
    assert_eq!(h.world().weapons().unwrap().ammo(WeaponKind::Rifle), 8);
}

#[test]
fn test_level_load_builds_static_geometry() {
    let mut h = Harness::new(quiet_config());
    h.world().spawn_enemy(Vec3::new(5.0, 0.0, 5.0), EnemyVariant::V1).unwrap();
    h.world().load_level("ranch_entrance", None).unwrap();

    let world = h.world();
    assert_eq!(world.state(), GameState::Playing);
    assert_eq!(world.enemy_manager().unwrap().enemy_count(), 0);
    assert_eq!(world.enemy_manager().unwrap().spawn_points().len(), 4);
    // Player, seven static boxes, the gate and the keycard
    assert_eq!(world.scene().len(), 10);
    assert_eq!(world.physics().collider_count(), 10);
    assert_eq!(
        world.scene().iter().filter(|(_, e)| e.is_static()).count(),
        9
    );
    assert_eq!(world.interactables().count(), 2);

    assert!(world.load_level("ranch_pasture", None).is_err());
    assert_eq!(world.state(), GameState::Playing);
}

#[test]
fn test_render_stage_draws_meshes() {
    let mut h = Harness::new(quiet_config());
    h.world().spawn_enemy(Vec3::new(30.0, 0.0, 30.0), EnemyVariant::V2).unwrap();
    h.run(2);

    let drawn = h.renderer.0.borrow();
    assert_eq!(drawn.iter().filter(|m| m.as_str() == "boar_v2").count(), 2);
    assert_eq!(h.game.scheduler().time().frame, 2);
}

#[test]
fn test_long_frames_are_clamped() {
    let mut h = Harness::new(quiet_config());
    let time = h.game.tick(1000.0);
    assert_relative_eq!(time.delta_ms, 50.0);
    assert_eq!(h.game.scheduler().stats().clamped_frames, 1);
}

const GATED_YARD: &str = r#"{
    "id": "yard", "name": "Yard",
    "spawn_points": { "default": { "position": [0, 1, 0] } },
    "environment": [
        { "type": "keycard", "id": "red_keycard", "keycard_id": "red", "position": [6, 1, 0] },
        { "type": "switch", "id": "pump_lever", "switch_id": "pump", "position": [0, 1, 6] },
        { "type": "gate", "id": "pen_gate", "position": [0, 1, -6],
          "requirements": { "switches": ["pump"] } },
        { "type": "decoration", "id": "scarecrow", "position": [-6, 1, 0] }
    ],
    "boundaries": [
        { "id": "to_field", "type": "transition", "target_level": "field", "target_spawn": "from_yard",
          "bounds": { "min_x": -30, "max_x": -20, "min_y": 0, "max_y": 5, "min_z": -10, "max_z": 10 },
          "requirements": { "keycards": ["red"] } }
    ]
}"#;

const FIELD: &str = r#"{
    "id": "field", "name": "Field",
    "spawn_points": { "from_yard": { "position": [40, 1, 0] } }
}"#;

fn gated_yard() -> Harness {
    let mut h = Harness::new(quiet_config());
    h.world().levels_mut().register_json(GATED_YARD).unwrap();
    h.world().levels_mut().register_json(FIELD).unwrap();
    h.world().load_level("yard", None).unwrap();
    h
}

fn current_level(h: &mut Harness) -> String {
    h.world().levels().current_level().unwrap().id.clone()
}

#[test]
fn test_keycard_pickup_unlocks_transition() {
    let mut h = gated_yard();
    assert_eq!(h.world().interactables().count(), 3);

    let exit = Vec3::new(-25.0, 1.0, 0.0);
    h.world().set_player_position(exit);
    h.run(1);
    assert_eq!(current_level(&mut h), "yard");

    h.world().set_player_position(Vec3::new(6.0, 1.0, 0.0));
    h.run(2);
    assert!(h.world().levels().progress().keycards.contains("red"));
    assert_eq!(h.audio.played("keycard_pickup"), 1);
    assert_eq!(h.world().interactables().count(), 2);

    h.world().set_player_position(exit);
    h.run(1);
    assert_eq!(current_level(&mut h), "field");
    assert_eq!(h.world().player_position(), Some(Vec3::new(40.0, 1.0, 0.0)));
    assert_eq!(h.world().interactables().count(), 0);
}

#[test]
fn test_gate_opens_once_switch_is_thrown() {
    let mut h = gated_yard();
    let gate = Vec3::new(0.0, 1.0, -6.0);

    h.world().set_player_position(gate);
    h.run(1);
    assert!(!h.world().levels().is_gate_open("pen_gate"));
    assert_eq!(h.audio.played("gate_open"), 0);

    h.world().set_player_position(Vec3::new(0.0, 1.0, 6.0));
    h.run(3);
    assert!(h.world().levels().progress().switches.contains("pump"));
    assert_eq!(h.audio.played("switch_activate"), 1);

    h.world().set_player_position(gate);
    h.run(3);
    assert!(h.world().levels().is_gate_open("pen_gate"));
    assert_eq!(h.audio.played("gate_open"), 1);
}

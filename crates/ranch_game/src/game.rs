//! Game integration
//!
//! [`GameWorld`] owns the scene, the collision world, level progress and
//! the match state, and implements the frame stages. [`Game`] pairs it with
//! a [`FrameScheduler`].
//!
//! The player entity carries the `WeaponSystem`, `EnemyManager` and
//! `CombatManager` components. Everything the components ask for during
//! the logic stage is applied once the scene walk is over; collision
//! pairs are resolved in the reconcile stage.
//!
//! Gates, switches and keycards become static trigger spheres on the
//! pickup layer; touching one hands it to the level manager.

use crate::components::{
    projectile_commands, CombatManager, CombatPair, CombatSignal, ACTION_FIRE, KEY_RELOAD, WEAPON_KEYS,
};
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::scene::{Command, Commands, EnemySnapshot, Entity, FrameInput, FrameView, Scene};
use crate::scheduler::{FrameScheduler, FrameStages, FrameTime};
use crate::services::Services;
use crossbeam_channel::Receiver;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ranch_ai::{Attack, DamageTaken, EnemyAi, EnemyManager, EnemyStats, EnemyVariant, SpawnPoint, SpawnRequest};
use ranch_combat::{DamageInfo, HitResult, Projectile, ProjectileSpawn, WeaponSystem, PROJECTILE_RADIUS};
use ranch_core::Id;
use ranch_gamestate::{
    ranch_entrance, BoundaryEvent, EnvironmentDef, GameState, GameStateManager, Interaction, LevelManager,
    LevelPlan, WinRule, DEFAULT_PLAYER_SPAWN, INTERACTION_RANGE,
};
use ranch_math::Vec3;
use ranch_physics::{ColliderDesc, ColliderHandle, CollisionEvent, CollisionLayer, CollisionWorld};
use std::collections::BTreeMap;

/// Pause toggle key code
pub const KEY_PAUSE: &str = "Escape";
pub const PLAYER_NAME: &str = "player";
pub const PLAYER_RADIUS: f32 = 0.5;
pub const PLAYER_HEIGHT: f32 = 1.8;
const BOAR_TEXTURE: &str = "boar.png";

pub struct GameWorld {
    config: GameConfig,
    scene: Scene,
    physics: CollisionWorld,
    levels: LevelManager,
    state: GameStateManager,
    win_rule: WinRule,
    rng: StdRng,
    services: Services,
    player: Option<Id>,
    interactables: BTreeMap<Id, EnvironmentDef>,
    input: FrameInput,
    pause_held: bool,
    aim: Vec3,
    knockback: Vec3,
    enemies: EnemySnapshot,
    commands: Commands,
    events: Vec<CollisionEvent>,
}

impl GameWorld {
    /// Build a world with the player at the default spawn
    ///
    /// The bundled `ranch_entrance` level is registered but not loaded.
    /// The match starts in `Loading`; call [`GameWorld::start`] or
    /// [`GameWorld::load_level`] to begin playing.
    pub fn new(config: GameConfig, services: Services) -> Result<Self> {
        config.validate()?;
        let mut world = Self {
            scene: Scene::new(),
            physics: CollisionWorld::new(config.physics.clone()),
            levels: LevelManager::new(),
            state: GameStateManager::new(),
            win_rule: WinRule::new(config.combat.kill_target),
            rng: StdRng::seed_from_u64(config.simulation.seed),
            services,
            player: None,
            interactables: BTreeMap::new(),
            input: FrameInput::default(),
            pause_held: false,
            aim: Vec3::Z,
            knockback: Vec3::ZERO,
            enemies: EnemySnapshot::new(),
            commands: Commands::new(),
            events: Vec::new(),
            config,
        };
        world.levels.register_level(ranch_entrance()?);
        world.spawn_player(Vec3::from_array(DEFAULT_PLAYER_SPAWN), 0.0)?;
        Ok(world)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn physics(&self) -> &CollisionWorld {
        &self.physics
    }

    pub fn levels(&self) -> &LevelManager {
        &self.levels
    }

    pub fn levels_mut(&mut self) -> &mut LevelManager {
        &mut self.levels
    }

    pub fn state(&self) -> GameState {
        self.state.current()
    }

    pub fn state_manager(&self) -> &GameStateManager {
        &self.state
    }

    pub fn player(&self) -> Option<Id> {
        self.player
    }

    pub fn player_position(&self) -> Option<Vec3> {
        self.player.and_then(|p| self.scene.get(p)).map(Entity::position)
    }

    /// Teleport the player and its collider
    pub fn set_player_position(&mut self, position: Vec3) {
        let Some(player) = self.player.and_then(|p| self.scene.get_mut(p)) else {
            return;
        };
        player.body.transform.set_position(position);
        if let Some(handle) = player.collider {
            if let Err(e) = self.physics.set_position(handle, position) {
                log::warn!("Player collider out of sync: {}", e);
            }
        }
    }

    /// Unit aim direction used when firing
    pub fn aim(&self) -> Vec3 {
        self.aim
    }

    pub fn set_aim(&mut self, aim: Vec3) {
        let aim = aim.normalize_or_zero();
        if aim != Vec3::ZERO {
            self.aim = aim;
        }
    }

    pub fn combat(&self) -> Option<&CombatManager> {
        self.scene.component::<CombatManager>(self.player?)
    }

    pub fn combat_mut(&mut self) -> Option<&mut CombatManager> {
        self.scene.component_mut::<CombatManager>(self.player?)
    }

    pub fn weapons(&self) -> Option<&WeaponSystem> {
        self.scene.component::<WeaponSystem>(self.player?)
    }

    pub fn weapons_mut(&mut self) -> Option<&mut WeaponSystem> {
        self.scene.component_mut::<WeaponSystem>(self.player?)
    }

    pub fn enemy_manager(&self) -> Option<&EnemyManager> {
        self.scene.component::<EnemyManager>(self.player?)
    }

    pub fn enemy_manager_mut(&mut self) -> Option<&mut EnemyManager> {
        self.scene.component_mut::<EnemyManager>(self.player?)
    }

    /// Enemies the manager counts as active
    pub fn enemy_ids(&self) -> Vec<Id> {
        self.enemy_manager()
            .map(|m| m.active_enemies().to_vec())
            .unwrap_or_default()
    }

    pub fn enemy(&self, id: Id) -> Option<&EnemyAi> {
        self.scene.component::<EnemyAi>(id)
    }

    /// Gates, switches and keycards still in the level
    pub fn interactables(&self) -> impl Iterator<Item = (Id, &EnvironmentDef)> {
        self.interactables.iter().map(|(id, object)| (*id, object))
    }

    /// Combat signals from now on
    pub fn subscribe(&mut self) -> Option<Receiver<CombatSignal>> {
        self.combat_mut().map(CombatManager::subscribe)
    }

    /// Begin playing without a level
    pub fn start(&mut self) -> bool {
        self.state.set(GameState::Playing)
    }

    pub fn toggle_pause(&mut self) -> GameState {
        self.state.toggle_pause()
    }

    /// Replace the scene with a registered level and start playing
    pub fn load_level(&mut self, id: &str, spawn: Option<&str>) -> Result<()> {
        let plan = self.levels.load_level(id, spawn)?;
        self.state.set(GameState::Loading);
        self.unload();
        self.hydrate(&plan)?;
        self.state.set(GameState::Playing);
        Ok(())
    }

    /// Reset combat and weapons, then reload the current level
    pub fn restart(&mut self) -> Result<()> {
        self.state.set(GameState::Loading);
        if let Some(combat) = self.combat_mut() {
            combat.reset();
        }
        if let Some(weapons) = self.weapons_mut() {
            weapons.reset();
        }

        match self.levels.current_level().map(|l| l.id.clone()) {
            Some(id) => self.load_level(&id, None),
            None => {
                self.unload();
                self.attach_player_collider()?;
                self.place_player(Vec3::from_array(DEFAULT_PLAYER_SPAWN), 0.0);
                self.state.set(GameState::Playing);
                Ok(())
            }
        }
    }

    /// Manual spawn; respects the enemy cap
    pub fn spawn_enemy(&mut self, position: Vec3, variant: EnemyVariant) -> Option<Id> {
        let manager = self.player?;
        let request = self
            .scene
            .component_mut::<EnemyManager>(manager)?
            .spawn_enemy(position, variant)?;
        self.spawn_enemy_entity(manager, request)
    }

    /// Damage an enemy as if a projectile hit it
    pub fn damage_enemy(&mut self, target: Id, amount: f32) -> Option<DamageTaken> {
        self.apply_damage(target, DamageInfo::new(amount))
    }

    /// Destroy an entity and its subtree, releasing colliders at once
    pub fn destroy_entity(&mut self, id: Id) {
        for destroyed in self.scene.destroy(id) {
            self.release_collider(destroyed);
            self.interactables.remove(&destroyed);
            if let Some(manager) = self.enemy_manager_mut() {
                manager.remove_enemy(destroyed);
            }
        }
    }

    fn spawn_player(&mut self, position: Vec3, yaw: f32) -> Result<()> {
        let id = self.scene.spawn(Entity::new(PLAYER_NAME).with_position(position));
        CombatManager::attach_to(&mut self.scene, id, &self.config.combat, &self.config.enemy)?;
        self.player = Some(id);
        self.attach_player_collider()?;
        self.place_player(position, yaw);
        log::info!("Player {} spawned at {:?}", id, position.to_array());
        Ok(())
    }

    fn attach_player_collider(&mut self) -> Result<ColliderHandle> {
        let player = self.player.ok_or(GameError::InvalidConfig("no player".into()))?;
        let desc = ColliderDesc::capsule(player, PLAYER_RADIUS, PLAYER_HEIGHT).with_layer(CollisionLayer::PLAYER);
        self.attach_collider(player, desc)
    }

    fn place_player(&mut self, position: Vec3, yaw: f32) {
        self.set_player_position(position);
        if let Some(player) = self.player.and_then(|p| self.scene.get_mut(p)) {
            player.body.transform.set_yaw(yaw);
            player.body.velocity = Vec3::ZERO;
            self.aim = player.body.transform.forward();
        }
    }

    fn attach_collider(&mut self, id: Id, desc: ColliderDesc) -> Result<ColliderHandle> {
        let entity = self.scene.get_mut(id).ok_or(GameError::EntityNotFound(id))?;
        let handle = self.physics.add_collider(desc, entity.position())?;
        if let Some(old) = entity.collider.replace(handle) {
            self.physics.remove_collider(old);
        }
        Ok(handle)
    }

    fn release_collider(&mut self, id: Id) {
        if let Some(handle) = self.scene.get_mut(id).and_then(|e| e.collider.take()) {
            self.physics.remove_collider(handle);
        }
    }

    /// Drop everything but the player
    fn unload(&mut self) {
        for root in self.scene.roots() {
            if Some(root) != self.player {
                self.scene.destroy(root);
            }
        }
        self.scene.sweep();
        self.physics.cleanup();
        if let Some(player) = self.player.and_then(|p| self.scene.get_mut(p)) {
            player.collider = None;
        }
        if let Some(manager) = self.enemy_manager_mut() {
            manager.clear();
        }
        self.interactables.clear();
        self.commands.drain();
        self.events.clear();
        self.knockback = Vec3::ZERO;
    }

    fn hydrate(&mut self, plan: &LevelPlan) -> Result<()> {
        for b in &plan.static_boxes {
            let size = b.aabb.size();
            let id = self
                .scene
                .spawn(Entity::new(b.id.clone()).with_position(b.aabb.center()).with_static(true));
            let desc = ColliderDesc::cuboid(id, size.x, size.y, size.z)
                .with_layer(CollisionLayer::ENVIRONMENT)
                .with_static(true);
            if let Err(e) = self.attach_collider(id, desc) {
                log::warn!("Skipping geometry {}: {}", b.id, e);
                self.scene.destroy(id);
            }
        }

        for object in plan.environment.iter().filter(|o| o.is_interactive()) {
            if let EnvironmentDef::Keycard { keycard_id, .. } = object {
                if self.levels.progress().keycards.contains(keycard_id) {
                    continue;
                }
            }
            self.spawn_interactable(object.clone());
        }

        let points: Vec<SpawnPoint> = plan
            .enemy_spawns
            .iter()
            .filter_map(|s| match EnemyVariant::from_number(s.variant) {
                Some(variant) => Some(SpawnPoint::new(Vec3::from_array(s.position), variant)),
                None => {
                    log::warn!("Skipping spawn point with unknown variant {}", s.variant);
                    None
                }
            })
            .collect();
        if !points.is_empty() {
            if let Some(manager) = self.enemy_manager_mut() {
                manager.set_spawn_points(points);
            }
        }

        self.attach_player_collider()?;
        self.place_player(plan.player_spawn.position(), plan.player_spawn.rotation[1]);
        Ok(())
    }

    fn spawn_interactable(&mut self, object: EnvironmentDef) {
        let id = self.scene.spawn(
            Entity::new(object.id())
                .with_position(object.position())
                .with_static(true),
        );
        let desc = ColliderDesc::sphere(id, INTERACTION_RANGE)
            .with_layer(CollisionLayer::PICKUP)
            .with_static(true)
            .with_trigger(true);
        match self.attach_collider(id, desc) {
            Ok(_) => {
                self.interactables.insert(id, object);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", object.id(), e);
                self.scene.destroy(id);
            }
        }
    }

    fn interact(&mut self, object: Id) {
        let Some(def) = self.interactables.get(&object) else {
            return;
        };
        let Some(interaction) = self.levels.interact(def) else {
            return;
        };
        self.services.audio.play_sound(interaction.sound(), Some(def.position()));
        if let Interaction::KeycardCollected { .. } = interaction {
            self.destroy_entity(object);
        }
    }

    fn enemy_stats(&self) -> EnemyStats {
        EnemyStats {
            aggro_range: self.config.enemy.aggro_range,
            attack_range: self.config.enemy.attack_range,
            ..EnemyStats::default()
        }
    }

    fn spawn_enemy_entity(&mut self, manager: Id, request: SpawnRequest) -> Option<Id> {
        let stats = self.enemy_stats();
        let radius = stats.collider_radius;
        let mut ai = EnemyAi::with_stats(request.variant, stats);
        ai.start_patrol(&mut self.rng);

        let model = request.variant.model_name();
        let id = self.scene.spawn(
            Entity::new(model)
                .with_position(request.position)
                .with_mesh(model, Some(BOAR_TEXTURE)),
        );
        let desc = ColliderDesc::sphere(id, radius)
            .with_layer(CollisionLayer::ENEMY)
            .with_offset(Vec3::new(0.0, radius, 0.0));

        let attached = self
            .attach_collider(id, desc)
            .and_then(|_| self.scene.add_component(id, ai));
        if let Err(e) = attached {
            log::warn!("Enemy spawn failed: {}", e);
            self.destroy_entity(id);
            if let Some(m) = self.scene.component_mut::<EnemyManager>(manager) {
                m.cancel_pending();
            }
            return None;
        }

        if let Some(m) = self.scene.component_mut::<EnemyManager>(manager) {
            m.register(id);
        }
        Some(id)
    }

    fn spawn_projectile(&mut self, spawn: &ProjectileSpawn) {
        let id = self.scene.spawn(
            Entity::new(spawn.kind.name())
                .with_position(spawn.origin)
                .with_velocity(spawn.velocity())
                .with_mesh(spawn.kind.name(), None),
        );
        let desc = ColliderDesc::sphere(id, PROJECTILE_RADIUS)
            .with_layer(CollisionLayer::PROJECTILE)
            .with_trigger(true);
        let attached = self
            .attach_collider(id, desc)
            .and_then(|_| self.scene.add_component(id, Projectile::from_spawn(spawn)));
        if let Err(e) = attached {
            log::warn!("Projectile spawn failed: {}", e);
            self.destroy_entity(id);
        }
    }

    fn apply_damage(&mut self, target: Id, info: DamageInfo) -> Option<DamageTaken> {
        let player = self.player?;
        let (enemy, owner) = self.scene.get_pair_mut(target, player)?;
        if enemy.is_destroyed() {
            return None;
        }
        let position = enemy.position();
        let ai = enemy.get_component_mut::<EnemyAi>()?;
        let combat = owner.get_component_mut::<CombatManager>()?;
        let taken = combat.apply_enemy_damage(ai, info);

        if taken.dealt > 0.0 {
            self.services.audio.play_sound("enemy_hit", Some(position));
        }
        if taken.killed {
            // Corpses are inert until they despawn
            self.release_collider(target);
            self.services.audio.play_sound("enemy_death", Some(position));
            let reward = self
                .scene
                .component_mut::<CombatManager>(player)
                .and_then(|c| c.handle_enemy_killed(target, &mut self.rng));
            if let (Some(reward), Some(weapons)) = (reward, self.weapons_mut()) {
                weapons.add_ammo(reward.weapon, reward.amount);
            }
        }
        Some(taken)
    }

    fn attack_player(&mut self, enemy: Id, attack: Attack) {
        let Some(player) = self.player else {
            return;
        };
        let position = self.player_position();
        let Some(combat) = self.scene.component_mut::<CombatManager>(player) else {
            return;
        };
        if let HitResult::Applied { killed, .. } = combat.handle_enemy_attack(attack.damage) {
            log::debug!("Enemy {} hit the player", enemy);
            self.knockback += attack.push;
            self.services.audio.play_sound("player_hurt", position);
            if killed {
                self.state.set(GameState::GameOver);
            }
        }
    }

    fn apply_commands(&mut self) {
        loop {
            let batch = self.commands.drain();
            if batch.is_empty() {
                break;
            }
            for command in batch {
                self.apply_command(command);
            }
        }
    }

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::SpawnProjectile(spawn) => self.spawn_projectile(&spawn),
            Command::SpawnEnemy { manager, request } => {
                self.spawn_enemy_entity(manager, request);
            }
            Command::DamageEnemy { target, info } => {
                self.apply_damage(target, info);
            }
            Command::AttackPlayer { enemy, attack } => self.attack_player(enemy, attack),
            Command::EnemyDespawned { enemy } => {
                log::debug!("Enemy {} despawned", enemy);
                self.destroy_entity(enemy);
            }
            Command::Destroy(id) => self.destroy_entity(id),
            Command::PlaySound { cue, position } => self.services.audio.play_sound(cue, position),
        }
    }

    fn snapshot_enemies(&mut self) {
        self.enemies.clear();
        for (id, entity) in self.scene.iter() {
            let Some(ai) = entity.get_component::<EnemyAi>() else {
                continue;
            };
            if !ai.is_alive() {
                continue;
            }
            let center = entity
                .collider
                .and_then(|h| self.physics.get(h))
                .map_or(entity.position(), |c| c.center());
            self.enemies.push(id, center);
        }
    }

    fn resolve_pair(&mut self, pair: CombatPair) {
        match pair {
            CombatPair::ProjectileHitEnemy { projectile, enemy } => {
                let Some(entity) = self.scene.get_mut(projectile).filter(|e| e.is_live()) else {
                    return;
                };
                let position = entity.position();
                if let Some(event) = entity
                    .get_component_mut::<Projectile>()
                    .and_then(|p| p.strike(enemy))
                {
                    projectile_commands(projectile, position, event, &mut self.commands);
                }
            }
            CombatPair::EnemyTouchPlayer { enemy, player } => {
                let (Some(enemy_entity), Some(player_entity)) = (self.scene.get(enemy), self.scene.get(player)) else {
                    return;
                };
                let Some(ai) = enemy_entity.get_component::<EnemyAi>().filter(|ai| ai.is_alive()) else {
                    return;
                };
                let push = (player_entity.position() - enemy_entity.position())
                    .flat()
                    .normalize_or_zero()
                    * ai.stats.knockback;
                let attack = Attack {
                    damage: ai.stats.attack_damage,
                    push,
                };
                self.attack_player(enemy, attack);
            }
        }
    }

    fn check_match_end(&mut self) {
        let Some(combat) = self.combat() else {
            return;
        };
        if combat.is_player_dead() {
            self.state.set(GameState::GameOver);
            return;
        }
        let kills = combat.stats().enemies_killed;
        let active = self.enemy_manager().map_or(0, EnemyManager::enemy_count);
        if self.win_rule.is_met(kills, active) && self.state.set(GameState::Won) {
            log::info!("All hogs eliminated after {} kills", kills);
        }
    }

    fn check_boundaries(&mut self) {
        let Some(position) = self.player_position() else {
            return;
        };
        match self.levels.check_boundaries(position) {
            Some(BoundaryEvent::Transition {
                target_level,
                target_spawn,
                ..
            }) => {
                if let Err(e) = self.load_level(&target_level, Some(&target_spawn)) {
                    log::warn!("Level transition to {} failed: {}", target_level, e);
                }
            }
            Some(BoundaryEvent::GateOpened { gate }) => log::debug!("Passed gate {}", gate),
            Some(BoundaryEvent::Blocked { boundary }) => log::trace!("Blocked at {}", boundary),
            None => {}
        }
    }
}

impl FrameStages for GameWorld {
    fn input(&mut self, _time: &FrameTime) {
        let source = &self.services.input;
        let pause = source.is_key_pressed(KEY_PAUSE);
        let pause_pressed = pause && !self.pause_held;
        self.pause_held = pause;
        if pause_pressed {
            self.state.toggle_pause();
        }

        if !self.state.current().is_playing() {
            self.input = FrameInput::default();
            return;
        }

        self.input = FrameInput {
            fire: source.get_action(ACTION_FIRE),
            reload: source.is_key_pressed(KEY_RELOAD),
            switch_to: WEAPON_KEYS
                .iter()
                .find(|(key, _)| source.is_key_pressed(key))
                .map(|(_, kind)| *kind),
            pause: pause_pressed,
            movement: source.movement(),
            aim: source.aim(),
        };

        if let Some(aim) = self.input.aim {
            self.set_aim(aim);
        }
        let knockback = std::mem::take(&mut self.knockback);
        if let Some(player) = self.player.and_then(|p| self.scene.get_mut(p)) {
            player.body.velocity = self.input.movement + knockback;
            if self.input.aim.is_some() {
                let target = player.position() + self.aim;
                player.body.transform.look_at(target);
            }
        }
    }

    fn logic(&mut self, time: &FrameTime) {
        if !self.state.current().is_playing() {
            return;
        }
        self.snapshot_enemies();
        let player_position = self.player_position();

        let view = FrameView {
            physics: &self.physics,
            time: *time,
            input: &self.input,
            player: self.player,
            player_position,
            aim: self.aim,
            enemies: &self.enemies,
        };
        self.scene.update(&view, &mut self.rng, &mut self.commands);
        self.apply_commands();
    }

    fn collision(&mut self, _time: &FrameTime) {
        if !self.state.current().is_playing() {
            return;
        }
        for (_, entity) in self.scene.iter() {
            if entity.is_static() || !entity.is_live() {
                continue;
            }
            if let Some(handle) = entity.collider {
                if let Err(e) = self.physics.set_position(handle, entity.position()) {
                    log::warn!("Collider of {} out of sync: {}", entity.name, e);
                }
            }
        }

        self.physics.update();
        self.events.extend(self.physics.drain_events());
        for correction in self.physics.drain_corrections() {
            if let Some(entity) = self.scene.get_mut(correction.owner) {
                if !entity.is_static() {
                    entity.body.transform.translate(correction.offset);
                }
            }
        }
    }

    fn reconcile(&mut self, _time: &FrameTime) {
        let events = std::mem::take(&mut self.events);
        if !self.state.current().is_playing() {
            return;
        }

        for event in &events {
            if let Some(pair) = CombatManager::classify(event) {
                self.resolve_pair(pair);
            } else if let Some((_, object)) = event.owners_by_layer(CollisionLayer::PLAYER, CollisionLayer::PICKUP) {
                self.interact(object);
            }
        }
        self.apply_commands();
        self.scene.sweep();

        self.check_match_end();
        if self.state.current().is_playing() {
            self.check_boundaries();
        }
    }

    fn render(&mut self, _time: &FrameTime) {
        for (_, entity) in self.scene.iter() {
            if !entity.is_live() {
                continue;
            }
            if let Some(mesh) = &entity.mesh {
                let model = entity.body.transform.model_matrix();
                self.services
                    .renderer
                    .render_mesh(mesh, entity.texture.as_deref(), &model);
            }
        }
    }
}

impl std::fmt::Debug for GameWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameWorld")
            .field("state", &self.state.current())
            .field("player", &self.player)
            .field("entities", &self.scene.len())
            .field("colliders", &self.physics.collider_count())
            .finish_non_exhaustive()
    }
}

/// A world driven by its own scheduler
#[derive(Debug)]
pub struct Game {
    scheduler: FrameScheduler,
    world: GameWorld,
}

impl Game {
    pub fn new(config: GameConfig, services: Services) -> Result<Self> {
        let scheduler =
            FrameScheduler::new(config.frame.max_delta_ms).with_log_every(config.frame.log_every_frames);
        Ok(Self {
            scheduler,
            world: GameWorld::new(config, services)?,
        })
    }

    /// Run one frame from the host's raw delta
    pub fn tick(&mut self, raw_delta_ms: f32) -> FrameTime {
        self.scheduler.pump(&mut self.world, raw_delta_ms)
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }
}

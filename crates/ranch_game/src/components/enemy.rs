use crate::scene::{Attachable, Command, ComponentContext, Updatable};
use ranch_ai::{AiInput, EnemyAi, EnemyManager};
use ranch_core::Id;
use ranch_math::Vec3;
use ranch_physics::CollisionLayer;

impl Attachable for EnemyManager {
    fn on_destroy(&mut self, _owner: Id) {
        self.clear();
    }
}

impl Updatable for EnemyManager {
    fn update(&mut self, ctx: &mut ComponentContext<'_>) {
        let delta_ms = ctx.delta_ms();
        if let Some(request) = EnemyManager::update(self, delta_ms, ctx.rng) {
            ctx.commands.push(Command::SpawnEnemy {
                manager: ctx.owner,
                request,
            });
        }
    }
}

impl Attachable for EnemyAi {
    fn on_destroy(&mut self, owner: Id) {
        log::debug!("{} {} removed", self.variant.model_name(), owner);
    }
}

impl Updatable for EnemyAi {
    fn update(&mut self, ctx: &mut ComponentContext<'_>) {
        let position = ctx.position();
        let hit_wall = ctx.collider.map_or(false, |handle| {
            ctx.frame
                .physics
                .get_collisions(handle)
                .iter()
                .any(|c| c.layer.intersects(CollisionLayer::ENVIRONMENT))
        });
        // Without a player there is nothing to chase
        let player_position = ctx
            .frame
            .player_position
            .unwrap_or(Vec3::new(position.x, position.y, f32::INFINITY));

        let input = AiInput {
            position,
            player_position,
            hit_wall,
        };
        let out = EnemyAi::update(self, &input, ctx.delta_ms(), ctx.rng);

        ctx.body.velocity = out.velocity;
        if let Some(target) = out.face_towards {
            ctx.body.transform.look_at(target);
        }
        for cue in &out.cues {
            ctx.commands.play(cue.name(), Some(position));
        }
        if let Some(attack) = out.attack {
            ctx.commands.push(Command::AttackPlayer {
                enemy: ctx.owner,
                attack,
            });
        }
        if out.despawn {
            ctx.commands.push(Command::EnemyDespawned { enemy: ctx.owner });
        }
    }
}

use crate::scene::{Attachable, Command, Commands, ComponentContext, Updatable};
use ranch_combat::{DamageInfo, Projectile, ProjectileEvent};
use ranch_core::Id;
use ranch_math::Vec3;

impl Attachable for Projectile {
    fn on_destroy(&mut self, _owner: Id) {
        self.retire();
    }
}

impl Updatable for Projectile {
    fn update(&mut self, ctx: &mut ComponentContext<'_>) {
        let position = ctx.position();
        let contacts = ctx
            .collider
            .map(|handle| ctx.frame.physics.contacts_at(handle, position))
            .unwrap_or_default();

        if let Some(event) = self.tick(ctx.delta_ms(), position, &contacts, ctx.frame.enemies) {
            projectile_commands(ctx.owner, position, event, ctx.commands);
        }
    }
}

/// Turn a finished projectile's event into commands; always destroys it
pub fn projectile_commands(projectile: Id, position: Vec3, event: ProjectileEvent, commands: &mut Commands) {
    if let Some(cue) = event.cue() {
        let at = match &event {
            ProjectileEvent::Impact { point } => *point,
            ProjectileEvent::Exploded { center, .. } => *center,
            _ => position,
        };
        commands.play(cue.name(), Some(at));
    }

    match event {
        ProjectileEvent::Expired | ProjectileEvent::Impact { .. } => {}
        ProjectileEvent::HitEnemy { target, damage } => {
            commands.push(Command::DamageEnemy {
                target,
                info: DamageInfo::new(damage)
                    .with_source(projectile)
                    .with_hit_point(position),
            });
        }
        ProjectileEvent::Exploded { center, hits } => {
            log::debug!("Explosion at {:?} hits {} enemies", center, hits.len());
            for (target, damage) in hits {
                commands.push(Command::DamageEnemy {
                    target,
                    info: DamageInfo::new(damage)
                        .with_source(projectile)
                        .with_hit_point(center),
                });
            }
        }
    }
    commands.destroy(projectile);
}

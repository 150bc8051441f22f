use crate::scene::{Attachable, ComponentContext, Updatable};
use ranch_combat::WeaponSystem;
use ranch_core::Id;

impl Attachable for WeaponSystem {
    fn on_attach(&mut self, owner: Id) {
        log::debug!("Weapons attached to {}", owner);
    }
}

impl Updatable for WeaponSystem {
    fn update(&mut self, ctx: &mut ComponentContext<'_>) {
        for kind in WeaponSystem::update(self, ctx.delta_ms()) {
            log::debug!("{} reloaded, {} rounds", kind.name(), self.ammo(kind));
        }
    }
}

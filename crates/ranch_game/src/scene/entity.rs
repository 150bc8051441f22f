//! Scene entities

use super::component::{ComponentVariant, Components};
use ranch_core::{next_serial, Id};
use ranch_math::{Transform, Vec3};
use ranch_physics::ColliderHandle;

/// Kinematic state integrated once per frame
#[derive(Debug, Clone)]
pub struct Body {
    pub transform: Transform,
    /// Units per second
    pub velocity: Vec3,
    /// Units per second squared
    pub acceleration: Vec3,
}

impl Body {
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
        }
    }

    /// Explicit Euler step over `dt_secs`
    pub fn integrate(&mut self, dt_secs: f32) {
        self.velocity += self.acceleration * dt_secs;
        if self.velocity != Vec3::ZERO {
            self.transform.translate(self.velocity * dt_secs);
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// A node in the scene
///
/// Created detached; the scene assigns its id on spawn.
#[derive(Debug)]
pub struct Entity {
    /// Process-wide creation serial, stable across arena slot reuse
    pub serial: u64,
    pub name: String,
    pub body: Body,
    pub mesh: Option<String>,
    pub texture: Option<String>,
    pub(crate) id: Option<Id>,
    pub(crate) active: bool,
    pub(crate) destroyed: bool,
    pub(crate) is_static: bool,
    pub(crate) collider: Option<ColliderHandle>,
    pub(crate) components: Components,
    pub(crate) parent: Option<Id>,
    pub(crate) children: Vec<Id>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            serial: next_serial(),
            name: name.into(),
            body: Body::default(),
            mesh: None,
            texture: None,
            id: None,
            active: true,
            destroyed: false,
            is_static: false,
            collider: None,
            components: Components::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.body.transform.set_position(position);
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.body.velocity = velocity;
        self
    }

    pub fn with_mesh(mut self, mesh: impl Into<String>, texture: Option<&str>) -> Self {
        self.set_mesh(mesh, texture);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.set_static(is_static);
        self
    }

    /// Id assigned by the scene, `None` before spawn
    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn position(&self) -> Vec3 {
        self.body.transform.position()
    }

    pub fn transform(&self) -> &Transform {
        &self.body.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.body.transform
    }

    pub fn set_mesh(&mut self, mesh: impl Into<String>, texture: Option<&str>) {
        self.mesh = Some(mesh.into());
        self.texture = texture.map(str::to_string);
    }

    /// Static entities never move; their velocity is cleared
    pub fn set_static(&mut self, is_static: bool) {
        self.is_static = is_static;
        if is_static {
            self.body.velocity = Vec3::ZERO;
            self.body.acceleration = Vec3::ZERO;
        }
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Active and not destroyed
    pub fn is_live(&self) -> bool {
        self.active && !self.destroyed
    }

    pub fn collider(&self) -> Option<ColliderHandle> {
        self.collider
    }

    pub fn parent(&self) -> Option<Id> {
        self.parent
    }

    pub fn children(&self) -> &[Id] {
        &self.children
    }

    pub fn distance_to(&self, other: &Entity) -> f32 {
        self.body.transform.distance_to(&other.body.transform)
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    pub fn get_component<T: ComponentVariant>(&self) -> Option<&T> {
        self.components.get::<T>()
    }

    pub fn get_component_mut<T: ComponentVariant>(&mut self) -> Option<&mut T> {
        self.components.get_mut::<T>()
    }

    pub fn has_component<T: ComponentVariant>(&self) -> bool {
        self.components.has::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrate_in_seconds() {
        let mut body = Body::at(Vec3::ZERO);
        body.velocity = Vec3::new(0.0, 0.0, 10.0);
        body.integrate(0.016);
        assert_relative_eq!(body.transform.position().z, 0.16, epsilon = 1e-6);
    }

    #[test]
    fn test_acceleration_feeds_velocity() {
        let mut body = Body::at(Vec3::ZERO);
        body.acceleration = Vec3::new(2.0, 0.0, 0.0);
        body.integrate(0.5);
        assert_relative_eq!(body.velocity.x, 1.0);
        assert_relative_eq!(body.transform.position().x, 0.5);
    }

    #[test]
    fn test_static_clears_motion() {
        let mut wall = Entity::new("wall").with_velocity(Vec3::X);
        wall.set_static(true);
        assert!(wall.is_static());
        assert_eq!(wall.body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_serials_increase() {
        let a = Entity::new("a");
        let b = Entity::new("b");
        assert!(b.serial > a.serial);
        assert_eq!(a.id(), None);
    }
}

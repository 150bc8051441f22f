//! Euler-angle transform with a lazily cached model matrix

use crate::matrix::Mat4;
use crate::vector::Vec3;
use std::cell::Cell;

/// Position, yaw/pitch/roll rotation (radians) and scale
///
/// The model matrix is computed on demand and cached; every mutator
/// invalidates the cache.
#[derive(Clone, Debug)]
pub struct Transform {
    position: Vec3,
    /// x = pitch, y = yaw, z = roll
    rotation: Vec3,
    scale: Vec3,
    cached: Cell<Option<Mat4>>,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            cached: Cell::new(None),
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Vec3::ZERO, Vec3::ONE)
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.invalidate();
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
        self.invalidate();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.invalidate();
    }

    pub fn rotate(&mut self, delta: Vec3) {
        self.rotation += delta;
        self.invalidate();
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.rotation.y = yaw;
        self.invalidate();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.invalidate();
    }

    /// Whether the cached matrix needs recomputing
    pub fn is_dirty(&self) -> bool {
        self.cached.get().is_none()
    }

    /// Model matrix `T * Ry * Rx * Rz * S`
    pub fn model_matrix(&self) -> Mat4 {
        if let Some(m) = self.cached.get() {
            return m;
        }
        let m = Mat4::from_translation(self.position)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_z(self.rotation.z)
            * Mat4::from_scale(self.scale);
        self.cached.set(Some(m));
        m
    }

    /// Ground-plane forward direction from yaw
    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.rotation.y.sin_cos();
        Vec3::new(sin, 0.0, cos)
    }

    /// Ground-plane right direction from yaw
    pub fn right(&self) -> Vec3 {
        let (sin, cos) = self.rotation.y.sin_cos();
        Vec3::new(cos, 0.0, -sin)
    }

    /// Turn to face `target` on the ground plane
    pub fn look_at(&mut self, target: Vec3) {
        let d = target - self.position;
        if d.x == 0.0 && d.z == 0.0 {
            return;
        }
        self.set_yaw(d.x.atan2(d.z));
    }

    pub fn distance_to(&self, other: &Transform) -> f32 {
        self.position.distance(other.position)
    }

    fn invalidate(&self) {
        self.cached.set(None);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_position(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_identity() {
        let t = Transform::default();
        assert_eq!(t.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_mutators_invalidate_cache() {
        let mut t = Transform::default();
        let _ = t.model_matrix();
        assert!(!t.is_dirty());

        t.translate(Vec3::new(1.0, 0.0, 0.0));
        assert!(t.is_dirty());
        assert_eq!(t.model_matrix().translation(), Vec3::new(1.0, 0.0, 0.0));

        t.set_scale(Vec3::splat(2.0));
        assert!(t.is_dirty());
        assert_eq!(t.model_matrix().transform_point(Vec3::X), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_look_at_and_forward() {
        let mut t = Transform::default();
        t.look_at(Vec3::new(5.0, 0.0, 0.0));
        let f = t.forward();
        assert_relative_eq!(f.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(f.z, 0.0, epsilon = 1e-6);

        let r = t.right();
        assert_relative_eq!(r.z, -1.0, epsilon = 1e-6);
    }
}

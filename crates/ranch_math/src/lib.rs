//! # ranch_math - Simulation Math
//!
//! Small, dependency-free math primitives for the simulation core:
//! vectors, a column-major 4x4 matrix, an Euler-angle transform with a
//! lazily cached model matrix, bounding boxes, rays and the ray tests
//! used by collision queries.

pub mod bounds;
pub mod intersect;
pub mod matrix;
pub mod ray;
pub mod transform;
pub mod vector;

pub use bounds::*;
pub use intersect::*;
pub use matrix::*;
pub use ray::*;
pub use transform::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const FRAC_PI_2: f32 = PI / 2.0;
    pub const EPSILON: f32 = 1e-6;
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

pub mod prelude {
    pub use crate::bounds::AABB;
    pub use crate::intersect::{ray_aabb, ray_aabb_with_normal, ray_sphere_at, ray_sphere_with_normal};
    pub use crate::matrix::Mat4;
    pub use crate::ray::Ray;
    pub use crate::transform::Transform;
    pub use crate::vector::Vec3;
    pub use crate::clamp;
}

//! Narrow-phase shape tests
//!
//! Every test reports the normal pointing from B toward A, so moving A
//! along `normal * penetration` separates the pair.

use crate::collider::ColliderShape;
use ranch_math::{Vec3, AABB};

/// Contact information for an overlapping pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold {
    /// Unit normal from B toward A
    pub normal: Vec3,
    /// Overlap depth along the normal
    pub penetration: f32,
    /// Approximate contact point in world space
    pub point: Vec3,
}

impl Manifold {
    /// Same contact seen from the other collider
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            ..*self
        }
    }
}

/// Test two shapes placed at world-space centers
///
/// Capsules are tested as spheres of the same radius.
pub fn test_shapes(
    shape_a: &ColliderShape,
    center_a: Vec3,
    shape_b: &ColliderShape,
    center_b: Vec3,
) -> Option<Manifold> {
    match (shape_a.bounding_radius(), shape_b.bounding_radius()) {
        (None, None) => box_box(&shape_a.aabb(center_a), &shape_b.aabb(center_b)),
        (Some(ra), Some(rb)) => sphere_sphere(center_a, ra, center_b, rb),
        (None, Some(rb)) => box_sphere(&shape_a.aabb(center_a), center_b, rb).map(|m| m.flipped()),
        (Some(ra), None) => box_sphere(&shape_b.aabb(center_b), center_a, ra),
    }
}

/// Box-box overlap with minimum-penetration axis selection
///
/// Touching faces do not count. Ties go to X, then Y, then Z. The contact
/// point is the midpoint of the two centers.
pub fn box_box(a: &AABB, b: &AABB) -> Option<Manifold> {
    if !a.intersects(b) {
        return None;
    }

    let ca = a.center();
    let cb = b.center();
    let ha = a.half_extents();
    let hb = b.half_extents();
    let delta = ca - cb;

    let px = ha.x + hb.x - delta.x.abs();
    let py = ha.y + hb.y - delta.y.abs();
    let pz = ha.z + hb.z - delta.z.abs();

    let sign = |d: f32| if d < 0.0 { -1.0 } else { 1.0 };
    let (normal, penetration) = if px <= py && px <= pz {
        (Vec3::new(sign(delta.x), 0.0, 0.0), px)
    } else if py <= pz {
        (Vec3::new(0.0, sign(delta.y), 0.0), py)
    } else {
        (Vec3::new(0.0, 0.0, sign(delta.z)), pz)
    };

    Some(Manifold {
        normal,
        penetration,
        point: (ca + cb) * 0.5,
    })
}

/// Sphere-sphere overlap
///
/// Coincident centers fall back to a +X normal.
pub fn sphere_sphere(center_a: Vec3, radius_a: f32, center_b: Vec3, radius_b: f32) -> Option<Manifold> {
    let delta = center_a - center_b;
    let distance = delta.length();
    let radii = radius_a + radius_b;
    if distance >= radii {
        return None;
    }

    let normal = if distance > 0.0 { delta / distance } else { Vec3::X };
    Some(Manifold {
        normal,
        penetration: radii - distance,
        point: center_a - normal * radius_a,
    })
}

/// Sphere against box, with the sphere as A
///
/// The normal points from the closest box point toward the sphere center,
/// falling back to +Y when the center is inside the box.
pub fn box_sphere(aabb: &AABB, center: Vec3, radius: f32) -> Option<Manifold> {
    let closest = aabb.closest_point(center);
    let delta = center - closest;
    let distance = delta.length();
    if distance >= radius {
        return None;
    }

    let normal = if distance > 0.0 { delta / distance } else { Vec3::Y };
    Some(Manifold {
        normal,
        penetration: radius - distance,
        point: closest,
    })
}

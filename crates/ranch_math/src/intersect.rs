//! Ray intersection tests used by collision queries

use crate::bounds::AABB;
use crate::consts::EPSILON;
use crate::ray::Ray;
use crate::vector::Vec3;

/// Ray-AABB intersection using the slab method
///
/// Axes where the ray runs parallel to the slab miss unless the origin
/// lies between the slab planes. Returns the entry distance, or the exit
/// distance when the origin is inside the box.
pub fn ray_aabb(ray: &Ray, aabb: &AABB) -> Option<f32> {
    ray_aabb_with_normal(ray, aabb).map(|(t, _)| t)
}

/// Ray-AABB intersection with the normal of the face that was hit
pub fn ray_aabb_with_normal(ray: &Ray, aabb: &AABB) -> Option<(f32, Vec3)> {
    let origin = ray.origin.to_array();
    let dir = ray.direction.to_array();
    let min = aabb.min.to_array();
    let max = aabb.max.to_array();

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    let mut enter_axis = 0usize;
    let mut enter_sign = -1.0f32;

    for axis in 0..3 {
        if dir[axis].abs() < EPSILON {
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir[axis];
        let mut t1 = (min[axis] - origin[axis]) * inv;
        let mut t2 = (max[axis] - origin[axis]) * inv;
        let mut sign = -1.0;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
            sign = 1.0;
        }
        if t1 > t_min {
            t_min = t1;
            enter_axis = axis;
            enter_sign = sign;
        }
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    if t_max < 0.0 {
        return None;
    }

    let mut normal = [0.0f32; 3];
    if t_min >= 0.0 {
        normal[enter_axis] = enter_sign;
        Some((t_min, Vec3::from_array(normal)))
    } else {
        // Origin inside the box: report the exit face
        let exit = ray.at(t_max);
        let n = if (exit.x - aabb.max.x).abs() < 1e-4 { Vec3::X }
            else if (exit.x - aabb.min.x).abs() < 1e-4 { Vec3::NEG_X }
            else if (exit.y - aabb.max.y).abs() < 1e-4 { Vec3::Y }
            else if (exit.y - aabb.min.y).abs() < 1e-4 { Vec3::NEG_Y }
            else if (exit.z - aabb.max.z).abs() < 1e-4 { Vec3::Z }
            else { Vec3::NEG_Z };
        Some((t_max, n))
    }
}

/// Ray-Sphere intersection with center and radius
///
/// Returns the nearest non-negative distance; a ray starting inside the
/// sphere reports where it leaves.
pub fn ray_sphere_at(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    if a < EPSILON {
        return None;
    }
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t1 >= 0.0 {
        Some(t1)
    } else if t2 >= 0.0 {
        Some(t2)
    } else {
        None
    }
}

/// Ray-Sphere intersection with the outward surface normal
pub fn ray_sphere_with_normal(ray: &Ray, center: Vec3, radius: f32) -> Option<(f32, Vec3)> {
    let t = ray_sphere_at(ray, center, radius)?;
    let normal = (ray.at(t) - center).normalize_or_zero();
    Some((t, normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box_at(x: f32) -> AABB {
        AABB::from_center_half_extents(Vec3::new(x, 0.0, 0.0), Vec3::ONE)
    }

    #[test]
    fn test_ray_aabb_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let (t, n) = ray_aabb_with_normal(&ray, &unit_box_at(5.0)).unwrap();
        assert_relative_eq!(t, 4.0);
        assert_eq!(n, Vec3::NEG_X);
    }

    #[test]
    fn test_ray_aabb_parallel_miss() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X);
        assert!(ray_aabb(&ray, &unit_box_at(5.0)).is_none());
    }

    #[test]
    fn test_ray_aabb_behind() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_X);
        assert!(ray_aabb(&ray, &unit_box_at(5.0)).is_none());
    }

    #[test]
    fn test_ray_aabb_from_inside() {
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::X);
        let (t, n) = ray_aabb_with_normal(&ray, &unit_box_at(5.0)).unwrap();
        assert_relative_eq!(t, 1.0);
        assert_eq!(n, Vec3::X);
    }

    #[test]
    fn test_ray_sphere() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let (t, n) = ray_sphere_with_normal(&ray, Vec3::new(0.0, 0.0, 10.0), 2.0).unwrap();
        assert_relative_eq!(t, 8.0, epsilon = 1e-5);
        assert_relative_eq!(n.z, -1.0, epsilon = 1e-5);
        assert!(ray_sphere_at(&ray, Vec3::new(5.0, 0.0, 10.0), 2.0).is_none());
    }
}

//! Ray intersection tests used by the reference world query

use crate::bounds::AABB;
use crate::ray::Ray;
use crate::vector::Vec3;

/// Ray-AABB intersection using the slab method
///
/// Returns the distance along the ray to the intersection point,
/// or None if the ray doesn't intersect the AABB.
pub fn ray_aabb(ray: &Ray, aabb: &AABB) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    // tmax < 0: box is behind the origin; tmin > tmax: miss
    if tmax < 0.0 || tmin > tmax {
        None
    } else {
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

/// Ray-sphere intersection
///
/// Returns the nearest positive distance. A ray starting inside the sphere
/// reports the exit point.
pub fn ray_sphere_at(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let a = ray.direction.dot(ray.direction);
    if a <= 0.0 {
        return None;
    }

    let oc = ray.origin - center;
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        None
    } else {
        let sqrt_d = discriminant.sqrt();
        let t1 = (-b - sqrt_d) / (2.0 * a);
        let t2 = (-b + sqrt_d) / (2.0 * a);

        if t1 > 0.0 {
            Some(t1)
        } else if t2 > 0.0 {
            Some(t2)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_sphere_hit() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let t = ray_sphere_at(&ray, Vec3::new(0.0, 0.0, 5.0), 1.0).unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_sphere_behind() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(ray_sphere_at(&ray, Vec3::new(0.0, 0.0, -5.0), 1.0).is_none());
    }

    #[test]
    fn test_ray_sphere_from_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = ray_sphere_at(&ray, Vec3::ZERO, 2.0).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_sphere_degenerate_ray() {
        let ray = Ray::new(Vec3::ZERO, Vec3::ZERO);
        assert!(ray_sphere_at(&ray, Vec3::new(0.0, 0.0, 1.0), 5.0).is_none());
    }

    #[test]
    fn test_ray_aabb() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let aabb = AABB::new(Vec3::splat(-1.0), Vec3::ONE);
        let t = ray_aabb(&ray, &aabb).unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1e-4);
    }
}

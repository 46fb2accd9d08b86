//! Ray-sphere intersection and closest-hit selection.

use glam::Vec3A;

use crate::interval::Interval;
use crate::ray::Ray;
use crate::sphere::{MaterialKind, Sphere};

/// Shading state copied from the winning sphere at intersection time.
///
/// Exists only transiently per intersection query. The normal is the unit
/// vector pointing away from the sphere center; the scatterer flips it as
/// needed for rays entering a dielectric.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// World-space intersection point.
    pub point: Vec3A,
    /// Unit normal pointing away from the sphere center.
    pub normal: Vec3A,
    /// Surface color of the hit sphere.
    pub albedo: Vec3A,
    /// Pre-scaled emission of the hit sphere.
    pub emission: Vec3A,
    /// Material kind of the hit sphere.
    pub material: MaterialKind,
    /// Metal roughness of the hit sphere.
    pub fuzz: f32,
    /// Refractive index of the hit sphere.
    pub refractive_index: f32,
    /// Distance along the ray to the intersection.
    pub distance: f32,
}

impl HitRecord {
    fn from_sphere(ray: &Ray, sphere: &Sphere, distance: f32) -> Self {
        let point = ray.at(distance);
        Self {
            point,
            normal: (point - sphere.center).normalize(),
            albedo: sphere.albedo,
            emission: sphere.emission,
            material: sphere.material,
            fuzz: sphere.fuzz,
            refractive_index: sphere.refractive_index,
            distance,
        }
    }
}

/// Find the closest accepted hit across the sphere list.
///
/// Solves a·t² + b·t + c = 0 per sphere with a = dot(d,d), b = 2·dot(oc,d),
/// c = dot(oc,oc) − r². The near root is evaluated first; when it is
/// accepted the far root is skipped, since the near root is never farther.
/// Ties between spheres keep the first sphere found (strict `<`).
pub fn intersect(ray: &Ray, range: Interval, spheres: &[Sphere]) -> Option<HitRecord> {
    let mut best: Option<HitRecord> = None;

    for sphere in spheres {
        let oc = ray.origin - sphere.center;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.dot(oc) - sphere.radius * sphere.radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant <= 0.0 {
            continue;
        }
        let sqrt_disc = discriminant.sqrt();

        let near = (-b - sqrt_disc) / (2.0 * a);
        if range.surrounds(near) {
            let closer = best.map_or(true, |record| near < record.distance);
            if closer {
                best = Some(HitRecord::from_sphere(ray, sphere, near));
                continue;
            }
        }

        let far = (-b + sqrt_disc) / (2.0 * a);
        if range.surrounds(far) {
            let closer = best.map_or(true, |record| far < record.distance);
            if closer {
                best = Some(HitRecord::from_sphere(ray, sphere, far));
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::HIT_RANGE;

    fn unit_sphere_at(center: Vec3A) -> Sphere {
        Sphere::lambertian(center, 1.0, Vec3A::ONE).unwrap()
    }

    #[test]
    fn axis_aligned_hit() {
        let ray = Ray::new(Vec3A::new(0.0, 0.0, -5.0), Vec3A::new(0.0, 0.0, 1.0));
        let spheres = [unit_sphere_at(Vec3A::ZERO)];

        let hit = intersect(&ray, HIT_RANGE, &spheres).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert!((hit.point - Vec3A::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert!((hit.normal - Vec3A::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn closest_of_two_overlapping_spheres_wins() {
        let ray = Ray::new(Vec3A::new(0.0, 0.0, -5.0), Vec3A::new(0.0, 0.0, 1.0));
        let near_sphere = unit_sphere_at(Vec3A::new(0.0, 0.0, -0.5));
        let far_sphere = unit_sphere_at(Vec3A::new(0.0, 0.0, 0.5));

        let near_only = intersect(&ray, HIT_RANGE, &[near_sphere]).unwrap();
        let far_only = intersect(&ray, HIT_RANGE, &[far_sphere]).unwrap();
        let both = intersect(&ray, HIT_RANGE, &[far_sphere, near_sphere]).unwrap();

        let expected = near_only.distance.min(far_only.distance);
        assert!((both.distance - expected).abs() < 1e-6);
    }

    #[test]
    fn miss_returns_none() {
        let ray = Ray::new(Vec3A::new(0.0, 0.0, -5.0), Vec3A::new(0.0, 0.0, -1.0));
        let spheres = [unit_sphere_at(Vec3A::ZERO)];
        assert!(intersect(&ray, HIT_RANGE, &spheres).is_none());
    }

    #[test]
    fn far_root_used_from_inside_the_sphere() {
        // Origin inside the sphere: the near root is behind tMin, the far
        // root is the exit point at distance 1.
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(1.0, 0.0, 0.0));
        let spheres = [unit_sphere_at(Vec3A::ZERO)];
        let hit = intersect(&ray, HIT_RANGE, &spheres).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-5);
        // Normal points away from the center even on the inside.
        assert!((hit.normal - Vec3A::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn tangent_ray_does_not_hit() {
        // Grazing ray: discriminant is zero, which is not accepted.
        let ray = Ray::new(Vec3A::new(1.0, 0.0, -5.0), Vec3A::new(0.0, 0.0, 1.0));
        let spheres = [unit_sphere_at(Vec3A::ZERO)];
        assert!(intersect(&ray, HIT_RANGE, &spheres).is_none());
    }
}

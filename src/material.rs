//! Per-material scatter functions.
//!
//! Each scatter produces an outgoing direction, an attenuation color and a
//! continuation decision. The metal fuzz offset is deliberately scaled by
//! fuzz twice (`fuzz * rand * fuzz`), matching the reference behavior; see
//! DESIGN.md before "fixing" it.

use glam::Vec3A;
use rand::Rng;

use crate::hit::HitRecord;
use crate::random;
use crate::ray::Ray;
use crate::sphere::MaterialKind;

/// Outcome of one material interaction.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    /// Multiplicative color factor applied to light carried backward
    /// along this bounce.
    pub attenuation: Vec3A,
    /// Outgoing direction, not yet normalized.
    pub direction: Vec3A,
    /// False when the path is absorbed at this bounce.
    pub continues: bool,
}

/// Mirror reflection of `v` about the unit normal `n`.
fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

/// Schlick's approximation of Fresnel reflectance.
pub fn schlick(cosine: f32, refractive_index: f32) -> f32 {
    let r0 = (1.0 - refractive_index) / (1.0 + refractive_index);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Scatter the incoming ray at a surface hit.
pub fn scatter(ray: &Ray, hit: &HitRecord, rng: &mut impl Rng) -> Scatter {
    match hit.material {
        MaterialKind::Lambertian => {
            let direction = (hit.normal + random::uniform_in_unit_sphere(rng)).normalize();
            Scatter {
                attenuation: hit.albedo,
                direction,
                continues: true,
            }
        }
        MaterialKind::Metal => {
            let reflected = reflect(ray.direction, hit.normal);
            let direction =
                reflected + hit.fuzz * random::uniform_in_unit_sphere(rng) * hit.fuzz;
            Scatter {
                attenuation: hit.albedo,
                continues: direction.dot(hit.normal) > 0.0,
                direction,
            }
        }
        MaterialKind::Refractive => {
            let reflected = reflect(ray.direction, hit.normal);

            // Entering vs. exiting decides the normal orientation and the
            // index ratio; the Schlick cosine keeps the un-flipped normal
            // convention of the reference.
            let entering = ray.direction.dot(hit.normal) <= 0.0;
            let (outward_normal, ni_over_nt, cosine) = if entering {
                (
                    hit.normal,
                    1.0 / hit.refractive_index,
                    -ray.direction.dot(hit.normal),
                )
            } else {
                (
                    -hit.normal,
                    hit.refractive_index,
                    hit.refractive_index * ray.direction.dot(hit.normal),
                )
            };

            let dt = ray.direction.dot(outward_normal);
            let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);

            let (reflectance, refracted) = if discriminant > 0.0 {
                let refracted = ni_over_nt * (ray.direction - outward_normal * dt)
                    - outward_normal * discriminant.sqrt();
                (schlick(cosine, hit.refractive_index), refracted)
            } else {
                // Total internal reflection: always reflect.
                (1.0, Vec3A::ZERO)
            };

            let direction = if random::random_f32(rng) < reflectance {
                reflected
            } else {
                refracted
            };

            Scatter {
                attenuation: Vec3A::ONE,
                direction,
                continues: true,
            }
        }
    }
}

//! Iterative path integrator.
//!
//! The recursive formulation `emission + attenuation * trace(scattered)` is
//! unrolled into a bounded loop recording per-bounce emission and
//! attenuation, then folded from the deepest recorded step back to the
//! primary hit. A path that escapes, is absorbed, or reaches the bounce cap
//! contributes exactly the ambient term at its truncation point, and the
//! truncating step itself is excluded from the fold.

use glam::Vec3A;
use rand::Rng;

use crate::config::RenderConfig;
use crate::hit::intersect;
use crate::interval::HIT_RANGE;
use crate::material::scatter;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Reusable per-bounce emission/attenuation storage, sized to the bounce
/// cap once per worker instead of once per sample.
#[derive(Debug, Default)]
pub struct TraceScratch {
    emission: Vec<Vec3A>,
    attenuation: Vec<Vec3A>,
}

impl TraceScratch {
    /// Allocate scratch space for paths of at most `max_bounces` steps.
    pub fn new(max_bounces: u32) -> Self {
        Self {
            emission: Vec::with_capacity(max_bounces as usize),
            attenuation: Vec::with_capacity(max_bounces as usize),
        }
    }
}

/// Trace one sample ray through the scene and return its color.
pub fn trace(
    primary: Ray,
    spheres: &[Sphere],
    config: &RenderConfig,
    rng: &mut impl Rng,
    scratch: &mut TraceScratch,
) -> Vec3A {
    scratch.emission.clear();
    scratch.attenuation.clear();

    let mut ray = primary;
    for _ in 0..config.max_bounces {
        let Some(hit) = intersect(&ray, HIT_RANGE, spheres) else {
            break;
        };
        let s = scatter(&ray, &hit, rng);
        if !s.continues {
            break;
        }
        scratch.emission.push(hit.emission);
        scratch.attenuation.push(s.attenuation);

        let mut next = Ray::new(hit.point, s.direction);
        next.pixel = ray.pixel;
        ray = next;
    }

    let mut color = config.ambient();
    for i in (0..scratch.emission.len()).rev() {
        color = scratch.emission[i] + color * scratch.attenuation[i];
    }
    color
}

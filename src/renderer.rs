//! CPU parallel dispatcher.
//!
//! One pass renders every pixel once at `sample_rate` samples. The flat
//! pixel range [0, width*height) is partitioned into `worker_count`
//! contiguous disjoint batches (the last batch absorbs the remainder);
//! one worker task is spawned per batch and writes only its own slice of
//! the per-pass output buffer. The scope join is the barrier: the caller
//! never observes a partially written pass.

use glam::Vec3A;

use crate::camera::CameraGeometry;
use crate::config::RenderConfig;
use crate::integrator::{trace, TraceScratch};
use crate::random;
use crate::ray::Ray;
use crate::scene::Scene;

/// Render one pass into `out`, a buffer of `width * height` pixels in flat
/// `x * height + y` order holding per-pixel sample averages.
///
/// The pass index keeps successive passes on distinct random streams; a
/// given (seed, pass, pixel) triple always produces the same color, no
/// matter how many workers the range is split across.
pub fn render_pass(
    scene: &Scene,
    geometry: &CameraGeometry,
    config: &RenderConfig,
    pass: u32,
    out: &mut [Vec3A],
) {
    let camera = &scene.camera;
    let total = (camera.width * camera.height) as usize;
    debug_assert_eq!(out.len(), total);

    let workers = config.worker_count.min(total.max(1));
    let batch = total / workers;

    rayon::scope(|s| {
        let mut rest = out;
        let mut start = 0usize;
        for worker in 0..workers {
            let len = if worker == workers - 1 {
                total - start
            } else {
                batch
            };
            let (slice, tail) = rest.split_at_mut(len);
            rest = tail;
            let batch_start = start;
            start += len;

            s.spawn(move |_| {
                let mut scratch = TraceScratch::new(config.max_bounces);
                for (offset, pixel) in slice.iter_mut().enumerate() {
                    let pixel_index = batch_start + offset;
                    *pixel = sample_pixel(scene, geometry, config, pass, pixel_index, &mut scratch);
                }
            });
        }
    });
}

/// Average `sample_rate` jittered samples for one pixel.
fn sample_pixel(
    scene: &Scene,
    geometry: &CameraGeometry,
    config: &RenderConfig,
    pass: u32,
    pixel_index: usize,
    scratch: &mut TraceScratch,
) -> Vec3A {
    let camera = &scene.camera;
    let x = pixel_index as u32 / camera.height;
    let y = pixel_index as u32 % camera.height;
    let base = geometry.pixel_position(camera, x, y);

    let mut rng = random::pixel_stream(config.seed, pass, pixel_index);
    let mut color = Vec3A::ZERO;
    for _ in 0..config.sample_rate {
        let offset = random::pixel_jitter(
            &mut rng,
            geometry.width_per_pixel,
            geometry.height_per_pixel,
        );
        let ray = Ray::for_pixel(camera.position, base + offset - camera.position, (x, y));
        color += trace(ray, &scene.spheres, config, &mut rng, scratch);
    }
    color / config.sample_rate as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::sphere::Sphere;

    fn test_scene() -> Scene {
        let camera = Camera::look_at(
            Vec3A::new(0.0, 0.0, -4.0),
            Vec3A::ZERO,
            Vec3A::Y,
            6,
            5,
            60.0,
            1.0,
        )
        .unwrap();
        let spheres = vec![
            Sphere::lambertian(Vec3A::ZERO, 1.0, Vec3A::new(0.8, 0.3, 0.3)).unwrap(),
            Sphere::metal(Vec3A::new(1.5, 0.0, 0.0), 0.5, Vec3A::splat(0.9), 0.2).unwrap(),
        ];
        Scene::new(camera, spheres).unwrap()
    }

    #[test]
    fn worker_count_does_not_change_pixel_results() {
        let scene = test_scene();
        let geometry = scene.camera.geometry();
        let total = (scene.camera.width * scene.camera.height) as usize;

        let sequential = RenderConfig {
            worker_count: 1,
            sample_rate: 4,
            seed: 99,
            ..RenderConfig::default()
        };
        let parallel = RenderConfig {
            worker_count: 4,
            ..sequential.clone()
        };

        let mut a = vec![Vec3A::ZERO; total];
        let mut b = vec![Vec3A::ZERO; total];
        render_pass(&scene, &geometry, &sequential, 0, &mut a);
        render_pass(&scene, &geometry, &parallel, 0, &mut b);

        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa, pb);
        }
    }

    #[test]
    fn passes_use_distinct_sample_streams() {
        let scene = test_scene();
        let geometry = scene.camera.geometry();
        let total = (scene.camera.width * scene.camera.height) as usize;
        let config = RenderConfig {
            sample_rate: 2,
            seed: 7,
            ..RenderConfig::default()
        };

        let mut first = vec![Vec3A::ZERO; total];
        let mut second = vec![Vec3A::ZERO; total];
        render_pass(&scene, &geometry, &config, 0, &mut first);
        render_pass(&scene, &geometry, &config, 1, &mut second);
        assert_ne!(first, second);
    }
}

//! End-to-end rendering properties on small scenes.

use glam::Vec3A;

use emberpath::accum::AccumulationBuffer;
use emberpath::camera::Camera;
use emberpath::config::RenderConfig;
use emberpath::renderer::render_pass;
use emberpath::scene::Scene;
use emberpath::session::{Backend, RenderSession};
use emberpath::sphere::{MaterialKind, Sphere};

fn camera(width: u32, height: u32) -> Camera {
    Camera::look_at(
        Vec3A::new(0.0, 0.0, -4.0),
        Vec3A::ZERO,
        Vec3A::Y,
        width,
        height,
        60.0,
        1.0,
    )
    .unwrap()
}

fn mixed_scene(width: u32, height: u32) -> Scene {
    let spheres = vec![
        Sphere::lambertian(Vec3A::new(-0.8, 0.0, 0.0), 0.7, Vec3A::new(0.8, 0.3, 0.3)).unwrap(),
        Sphere::metal(Vec3A::new(0.8, 0.0, 0.0), 0.7, Vec3A::splat(0.9), 0.2).unwrap(),
        Sphere::refractive(Vec3A::new(0.0, 0.9, 0.0), 0.5, 1.5).unwrap(),
        Sphere::new(
            Vec3A::new(0.0, 3.0, 0.0),
            1.0,
            Vec3A::ONE,
            Vec3A::splat(5.0),
            MaterialKind::Lambertian,
            0.0,
            1.0,
        )
        .unwrap(),
    ];
    Scene::new(camera(width, height), spheres).unwrap()
}

fn config(workers: usize) -> RenderConfig {
    RenderConfig {
        sample_rate: 4,
        max_bounces: 6,
        worker_count: workers,
        seed: 1234,
        ..RenderConfig::default()
    }
}

#[test]
fn empty_view_yields_the_ambient_color_everywhere() {
    // The only sphere sits behind the camera, so every primary ray misses.
    let scene = Scene::new(
        camera(5, 4),
        vec![Sphere::lambertian(Vec3A::new(0.0, 0.0, -50.0), 1.0, Vec3A::ONE).unwrap()],
    )
    .unwrap();
    let config = config(2);
    let ambient = config.ambient();
    let geometry = scene.camera.geometry();

    let mut out = vec![Vec3A::ZERO; 20];
    render_pass(&scene, &geometry, &config, 0, &mut out);
    for pixel in &out {
        assert!((*pixel - ambient).length() < 1e-6);
    }
}

#[test]
fn worker_partitioning_never_changes_the_image() {
    let width = 9;
    let height = 7;
    let passes = 2;

    let render = |workers: usize| -> Vec<Vec3A> {
        let mut session =
            RenderSession::new(mixed_scene(width, height), config(workers), Backend::Cpu).unwrap();
        session.start();
        for _ in 0..passes {
            session.render_pass().unwrap();
        }
        session.image().to_vec()
    };

    let sequential = render(1);
    let parallel = render(5);
    assert_eq!(sequential, parallel);
}

#[test]
fn accumulated_image_equals_the_mean_of_its_passes() {
    let width = 6;
    let height = 6;
    let scene = mixed_scene(width, height);
    let config = config(3);
    let geometry = scene.camera.geometry();
    let total = (width * height) as usize;

    let mut accum = AccumulationBuffer::new(total, config.sample_rate);
    let mut pass_results = Vec::new();
    for pass in 0..4u32 {
        let mut out = vec![Vec3A::ZERO; total];
        render_pass(&scene, &geometry, &config, pass, &mut out);
        accum.blend(&out);
        pass_results.push(out);
    }

    for pixel in 0..total {
        let mean = pass_results.iter().map(|p| p[pixel]).sum::<Vec3A>() / pass_results.len() as f32;
        assert!((accum.values()[pixel] - mean).length() < 1e-4);
    }
}

#[test]
fn sessions_are_reproducible_from_their_seed() {
    let render = || -> Vec<Vec3A> {
        let mut session =
            RenderSession::new(mixed_scene(8, 6), config(3), Backend::Cpu).unwrap();
        session.start();
        for _ in 0..3 {
            session.render_pass().unwrap();
        }
        session.image().to_vec()
    };
    assert_eq!(render(), render());
}

#[test]
fn emissive_sphere_brightens_the_image_over_the_ambient_floor() {
    // Sanity check that emission is actually folded into the result: the
    // pixel looking straight at the light is brighter than ambient alone.
    let scene = Scene::new(
        camera(3, 3),
        vec![Sphere::new(
            Vec3A::ZERO,
            1.0,
            Vec3A::splat(0.5),
            Vec3A::splat(10.0),
            MaterialKind::Lambertian,
            0.0,
            1.0,
        )
        .unwrap()],
    )
    .unwrap();
    let config = config(1);
    let geometry = scene.camera.geometry();
    let mut out = vec![Vec3A::ZERO; 9];
    render_pass(&scene, &geometry, &config, 0, &mut out);

    // Center pixel of the 3x3 grid looks at the sphere center.
    let center = out[(1 * 3 + 1) as usize];
    let ambient = config.ambient();
    assert!(center.length() > ambient.length());
}

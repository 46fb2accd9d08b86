use clap::Parser;
use glam::Vec3A;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

mod cli;
mod logger;

use cli::Args;
use emberpath::camera::Camera;
use emberpath::config::RenderConfig;
use emberpath::error::SceneError;
use emberpath::gpu::GpuRenderer;
use emberpath::output::{buffer_to_image, save_image_as_exr, save_image_as_png, send_image_to_tev};
use emberpath::scene::Scene;
use emberpath::session::{Backend, RenderSession};
use emberpath::sphere::Sphere;
use logger::init_logger;

/// Demo scene: a ground sphere, three feature spheres (diffuse, metal,
/// glass) and one emissive sphere lighting them from above.
fn create_scene(width: u32, height: u32) -> Result<Scene, SceneError> {
    let camera = Camera::look_at(
        Vec3A::new(0.0, 1.2, -6.0),
        Vec3A::new(0.0, 0.8, 0.0),
        Vec3A::Y,
        width,
        height,
        45.0,
        1.0,
    )?;

    let emission_intensity = 4.0;
    let spheres = vec![
        // Ground
        Sphere::lambertian(
            Vec3A::new(0.0, -100.0, 0.0),
            100.0,
            Vec3A::new(0.5, 0.5, 0.5),
        )?,
        // Feature spheres
        Sphere::lambertian(Vec3A::new(-2.1, 1.0, 0.0), 1.0, Vec3A::new(0.7, 0.2, 0.2))?,
        Sphere::metal(Vec3A::new(0.0, 1.0, 0.0), 1.0, Vec3A::new(0.8, 0.7, 0.6), 0.3)?,
        Sphere::refractive(Vec3A::new(2.1, 1.0, 0.0), 1.0, 1.5)?,
        // Light
        Sphere::new(
            Vec3A::new(0.0, 5.5, -1.0),
            1.5,
            Vec3A::ONE,
            Vec3A::new(1.0, 0.95, 0.9) * emission_intensity,
            emberpath::sphere::MaterialKind::Lambertian,
            0.0,
            1.0,
        )?,
    ];

    Scene::new(camera, spheres)
}

fn main() {
    let args = Args::parse();
    init_logger(args.debug_level.into());

    info!(
        "emberpath - Git Version {} ({})",
        env!("GIT_HASH"),
        env!("GIT_DATE")
    );

    let scene = match create_scene(args.width, args.height) {
        Ok(scene) => scene,
        Err(e) => {
            error!("Failed to build scene: {}", e);
            std::process::exit(1);
        }
    };

    let config = RenderConfig {
        sample_rate: args.sample_rate,
        max_bounces: args.max_bounces,
        ambient_intensity: args.ambient_intensity,
        seed: args.seed,
        worker_count: args
            .workers
            .unwrap_or_else(|| RenderConfig::default().worker_count),
        ..RenderConfig::default()
    };

    let backend = if args.gpu {
        match GpuRenderer::new() {
            Ok(gpu) => {
                info!("Using GPU compute backend");
                Backend::Gpu(gpu)
            }
            Err(e) => {
                error!("GPU backend unavailable: {}, falling back to CPU", e);
                Backend::Cpu
            }
        }
    } else {
        info!("Using CPU backend with {} workers", config.worker_count);
        Backend::Cpu
    };

    let mut session = match RenderSession::new(scene, config, backend) {
        Ok(session) => session,
        Err(e) => {
            error!("Invalid render configuration: {}", e);
            std::process::exit(1);
        }
    };

    let tev_address = args
        .tev_address
        .clone()
        .or_else(|| args.tev.then(|| "localhost:14158".to_string()));

    let start = std::time::Instant::now();
    session.start();

    let pb = ProgressBar::new(args.passes as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40} pass {pos}/{len} ETA: {eta}")
            .unwrap(),
    );
    for _ in 0..args.passes {
        if let Err(e) = session.render_pass() {
            error!("Render pass failed: {}", e);
            std::process::exit(1);
        }
        if let Some(address) = &tev_address {
            let image = buffer_to_image(session.image(), args.width, args.height);
            send_image_to_tev(&image, address);
        }
        pb.inc(1);
    }
    pb.finish();
    session.stop();

    info!(
        "{} passes rendered in {:.2?}",
        session.pass_count(),
        start.elapsed()
    );

    let image = buffer_to_image(session.image(), args.width, args.height);
    if args.output.ends_with(".exr") {
        save_image_as_exr(&image, &args.output);
    } else if args.output.ends_with(".png") {
        save_image_as_png(&image, &args.output);
    } else {
        error!(
            "Unsupported file extension '{}'. Only .png and .exr formats are supported.",
            std::path::Path::new(&args.output)
                .extension()
                .unwrap_or_default()
                .to_string_lossy()
        );
        std::process::exit(1);
    }
}

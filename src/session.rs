//! Progressive render session.
//!
//! Owns the accumulation buffer and the chosen execution backend, and
//! exposes the start / render_pass / stop lifecycle. The session itself
//! has no notion of frame timing; an external scheduler decides when to
//! invoke [`RenderSession::render_pass`]. Passes are strictly sequential:
//! pass N+1's blend always observes pass N's fully joined output.

use glam::Vec3A;
use log::{debug, info};

use crate::accum::AccumulationBuffer;
use crate::camera::CameraGeometry;
use crate::config::RenderConfig;
use crate::error::{ConfigError, SceneError};
use crate::gpu::GpuRenderer;
use crate::renderer;
use crate::scene::Scene;

/// Execution backend for a session.
pub enum Backend {
    /// Multi-threaded CPU dispatch.
    Cpu,
    /// GPU compute dispatch.
    Gpu(GpuRenderer),
}

/// A progressive refinement session over one scene.
pub struct RenderSession {
    scene: Scene,
    geometry: CameraGeometry,
    config: RenderConfig,
    accum: AccumulationBuffer,
    pass_buffer: Vec<Vec3A>,
    backend: Backend,
    running: bool,
}

impl RenderSession {
    /// Create a session, validating the configuration up front.
    pub fn new(scene: Scene, config: RenderConfig, mut backend: Backend) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = scene.camera.geometry();
        let pixel_count = (scene.camera.width * scene.camera.height) as usize;
        if let Backend::Gpu(gpu) = &mut backend {
            gpu.upload_scene(&scene, &geometry, &config);
        }
        Ok(Self {
            accum: AccumulationBuffer::new(pixel_count, config.sample_rate),
            pass_buffer: vec![Vec3A::ZERO; pixel_count],
            scene,
            geometry,
            config,
            backend,
            running: false,
        })
    }

    /// Begin progressive refinement from an empty accumulation buffer.
    pub fn start(&mut self) {
        self.accum.reset();
        self.running = true;
        info!(
            "Render session started: {}x{}, {} samples/pixel/pass, {} bounce cap",
            self.scene.camera.width,
            self.scene.camera.height,
            self.config.sample_rate,
            self.config.max_bounces,
        );
    }

    /// Render one pass and blend it into the accumulated image.
    ///
    /// Returns the accumulated per-pixel averages after the blend, in flat
    /// `x * height + y` order. No-op returning the current image when the
    /// session is not running.
    pub fn render_pass(&mut self) -> Result<&[Vec3A], crate::error::GpuError> {
        if !self.running {
            return Ok(self.accum.values());
        }
        let pass = self.accum.pass_count();
        match &mut self.backend {
            Backend::Cpu => {
                renderer::render_pass(
                    &self.scene,
                    &self.geometry,
                    &self.config,
                    pass,
                    &mut self.pass_buffer,
                );
                self.accum.blend(&self.pass_buffer);
            }
            Backend::Gpu(gpu) => {
                let blended = gpu.render_pass(pass)?;
                self.accum.adopt(blended);
            }
        }
        debug!("pass {} blended", pass);
        Ok(self.accum.values())
    }

    /// Stop refinement; the accumulated image remains readable.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Replace the scene mid-session.
    ///
    /// Re-derives the camera geometry, re-uploads GPU buffers, and resets
    /// the accumulator so stale results are not blended with the new
    /// scene's.
    pub fn replace_scene(&mut self, scene: Scene) -> Result<(), SceneError> {
        scene.camera.validate()?;
        let geometry = scene.camera.geometry();
        let pixel_count = (scene.camera.width * scene.camera.height) as usize;

        self.scene = scene;
        self.geometry = geometry;
        self.accum = AccumulationBuffer::new(pixel_count, self.config.sample_rate);
        self.pass_buffer = vec![Vec3A::ZERO; pixel_count];
        if let Backend::Gpu(gpu) = &mut self.backend {
            gpu.upload_scene(&self.scene, &self.geometry, &self.config);
        }
        Ok(())
    }

    /// Number of passes blended so far.
    pub fn pass_count(&self) -> u32 {
        self.accum.pass_count()
    }

    /// Accumulated image, flat `x * height + y` order.
    pub fn image(&self) -> &[Vec3A] {
        self.accum.values()
    }

    /// Scene currently being rendered.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Active configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::sphere::Sphere;

    fn session() -> RenderSession {
        let camera = Camera::look_at(
            Vec3A::new(0.0, 0.0, -4.0),
            Vec3A::ZERO,
            Vec3A::Y,
            4,
            4,
            60.0,
            1.0,
        )
        .unwrap();
        let scene = Scene::new(
            camera,
            vec![Sphere::lambertian(Vec3A::ZERO, 1.0, Vec3A::splat(0.5)).unwrap()],
        )
        .unwrap();
        let config = RenderConfig {
            sample_rate: 2,
            worker_count: 2,
            seed: 5,
            ..RenderConfig::default()
        };
        RenderSession::new(scene, config, Backend::Cpu).unwrap()
    }

    #[test]
    fn passes_advance_only_while_running() {
        let mut s = session();
        s.render_pass().unwrap();
        assert_eq!(s.pass_count(), 0);

        s.start();
        s.render_pass().unwrap();
        s.render_pass().unwrap();
        assert_eq!(s.pass_count(), 2);

        s.stop();
        s.render_pass().unwrap();
        assert_eq!(s.pass_count(), 2);
    }

    #[test]
    fn replace_scene_resets_accumulation() {
        let mut s = session();
        s.start();
        s.render_pass().unwrap();
        assert_eq!(s.pass_count(), 1);

        let new_scene = s.scene().clone();
        s.replace_scene(new_scene).unwrap();
        assert_eq!(s.pass_count(), 0);
        assert!(s.image().iter().all(|&v| v == Vec3A::ZERO));
    }

    #[test]
    fn rejects_invalid_config() {
        let scene = session().scene.clone();
        let config = RenderConfig {
            sample_rate: 0,
            ..RenderConfig::default()
        };
        assert!(RenderSession::new(scene, config, Backend::Cpu).is_err());
    }
}

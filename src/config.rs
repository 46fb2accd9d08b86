//! Render configuration.

use glam::Vec3A;

use crate::error::ConfigError;

/// Quality and execution settings for a render session.
///
/// Supplied once per session and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Samples per pixel per pass.
    pub sample_rate: u32,
    /// Cap on path length; a path records at most this many bounces.
    pub max_bounces: u32,
    /// Color returned when a ray escapes the scene, before intensity scaling.
    pub ambient_color: Vec3A,
    /// Multiplier applied to the ambient color.
    pub ambient_intensity: f32,
    /// Number of CPU worker batches the pixel range is partitioned into.
    pub worker_count: usize,
    /// Base seed for the deterministic per-pixel random streams.
    pub seed: u64,
}

impl RenderConfig {
    /// Validate the configuration, failing fast before a session starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.worker_count == 0 {
            return Err(ConfigError::InvalidWorkerCount(self.worker_count));
        }
        if !(self.ambient_intensity >= 0.0) {
            return Err(ConfigError::InvalidAmbientIntensity(self.ambient_intensity));
        }
        Ok(())
    }

    /// Ambient light term: color scaled by intensity.
    pub fn ambient(&self) -> Vec3A {
        self.ambient_color * self.ambient_intensity
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16,
            max_bounces: 8,
            ambient_color: Vec3A::new(0.5, 0.7, 1.0),
            ambient_intensity: 1.0,
            worker_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            seed: 0,
        }
    }
}

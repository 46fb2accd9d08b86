//! Error types for fail-fast validation.
//!
//! The hot rendering path is total over its valid inputs; errors are only
//! reported for invalid configuration or scene construction, before a
//! session starts, and for GPU backend initialization.

use thiserror::Error;

/// Invalid render configuration, rejected before a session starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sample rate must be a positive number of samples per pixel.
    #[error("sample rate must be positive, got {0}")]
    InvalidSampleRate(u32),
    /// Worker count must be positive so the pixel range can be partitioned.
    #[error("worker count must be positive, got {0}")]
    InvalidWorkerCount(usize),
    /// Ambient intensity must be non-negative.
    #[error("ambient intensity must be non-negative, got {0}")]
    InvalidAmbientIntensity(f32),
}

/// Invalid scene or camera construction.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Sphere radius must be strictly positive.
    #[error("sphere radius must be positive, got {radius}")]
    InvalidRadius {
        /// The rejected radius value.
        radius: f32,
    },
    /// Camera resolution must be positive in both dimensions.
    #[error("camera resolution must be positive, got {width}x{height}")]
    InvalidResolution {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// Camera basis vectors must have non-zero length.
    #[error("camera basis vector '{axis}' is degenerate")]
    DegenerateBasis {
        /// Which basis vector failed.
        axis: &'static str,
    },
}

/// GPU backend initialization or execution failure.
#[derive(Debug, Error)]
pub enum GpuError {
    /// No compute-capable adapter was found.
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    /// The adapter refused to create a device.
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    /// Reading the rendered image back from the device failed.
    #[error("failed to read back GPU output: {0}")]
    Readback(String),
    /// A pass was dispatched before the scene was uploaded.
    #[error("no scene uploaded to the GPU backend")]
    NoScene,
}

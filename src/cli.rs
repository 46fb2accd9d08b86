use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "emberpath")]
#[command(about = "A progressive sphere path tracer")]
pub struct Args {
    /// Set the logging level
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "800", help = "Image width in pixels")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "600", help = "Image height in pixels")]
    pub height: u32,

    /// Samples per pixel per refinement pass
    #[arg(long, short = 's', default_value = "16", help = "Samples per pixel per pass")]
    pub sample_rate: u32,

    /// Maximum number of path bounces
    #[arg(long, default_value = "8", help = "Maximum number of path bounces")]
    pub max_bounces: u32,

    /// Number of progressive refinement passes to run
    #[arg(long, short = 'p', default_value = "8", help = "Number of refinement passes")]
    pub passes: u32,

    /// Number of CPU worker batches (defaults to the number of cores)
    #[arg(long, help = "Number of CPU worker batches (defaults to the number of cores)")]
    pub workers: Option<usize>,

    /// Seed for the deterministic sample streams
    #[arg(long, default_value = "0", help = "Seed for the deterministic sample streams")]
    pub seed: u64,

    /// Ambient light intensity multiplier
    #[arg(long, default_value = "1.0", help = "Ambient light intensity multiplier")]
    pub ambient_intensity: f32,

    /// Use the GPU compute backend instead of CPU threads
    #[arg(long = "gpu", help = "Use the GPU compute backend instead of CPU threads")]
    pub gpu: bool,

    /// Send each pass to TEV for real-time visualization
    #[arg(long, help = "Send each pass to TEV for real-time visualization")]
    pub tev: bool,

    /// TEV client IP address and port (automatically enables --tev)
    #[arg(long, help = "TEV client IP address and port (automatically enables --tev)")]
    pub tev_address: Option<String>,

    /// Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)
    #[arg(short, long, default_value = "output.png", help = "Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)")]
    pub output: String,
}

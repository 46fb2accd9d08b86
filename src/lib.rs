//! emberpath progressive path tracer
//!
//! Renders scenes of spheres with diffuse, metal and dielectric materials,
//! refining the image over repeated passes on either a multi-threaded CPU
//! backend or a GPU compute backend.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod accum;
pub mod camera;
pub mod config;
pub mod error;
pub mod gpu;
pub mod hit;
pub mod integrator;
pub mod interval;
pub mod material;
pub mod output;
pub mod random;
pub mod ray;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod sphere;

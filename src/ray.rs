//! Ray representation for path tracing.
//!
//! A ray is defined as r(t) = origin + t * direction. Directions are
//! normalized at construction, so every observable ray satisfies
//! |direction| == 1 and hit distances are world-space distances.

use glam::Vec3A;

/// Ray in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    pub origin: Vec3A,
    /// Unit direction vector, normalized by the constructor.
    pub direction: Vec3A,
    /// Pixel coordinate this ray was spawned for, when known.
    ///
    /// Carried for parity with the GPU kernel, which addresses its output
    /// image by pixel coordinate; the CPU path does not require it.
    pub pixel: Option<(u32, u32)>,
}

impl Ray {
    /// Create a new ray; the direction is normalized here.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            pixel: None,
        }
    }

    /// Create a ray tagged with the pixel coordinate it samples.
    pub fn for_pixel(origin: Vec3A, direction: Vec3A, pixel: (u32, u32)) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            pixel: Some(pixel),
        }
    }

    /// Compute the point at parameter t along the ray.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }
}

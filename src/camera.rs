//! Camera model and its derived near-plane geometry.
//!
//! The camera is a plain record of position, orthonormal basis, resolution
//! and field of view. Everything ray generation needs (world-space near
//! plane, per-pixel world step, lower-left corner) is a pure function of
//! those fields, computed once per scene load into [`CameraGeometry`] and
//! reused for every sample.

use glam::Vec3A;

use crate::error::SceneError;

/// Pinhole camera with an explicit orthonormal basis.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3A,
    /// Unit view direction.
    pub forward: Vec3A,
    /// Unit up vector.
    pub up: Vec3A,
    /// Unit right vector.
    pub right: Vec3A,
    /// Image width in pixels, positive.
    pub width: u32,
    /// Image height in pixels, positive.
    pub height: u32,
    /// Vertical field of view in degrees.
    pub vfov: f32,
    /// Distance from the camera to the near plane the rays pass through.
    pub near_plane: f32,
}

impl Camera {
    /// Build a camera looking from `position` toward `target`.
    ///
    /// The basis is derived from the view direction and a world-up hint,
    /// then validated together with the resolution.
    pub fn look_at(
        position: Vec3A,
        target: Vec3A,
        world_up: Vec3A,
        width: u32,
        height: u32,
        vfov: f32,
        near_plane: f32,
    ) -> Result<Self, SceneError> {
        let forward = target - position;
        if forward.length_squared() < 1e-12 {
            return Err(SceneError::DegenerateBasis { axis: "forward" });
        }
        let forward = forward.normalize();
        let right = world_up.cross(forward);
        if right.length_squared() < 1e-12 {
            return Err(SceneError::DegenerateBasis { axis: "right" });
        }
        let right = right.normalize();
        let up = forward.cross(right);

        let camera = Self {
            position,
            forward,
            up,
            right,
            width,
            height,
            vfov,
            near_plane,
        };
        camera.validate()?;
        Ok(camera)
    }

    /// Reject resolutions that would divide by zero when deriving the
    /// per-pixel world step.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Aspect ratio, width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Derive the near-plane geometry from the current camera fields.
    ///
    /// Must be called again whenever any camera field changes.
    pub fn geometry(&self) -> CameraGeometry {
        let near_plane_height = self.near_plane * (self.vfov.to_radians() * 0.5).tan() * 2.0;
        let near_plane_width = self.aspect_ratio() * near_plane_height;

        let height_per_pixel = near_plane_height / self.height as f32;
        let width_per_pixel = near_plane_width / self.width as f32;

        let lower_left = self.position + self.forward * self.near_plane
            - self.right * 0.5 * near_plane_width
            - self.up * 0.5 * near_plane_height;

        CameraGeometry {
            near_plane_width,
            near_plane_height,
            width_per_pixel,
            height_per_pixel,
            lower_left,
        }
    }
}

/// World-space near-plane quantities derived from a [`Camera`].
#[derive(Debug, Clone, Copy)]
pub struct CameraGeometry {
    /// Width of the near plane in world units.
    pub near_plane_width: f32,
    /// Height of the near plane in world units.
    pub near_plane_height: f32,
    /// World-space width of one pixel's footprint.
    pub width_per_pixel: f32,
    /// World-space height of one pixel's footprint.
    pub height_per_pixel: f32,
    /// World position of the lower-left corner of the near plane.
    pub lower_left: Vec3A,
}

impl CameraGeometry {
    /// World position of the lower-left corner of pixel (x, y).
    ///
    /// Jitter within the pixel footprint is added by the sampler on top
    /// of this base position.
    pub fn pixel_position(&self, camera: &Camera, x: u32, y: u32) -> Vec3A {
        self.lower_left
            + camera.right * self.width_per_pixel * x as f32
            + camera.up * self.height_per_pixel * y as f32
    }

    /// Precompute every pixel's world position, in flat `x * height + y`
    /// order, for upload to the GPU backend.
    pub fn pixel_positions(&self, camera: &Camera) -> Vec<Vec3A> {
        let mut positions = Vec::with_capacity((camera.width * camera.height) as usize);
        for x in 0..camera.width {
            for y in 0..camera.height {
                positions.push(self.pixel_position(camera, x, y));
            }
        }
        positions
    }
}

//! Scene: one camera plus an ordered sphere list.

use crate::camera::Camera;
use crate::error::SceneError;
use crate::sphere::Sphere;

/// Scene rendered by a session.
///
/// Rebuilt once per render session (or scene-change event) by the external
/// scene provider and treated as read-only for the duration of a session.
/// Sphere order is irrelevant to results but kept stable for determinism.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Camera the image is rendered from.
    pub camera: Camera,
    /// Ordered sphere list.
    pub spheres: Vec<Sphere>,
}

impl Scene {
    /// Build a scene, validating the camera. Spheres validate themselves
    /// at construction, so the list is accepted as-is.
    pub fn new(camera: Camera, spheres: Vec<Sphere>) -> Result<Self, SceneError> {
        camera.validate()?;
        Ok(Self { camera, spheres })
    }
}

//! Sphere primitive and its GPU wire layout.
//!
//! Spheres are the only geometry; each carries its full shading state
//! (albedo, pre-scaled emission, material kind and parameters) so a hit
//! record can be filled by copy without chasing material references.

use glam::Vec3A;

use crate::error::SceneError;

/// Surface material kind, matching the numeric codes used by the GPU kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// Diffuse surface scattering around the normal.
    Lambertian,
    /// Specular reflection with fuzz roughness.
    Metal,
    /// Dielectric with Schlick reflect/refract selection.
    Refractive,
}

impl MaterialKind {
    /// Numeric code used in the 13-float GPU sphere record.
    pub fn code(self) -> f32 {
        match self {
            MaterialKind::Lambertian => 1.0,
            MaterialKind::Metal => 2.0,
            MaterialKind::Refractive => 3.0,
        }
    }

    /// Decode the numeric material code; unknown codes fall back to Lambertian.
    pub fn from_code(code: f32) -> Self {
        if code == 2.0 {
            MaterialKind::Metal
        } else if code == 3.0 {
            MaterialKind::Refractive
        } else {
            MaterialKind::Lambertian
        }
    }
}

/// Number of f32 values in one GPU sphere record.
pub const GPU_SPHERE_FLOATS: usize = 13;

/// Sphere defined by center, radius and full material state.
///
/// Immutable once the scene is built for a frame.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    /// Center point in world coordinates.
    pub center: Vec3A,
    /// Radius, strictly positive.
    pub radius: f32,
    /// Surface color, each channel in [0, 1].
    pub albedo: Vec3A,
    /// Emitted light, already scaled by the emission intensity factor.
    pub emission: Vec3A,
    /// Material kind selecting the scatter function.
    pub material: MaterialKind,
    /// Metal roughness; meaningful only for Metal.
    pub fuzz: f32,
    /// Index of refraction; meaningful only for Refractive.
    pub refractive_index: f32,
}

impl Sphere {
    /// Create a sphere, rejecting non-positive radii.
    ///
    /// A radius of zero or less would silently produce no intersections
    /// (or NaNs downstream), so it is refused up front.
    pub fn new(
        center: Vec3A,
        radius: f32,
        albedo: Vec3A,
        emission: Vec3A,
        material: MaterialKind,
        fuzz: f32,
        refractive_index: f32,
    ) -> Result<Self, SceneError> {
        if !(radius > 0.0) {
            return Err(SceneError::InvalidRadius { radius });
        }
        Ok(Self {
            center,
            radius,
            albedo,
            emission,
            material,
            fuzz,
            refractive_index,
        })
    }

    /// Convenience constructor for a diffuse, non-emissive sphere.
    pub fn lambertian(center: Vec3A, radius: f32, albedo: Vec3A) -> Result<Self, SceneError> {
        Self::new(center, radius, albedo, Vec3A::ZERO, MaterialKind::Lambertian, 0.0, 1.0)
    }

    /// Convenience constructor for a metal sphere.
    pub fn metal(center: Vec3A, radius: f32, albedo: Vec3A, fuzz: f32) -> Result<Self, SceneError> {
        Self::new(center, radius, albedo, Vec3A::ZERO, MaterialKind::Metal, fuzz, 1.0)
    }

    /// Convenience constructor for a glass sphere.
    pub fn refractive(center: Vec3A, radius: f32, refractive_index: f32) -> Result<Self, SceneError> {
        Self::new(
            center,
            radius,
            Vec3A::ONE,
            Vec3A::ZERO,
            MaterialKind::Refractive,
            0.0,
            refractive_index,
        )
    }

    /// Encode this sphere as the 13-float GPU record:
    /// position, albedo, emission, radius, material code, fuzz, refractive index.
    pub fn to_gpu(&self) -> [f32; GPU_SPHERE_FLOATS] {
        [
            self.center.x,
            self.center.y,
            self.center.z,
            self.albedo.x,
            self.albedo.y,
            self.albedo.z,
            self.emission.x,
            self.emission.y,
            self.emission.z,
            self.radius,
            self.material.code(),
            self.fuzz,
            self.refractive_index,
        ]
    }

    /// Decode a sphere from its 13-float GPU record.
    pub fn from_gpu(data: &[f32; GPU_SPHERE_FLOATS]) -> Self {
        Self {
            center: Vec3A::new(data[0], data[1], data[2]),
            albedo: Vec3A::new(data[3], data[4], data[5]),
            emission: Vec3A::new(data[6], data[7], data[8]),
            radius: data[9],
            material: MaterialKind::from_code(data[10]),
            fuzz: data[11],
            refractive_index: data[12],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_radius() {
        assert!(Sphere::lambertian(Vec3A::ZERO, 0.0, Vec3A::ONE).is_err());
        assert!(Sphere::lambertian(Vec3A::ZERO, -1.0, Vec3A::ONE).is_err());
        assert!(Sphere::lambertian(Vec3A::ZERO, f32::NAN, Vec3A::ONE).is_err());
        assert!(Sphere::lambertian(Vec3A::ZERO, 1.0, Vec3A::ONE).is_ok());
    }

    #[test]
    fn gpu_record_round_trips() {
        let sphere = Sphere::new(
            Vec3A::new(1.0, -2.0, 3.5),
            0.75,
            Vec3A::new(0.8, 0.6, 0.2),
            Vec3A::new(2.0, 2.0, 1.0),
            MaterialKind::Metal,
            0.3,
            1.5,
        )
        .unwrap();

        let encoded = sphere.to_gpu();
        let decoded = Sphere::from_gpu(&encoded);

        assert_eq!(decoded.center, sphere.center);
        assert_eq!(decoded.albedo, sphere.albedo);
        assert_eq!(decoded.emission, sphere.emission);
        assert_eq!(decoded.radius, sphere.radius);
        assert_eq!(decoded.material, sphere.material);
        assert_eq!(decoded.fuzz, sphere.fuzz);
        assert_eq!(decoded.refractive_index, sphere.refractive_index);
    }

    #[test]
    fn material_codes_match_kernel_constants() {
        assert_eq!(MaterialKind::from_code(1.0), MaterialKind::Lambertian);
        assert_eq!(MaterialKind::from_code(2.0), MaterialKind::Metal);
        assert_eq!(MaterialKind::from_code(3.0), MaterialKind::Refractive);
    }
}

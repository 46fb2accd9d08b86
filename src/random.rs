//! Deterministic sampling.
//!
//! Every call that needs randomness takes an explicit RNG handle. Streams
//! are ChaCha generators seeded per pixel from the config seed, the pass
//! index and the flat pixel index, so the partitioning of pixels across
//! workers never changes which stream a given pixel consumes and a render
//! is reproducible from its seed alone.

use glam::Vec3A;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// RNG type used by the CPU path.
pub type SampleRng = ChaCha8Rng;

/// Build the random stream for one pixel in one pass.
pub fn pixel_stream(seed: u64, pass: u32, pixel_index: usize) -> SampleRng {
    // splitmix-style mixing so neighbouring pixels and passes do not get
    // correlated ChaCha seeds.
    let mut state = seed
        ^ (pass as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
        ^ (pixel_index as u64).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    state ^= state >> 30;
    state = state.wrapping_mul(0x94d0_49bb_1331_11eb);
    state ^= state >> 31;
    SampleRng::seed_from_u64(state)
}

/// Uniform f32 in [0, 1).
pub fn random_f32(rng: &mut impl Rng) -> f32 {
    rng.random()
}

/// Jitter offset within one pixel's world-space footprint: two independent
/// uniforms in [0, 1) scaled by the per-pixel world width and height.
pub fn pixel_jitter(rng: &mut impl Rng, width_per_pixel: f32, height_per_pixel: f32) -> Vec3A {
    Vec3A::new(
        random_f32(rng) * width_per_pixel,
        random_f32(rng) * height_per_pixel,
        0.0,
    )
}

/// Rejection-sample a point uniformly inside the unit sphere: draw from
/// [-1, 1]^3 until the squared length is below 1.
pub fn uniform_in_unit_sphere(rng: &mut impl Rng) -> Vec3A {
    loop {
        let p = 2.0 * Vec3A::new(random_f32(rng), random_f32(rng), random_f32(rng)) - Vec3A::ONE;
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streams_are_deterministic() {
        let mut a = pixel_stream(42, 3, 1234);
        let mut b = pixel_stream(42, 3, 1234);
        for _ in 0..16 {
            assert_eq!(random_f32(&mut a), random_f32(&mut b));
        }
    }

    #[test]
    fn streams_differ_across_pixels_and_passes() {
        let mut base = pixel_stream(42, 0, 0);
        let mut other_pixel = pixel_stream(42, 0, 1);
        let mut other_pass = pixel_stream(42, 1, 0);
        let reference: Vec<f32> = (0..8).map(|_| random_f32(&mut base)).collect();
        let pixels: Vec<f32> = (0..8).map(|_| random_f32(&mut other_pixel)).collect();
        let passes: Vec<f32> = (0..8).map(|_| random_f32(&mut other_pass)).collect();
        assert_ne!(reference, pixels);
        assert_ne!(reference, passes);
    }

    #[test]
    fn unit_sphere_samples_are_inside() {
        let mut rng = pixel_stream(7, 0, 0);
        for _ in 0..256 {
            let p = uniform_in_unit_sphere(&mut rng);
            assert!(p.length_squared() < 1.0);
            assert!(p.x >= -1.0 && p.x <= 1.0);
        }
    }

    #[test]
    fn jitter_stays_inside_the_pixel_footprint() {
        let mut rng = pixel_stream(7, 0, 1);
        for _ in 0..64 {
            let j = pixel_jitter(&mut rng, 0.25, 0.5);
            assert!(j.x >= 0.0 && j.x < 0.25);
            assert!(j.y >= 0.0 && j.y < 0.5);
            assert_eq!(j.z, 0.0);
        }
    }
}

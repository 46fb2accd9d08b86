//! Progressive accumulation buffer.
//!
//! Keeps one running-average RGB value per pixel plus a global pass
//! counter. Each completed pass contributes `sample_rate` virtual samples
//! to a count-weighted cumulative average, which is exact as long as every
//! pass uses the same sample rate. Blending happens strictly between
//! passes on the controlling thread; workers never touch this buffer.

use glam::Vec3A;

/// Running per-pixel average across refinement passes.
#[derive(Debug)]
pub struct AccumulationBuffer {
    values: Vec<Vec3A>,
    pass_count: u32,
    sample_rate: u32,
}

impl AccumulationBuffer {
    /// Create an empty buffer for `pixel_count` pixels accumulated at
    /// `sample_rate` samples per pixel per pass.
    pub fn new(pixel_count: usize, sample_rate: u32) -> Self {
        Self {
            values: vec![Vec3A::ZERO; pixel_count],
            pass_count: 0,
            sample_rate,
        }
    }

    /// Number of passes blended so far.
    pub fn pass_count(&self) -> u32 {
        self.pass_count
    }

    /// Accumulated per-pixel averages, flat `x * height + y` order.
    pub fn values(&self) -> &[Vec3A] {
        &self.values
    }

    /// Fold one pass of per-pixel sample averages into the running average
    /// and advance the pass counter.
    pub fn blend(&mut self, pass_result: &[Vec3A]) {
        assert_eq!(pass_result.len(), self.values.len());
        let s = self.sample_rate as f32;
        let n = self.pass_count as f32;
        let denom = s * (n + 1.0);
        for (avg, &pass_avg) in self.values.iter_mut().zip(pass_result) {
            *avg = (*avg * s * n + pass_avg * s) / denom;
        }
        self.pass_count += 1;
    }

    /// Mirror a device-side blend: adopt values the GPU backend already
    /// blended against this buffer's pass counter, then advance it.
    pub fn adopt(&mut self, blended: Vec<Vec3A>) {
        assert_eq!(blended.len(), self.values.len());
        self.values = blended;
        self.pass_count += 1;
    }

    /// Discard all accumulated results and restart the pass counter.
    ///
    /// Invoked when the scene changes mid-session, so stale results are
    /// not blended with the new scene's.
    pub fn reset(&mut self) {
        self.values.fill(Vec3A::ZERO);
        self.pass_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k_equal_weight_passes_reduce_to_the_arithmetic_mean() {
        let passes = [
            vec![Vec3A::new(1.0, 0.0, 0.0), Vec3A::new(0.0, 4.0, 0.0)],
            vec![Vec3A::new(3.0, 0.0, 0.0), Vec3A::new(0.0, 2.0, 0.0)],
            vec![Vec3A::new(5.0, 0.0, 0.0), Vec3A::new(0.0, 0.0, 6.0)],
        ];
        let mut buffer = AccumulationBuffer::new(2, 8);
        for pass in &passes {
            buffer.blend(pass);
        }
        assert_eq!(buffer.pass_count(), 3);

        let mean0 = (passes[0][0] + passes[1][0] + passes[2][0]) / 3.0;
        let mean1 = (passes[0][1] + passes[1][1] + passes[2][1]) / 3.0;
        assert!((buffer.values()[0] - mean0).length() < 1e-5);
        assert!((buffer.values()[1] - mean1).length() < 1e-5);
    }

    #[test]
    fn first_pass_is_stored_verbatim() {
        let mut buffer = AccumulationBuffer::new(1, 4);
        buffer.blend(&[Vec3A::new(0.25, 0.5, 0.75)]);
        assert!((buffer.values()[0] - Vec3A::new(0.25, 0.5, 0.75)).length() < 1e-6);
    }

    #[test]
    fn reset_clears_values_and_pass_counter() {
        let mut buffer = AccumulationBuffer::new(1, 4);
        buffer.blend(&[Vec3A::ONE]);
        buffer.reset();
        assert_eq!(buffer.pass_count(), 0);
        assert_eq!(buffer.values()[0], Vec3A::ZERO);
        buffer.blend(&[Vec3A::splat(2.0)]);
        assert!((buffer.values()[0] - Vec3A::splat(2.0)).length() < 1e-6);
    }
}

//! Interval arithmetic for ray parameter ranges.

/// Interval of accepted hit distances.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Check if the interval surrounds the given value (exclusive bounds)
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }
}

/// Default acceptance range for shadow-acne-free intersection queries:
/// a small positive epsilon up to the representable maximum.
pub const HIT_RANGE: Interval = Interval {
    min: 1e-4,
    max: f32::MAX,
};

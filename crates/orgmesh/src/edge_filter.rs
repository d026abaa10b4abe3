//! Long-edge rejection for triangles that bridge depth discontinuities.

use glam::Vec3;

/// Rejects triangles with an edge longer than a threshold.
///
/// The threshold is given as a distance and stored squared, so the test
/// needs no square roots. Without a threshold nothing is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeFilter {
    sqr_threshold: Option<f32>,
}

impl EdgeFilter {
    /// Creates a filter from an optional linear distance.
    #[must_use]
    pub fn new(threshold: Option<f32>) -> Self {
        Self {
            sqr_threshold: threshold.map(|d| d * d),
        }
    }

    /// Sets the longest allowed edge.
    pub fn set_threshold(&mut self, distance: f32) {
        self.sqr_threshold = Some(distance * distance);
    }

    /// Disables filtering.
    pub fn clear(&mut self) {
        self.sqr_threshold = None;
    }

    /// Returns the squared threshold, if any.
    #[must_use]
    pub fn sqr_threshold(&self) -> Option<f32> {
        self.sqr_threshold
    }

    /// Returns true if any edge of triangle `(a, b, c)` is longer than the
    /// threshold.
    #[must_use]
    pub fn has_long_edge(&self, a: Vec3, b: Vec3, c: Vec3) -> bool {
        let Some(limit) = self.sqr_threshold else {
            return false;
        };
        a.distance_squared(b) > limit
            || b.distance_squared(c) > limit
            || c.distance_squared(a) > limit
    }
}

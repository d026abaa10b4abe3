//! Configuration options for mesh generation.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options controlling mesh generation and hole filling.
///
/// Every field defaults to "off": no discontinuity filtering, the default
/// contour step budget, and no size limit on filled holes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Longest allowed triangle edge (linear distance). Triangles with a
    /// longer edge are treated as spanning a depth discontinuity and
    /// dropped. `None` disables the filter.
    pub edge_threshold: Option<f32>,

    /// Maximum number of steps a contour walk may take before it is
    /// reported as failed. `None` means `4 * (width + height)`.
    pub contour_step_limit: Option<usize>,

    /// Largest contour (in cells) that `fill_holes` will close. Longer
    /// contours are treated as real holes in the surface and left open.
    /// `None` fills every traced hole.
    pub max_fill_contour_len: Option<usize>,
}

impl GeneratorOptions {
    /// Creates options with every feature at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the discontinuity edge threshold.
    #[must_use]
    pub fn with_edge_threshold(mut self, distance: f32) -> Self {
        self.edge_threshold = Some(distance);
        self
    }

    /// Sets the contour step limit.
    #[must_use]
    pub fn with_contour_step_limit(mut self, limit: usize) -> Self {
        self.contour_step_limit = Some(limit);
        self
    }

    /// Sets the largest contour `fill_holes` will close.
    #[must_use]
    pub fn with_max_fill_contour_len(mut self, len: usize) -> Self {
        self.max_fill_contour_len = Some(len);
        self
    }

    /// Returns the effective contour step limit for a grid.
    #[must_use]
    pub fn step_limit_for(&self, width: usize, height: usize) -> usize {
        self.contour_step_limit.unwrap_or(4 * (width + height))
    }

    /// Parses options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

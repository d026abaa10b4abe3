//! Per-cell samples and the adapter between external point types and [`Sample`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A single range reading: position, normal and an optional color.
///
/// Missing readings are encoded the way range sensors report them, with
/// non-finite (usually NaN) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Position in sensor space.
    pub position: Vec3,
    /// Surface normal. Carried through unchanged.
    pub normal: Vec3,
    /// Optional RGB color. Carried through unchanged.
    pub color: Option<[u8; 3]>,
}

impl Sample {
    /// Creates a sample without color.
    #[must_use]
    pub const fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position,
            normal,
            color: None,
        }
    }

    /// Creates a missing reading (all coordinates NaN).
    #[must_use]
    pub const fn missing() -> Self {
        Self::new(Vec3::NAN, Vec3::NAN)
    }

    /// Attaches a color to this sample.
    #[must_use]
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = Some(color);
        self
    }

    /// Returns true if every position and normal component is finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.position.is_finite() && self.normal.is_finite()
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self::missing()
    }
}

/// Conversion between an external point representation and [`Sample`].
///
/// Keeps point-cloud and mesh-library types out of the meshing code: the
/// generator only ever sees `Sample`s.
pub trait PointRepr: Sized {
    /// Converts an external point into a sample.
    fn to_sample(&self) -> Sample;

    /// Converts a sample back into the external representation.
    fn from_sample(sample: &Sample) -> Self;
}

impl PointRepr for Sample {
    fn to_sample(&self) -> Sample {
        *self
    }

    fn from_sample(sample: &Sample) -> Self {
        *sample
    }
}

impl PointRepr for (Vec3, Vec3) {
    fn to_sample(&self) -> Sample {
        Sample::new(self.0, self.1)
    }

    fn from_sample(sample: &Sample) -> Self {
        (sample.position, sample.normal)
    }
}

/// Flat `[x, y, z, nx, ny, nz]` layout, as packed point+normal clouds store it.
impl PointRepr for [f32; 6] {
    fn to_sample(&self) -> Sample {
        Sample::new(
            Vec3::new(self[0], self[1], self[2]),
            Vec3::new(self[3], self[4], self[5]),
        )
    }

    fn from_sample(sample: &Sample) -> Self {
        let p = sample.position;
        let n = sample.normal;
        [p.x, p.y, p.z, n.x, n.y, n.z]
    }
}

//! Organized (row-major) grid of range samples.

use glam::UVec2;

use crate::error::{OrgMeshError, Result};
use crate::sample::{PointRepr, Sample};

/// A fixed-size grid of samples, as produced by a range sensor.
///
/// Cell `(x, y)` lives at flat index `y * width + x`. Dimensions never
/// change after construction.
#[derive(Debug, Clone)]
pub struct OrganizedGrid {
    width: usize,
    height: usize,
    samples: Vec<Sample>,
}

impl OrganizedGrid {
    /// Creates a grid from row-major samples.
    ///
    /// Fails if `width * height` differs from the number of samples, or if
    /// the grid is too large to index its vertices with `u32`.
    pub fn new(width: usize, height: usize, samples: Vec<Sample>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .ok_or(OrgMeshError::GridTooLarge { width, height })?;
        if expected != samples.len() {
            return Err(OrgMeshError::SizeMismatch {
                expected,
                actual: samples.len(),
            });
        }
        // Compacted indices are i32 internally, with -1 reserved.
        if i32::try_from(expected).is_err() {
            return Err(OrgMeshError::GridTooLarge { width, height });
        }

        log::debug!("organized grid {width}x{height} ({expected} cells)");
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Creates a grid from any external point type.
    pub fn from_points<P: PointRepr>(width: usize, height: usize, points: &[P]) -> Result<Self> {
        Self::new(width, height, points.iter().map(PointRepr::to_sample).collect())
    }

    /// Creates a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> Sample,
    ) -> Result<Self> {
        let mut samples = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }
        Self::new(width, height, samples)
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns all samples in row-major order.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Returns true if `(x, y)` is inside the grid.
    #[must_use]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    /// Flattens a cell coordinate to its row-major index.
    #[must_use]
    pub fn to_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Unflattens a row-major index to its cell coordinate.
    #[must_use]
    pub fn to_cell(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Returns the sample at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<&Sample> {
        if x < self.width && y < self.height {
            self.samples.get(self.to_index(x, y))
        } else {
            None
        }
    }

    /// Returns the sample at a [`UVec2`] cell coordinate.
    #[must_use]
    pub fn get_cell(&self, cell: UVec2) -> Option<&Sample> {
        self.get(cell.x as usize, cell.y as usize)
    }

    /// Returns the number of samples with finite position and normal.
    #[must_use]
    pub fn num_valid(&self) -> usize {
        self.samples.iter().filter(|s| s.is_valid()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_size_mismatch() {
        let err = OrganizedGrid::new(3, 3, vec![Sample::missing(); 8]).unwrap_err();
        assert!(matches!(
            err,
            OrgMeshError::SizeMismatch {
                expected: 9,
                actual: 8
            }
        ));
    }

    #[test]
    fn test_overflowing_dimensions() {
        let err = OrganizedGrid::new(usize::MAX, 2, Vec::new()).unwrap_err();
        assert!(matches!(err, OrgMeshError::GridTooLarge { .. }));
    }

    #[test]
    fn test_indexing() {
        let grid = OrganizedGrid::from_fn(4, 3, |x, y| {
            Sample::new(Vec3::new(x as f32, y as f32, 0.0), Vec3::Z)
        })
        .unwrap();

        assert_eq!(grid.len(), 12);
        assert_eq!(grid.to_index(3, 2), 11);
        assert_eq!(grid.to_cell(6), (2, 1));
        assert_eq!(grid.get(2, 1).unwrap().position, Vec3::new(2.0, 1.0, 0.0));
        assert!(grid.get(4, 0).is_none());
        assert!(grid.get_cell(UVec2::new(0, 3)).is_none());
    }

    #[test]
    fn test_bounds() {
        let grid = OrganizedGrid::new(2, 2, vec![Sample::missing(); 4]).unwrap();
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(1, 1));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(2, 0));
        assert!(!grid.in_bounds(0, 2));
    }

    #[test]
    fn test_num_valid() {
        let grid = OrganizedGrid::from_fn(3, 2, |x, _| {
            if x == 1 {
                Sample::missing()
            } else {
                Sample::new(Vec3::ZERO, Vec3::Z)
            }
        })
        .unwrap();
        assert_eq!(grid.num_valid(), 4);
    }

    proptest::proptest! {
        #[test]
        fn prop_index_cell_inverse(width in 1usize..64, height in 1usize..64, seed in 0usize..4096) {
            let grid = OrganizedGrid::new(width, height, vec![Sample::missing(); width * height]).unwrap();
            let index = seed % grid.len();
            let (x, y) = grid.to_cell(index);
            proptest::prop_assert!(x < width && y < height);
            proptest::prop_assert_eq!(grid.to_index(x, y), index);
        }
    }
}

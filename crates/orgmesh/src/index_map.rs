//! Validity classification and index compaction.
//!
//! Every valid cell gets the next compacted vertex index in scan order;
//! invalid cells keep the [`INVALID_INDEX`] sentinel. The map is a dense
//! array because its keys are dense grid indices.

use orgmesh_core::{OrganizedGrid, Sample};

/// Sentinel stored for cells without a usable sample.
pub const INVALID_INDEX: i32 = -1;

/// Mapping from grid cell index to compacted vertex index.
#[derive(Debug, Clone)]
pub struct IndexMap {
    indices: Vec<i32>,
    valid_count: usize,
}

impl IndexMap {
    /// Classifies every cell of `grid` in a single forward pass.
    ///
    /// Returns the map together with the vertex buffer: the valid samples,
    /// in compacted-index order.
    #[must_use]
    pub fn classify(grid: &OrganizedGrid) -> (Self, Vec<Sample>) {
        let mut indices = vec![INVALID_INDEX; grid.len()];
        let mut vertices = Vec::with_capacity(grid.len());

        for (slot, sample) in indices.iter_mut().zip(grid.samples()) {
            if sample.is_valid() {
                // OrganizedGrid guarantees the cell count fits in i32.
                *slot = vertices.len() as i32;
                vertices.push(*sample);
            }
        }

        let valid_count = vertices.len();
        log::debug!(
            "classified {} cells: {} valid, {} missing",
            indices.len(),
            valid_count,
            indices.len() - valid_count
        );

        (
            Self {
                indices,
                valid_count,
            },
            vertices,
        )
    }

    /// Returns the compacted index of `cell`, or `None` if the cell is
    /// invalid or out of range.
    #[must_use]
    pub fn get(&self, cell: usize) -> Option<u32> {
        match self.indices.get(cell) {
            Some(&index) if index != INVALID_INDEX => Some(index as u32),
            _ => None,
        }
    }

    /// Returns true if `cell` holds a valid sample.
    #[must_use]
    pub fn is_valid(&self, cell: usize) -> bool {
        self.get(cell).is_some()
    }

    /// Returns the number of valid cells.
    #[must_use]
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if the map covers no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns the raw map, with [`INVALID_INDEX`] for missing cells.
    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        &self.indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_compaction_skips_invalid() {
        let grid = OrganizedGrid::from_fn(3, 2, |x, y| {
            if (x + y) % 2 == 1 {
                Sample::missing()
            } else {
                Sample::new(Vec3::new(x as f32, y as f32, 1.0), Vec3::Z)
            }
        })
        .unwrap();

        let (map, vertices) = IndexMap::classify(&grid);

        assert_eq!(map.as_slice(), &[0, -1, 1, -1, 2, -1]);
        assert_eq!(map.valid_count(), 3);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, Vec3::new(2.0, 0.0, 1.0));
        assert_eq!(map.get(4), Some(2));
        assert_eq!(map.get(5), None);
        assert_eq!(map.get(100), None);
    }

    #[test]
    fn test_nan_normal_is_invalid() {
        let grid = OrganizedGrid::new(
            2,
            1,
            vec![
                Sample::new(Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 1.0)),
                Sample::new(Vec3::X, Vec3::Z),
            ],
        )
        .unwrap();

        let (map, vertices) = IndexMap::classify(&grid);
        assert!(!map.is_valid(0));
        assert_eq!(map.get(1), Some(0));
        assert_eq!(vertices.len(), 1);
    }

    #[test]
    fn test_all_missing() {
        let grid = OrganizedGrid::new(2, 2, vec![Sample::missing(); 4]).unwrap();
        let (map, vertices) = IndexMap::classify(&grid);
        assert_eq!(map.valid_count(), 0);
        assert!(vertices.is_empty());
        assert!(map.as_slice().iter().all(|&i| i == INVALID_INDEX));
    }
}

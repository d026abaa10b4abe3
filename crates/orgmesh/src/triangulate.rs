//! Candidate triangles of the 2x2 cell blocks of an organized grid.
//!
//! Each block with origin `(x, y)` has corners
//!
//! ```text
//!   TL (x, y)     TR (x+1, y)
//!   BL (x, y+1)   BR (x+1, y+1)
//! ```
//!
//! A complete block is split along the TR-BL diagonal into `(TL, BL, TR)`
//! and `(TR, BL, BR)`. A block missing exactly one corner yields the single
//! triangle of its three valid corners, so surfaces close up around isolated
//! missing samples. All triangles have the same winding: negative signed
//! area in grid coordinates, where y grows downwards.

use crate::index_map::IndexMap;

/// Returns the candidate triangles of the block whose top-left cell is
/// `(x, y)`, as triples of grid cell indices.
///
/// The caller guarantees `x + 1 < width` and that row `y + 1` exists.
pub fn block_triangles(
    map: &IndexMap,
    width: usize,
    x: usize,
    y: usize,
) -> impl Iterator<Item = [usize; 3]> {
    let tl = y * width + x;
    let tr = tl + 1;
    let bl = tl + width;
    let br = bl + 1;

    let triangles = match (
        map.is_valid(tl),
        map.is_valid(tr),
        map.is_valid(bl),
        map.is_valid(br),
    ) {
        (true, true, true, true) => [Some([tl, bl, tr]), Some([tr, bl, br])],
        (false, true, true, true) => [Some([tr, bl, br]), None],
        (true, false, true, true) => [Some([tl, bl, br]), None],
        (true, true, false, true) => [Some([tl, br, tr]), None],
        (true, true, true, false) => [Some([tl, bl, tr]), None],
        _ => [None, None],
    };
    triangles.into_iter().flatten()
}

/// Returns every candidate triangle of the grid, block by block in
/// row-major order.
pub fn candidate_triangles(
    map: &IndexMap,
    width: usize,
    height: usize,
) -> impl Iterator<Item = [usize; 3]> + '_ {
    let blocks_x = width.saturating_sub(1);
    let blocks_y = height.saturating_sub(1);
    (0..blocks_y).flat_map(move |y| {
        (0..blocks_x).flat_map(move |x| block_triangles(map, width, x, y))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use orgmesh_core::{OrganizedGrid, Sample};

    fn grid_with_missing(width: usize, height: usize, missing: &[usize]) -> OrganizedGrid {
        OrganizedGrid::from_fn(width, height, |x, y| {
            if missing.contains(&(y * width + x)) {
                Sample::missing()
            } else {
                Sample::new(Vec3::new(x as f32, y as f32, 0.0), Vec3::Z)
            }
        })
        .unwrap()
    }

    /// Twice the signed area of a triangle in grid coordinates.
    fn signed_area(width: usize, tri: [usize; 3]) -> i64 {
        let p = tri.map(|c| ((c % width) as i64, (c / width) as i64));
        (p[1].0 - p[0].0) * (p[2].1 - p[0].1) - (p[1].1 - p[0].1) * (p[2].0 - p[0].0)
    }

    #[test]
    fn test_full_block_uses_tr_bl_diagonal() {
        let grid = grid_with_missing(2, 2, &[]);
        let (map, _) = IndexMap::classify(&grid);
        let tris: Vec<_> = block_triangles(&map, 2, 0, 0).collect();
        assert_eq!(tris, vec![[0, 2, 1], [1, 2, 3]]);
    }

    #[test]
    fn test_three_corner_fallback() {
        for missing in 0..4 {
            let grid = grid_with_missing(2, 2, &[missing]);
            let (map, _) = IndexMap::classify(&grid);
            let tris: Vec<_> = block_triangles(&map, 2, 0, 0).collect();
            assert_eq!(tris.len(), 1, "missing corner {missing}");
            assert!(!tris[0].contains(&missing));
        }
    }

    #[test]
    fn test_two_missing_corners_yield_nothing() {
        let grid = grid_with_missing(2, 2, &[0, 3]);
        let (map, _) = IndexMap::classify(&grid);
        assert_eq!(block_triangles(&map, 2, 0, 0).count(), 0);
    }

    #[test]
    fn test_consistent_winding() {
        for missing in [vec![], vec![0], vec![1], vec![2], vec![3]] {
            let grid = grid_with_missing(2, 2, &missing);
            let (map, _) = IndexMap::classify(&grid);
            for tri in block_triangles(&map, 2, 0, 0) {
                assert_eq!(signed_area(2, tri), -1, "triangle {tri:?}");
            }
        }
    }

    #[test]
    fn test_candidate_count() {
        let grid = grid_with_missing(5, 4, &[]);
        let (map, _) = IndexMap::classify(&grid);
        assert_eq!(candidate_triangles(&map, 5, 4).count(), 2 * 4 * 3);
    }

    #[test]
    fn test_degenerate_grids() {
        for (w, h) in [(1, 5), (5, 1), (0, 0)] {
            let grid = grid_with_missing(w, h, &[]);
            let (map, _) = IndexMap::classify(&grid);
            assert_eq!(candidate_triangles(&map, w, h).count(), 0);
        }
    }

    #[test]
    fn test_center_hole_leaves_one_triangle_per_block() {
        let grid = grid_with_missing(3, 3, &[4]);
        let (map, _) = IndexMap::classify(&grid);
        let tris: Vec<_> = candidate_triangles(&map, 3, 3).collect();
        assert_eq!(tris, vec![[0, 3, 1], [1, 5, 2], [3, 6, 7], [5, 7, 8]]);
    }
}

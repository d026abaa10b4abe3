//! Ear-clipping triangulation of traced hole contours.
//!
//! Contour cells are triangulated in grid coordinates, where a traced
//! contour is a simple (possibly pinched) polygon with exact integer
//! corners. Small gaps are close to planar, so the 2D triangulation carries
//! over to the 3D samples.

/// Twice the signed area of triangle `(o, a, b)`.
fn cross(o: (i64, i64), a: (i64, i64), b: (i64, i64)) -> i64 {
    (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
}

/// Twice the signed area of a polygon (shoelace formula).
#[must_use]
pub fn signed_area2(points: &[(i64, i64)]) -> i64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.0 * b.1 - b.0 * a.1
        })
        .sum()
}

/// Triangulates a polygon given by grid coordinates.
///
/// Returns triangles as indices into `points`. Triangles are wound like the
/// grid triangles (negative signed area in grid coordinates, y down),
/// whatever the orientation of the input. Collinear corners are dropped
/// without emitting a zero-area triangle. When no proper ear exists the
/// most convex corner is clipped anyway, so the loop always terminates.
#[must_use]
pub fn triangulate_polygon(points: &[(i64, i64)]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let orientation = if signed_area2(points) > 0 { 1 } else { -1 };
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut triangles = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let m = remaining.len();
        let corner = |i: usize| {
            let prev = remaining[(i + m - 1) % m];
            let next = remaining[(i + 1) % m];
            (prev, remaining[i], next)
        };

        let ear = (0..m).find(|&i| {
            let (prev, cur, next) = corner(i);
            is_ear(points, &remaining, prev, cur, next, orientation)
        });

        let clip = ear.unwrap_or_else(|| {
            // No proper ear: prefer dropping a collinear corner, otherwise
            // clip the most convex one.
            (0..m)
                .max_by_key(|&i| {
                    let (prev, cur, next) = corner(i);
                    let turn = cross(points[prev], points[cur], points[next]) * orientation;
                    (turn == 0, turn)
                })
                .unwrap_or(0)
        });

        let (prev, cur, next) = corner(clip);
        if cross(points[prev], points[cur], points[next]) != 0 {
            triangles.push([prev, cur, next]);
        }
        remaining.remove(clip);
    }

    if let [a, b, c] = remaining[..] {
        if cross(points[a], points[b], points[c]) != 0 {
            triangles.push([a, b, c]);
        }
    }

    if orientation > 0 {
        for tri in &mut triangles {
            tri.swap(1, 2);
        }
    }
    triangles
}

/// A corner is an ear if it turns the polygon's way and no other remaining
/// point lies inside or on its triangle.
fn is_ear(
    points: &[(i64, i64)],
    remaining: &[usize],
    prev: usize,
    cur: usize,
    next: usize,
    orientation: i64,
) -> bool {
    let (a, b, c) = (points[prev], points[cur], points[next]);
    if cross(a, b, c) * orientation <= 0 {
        return false;
    }

    remaining.iter().all(|&j| {
        let p = points[j];
        if p == a || p == b || p == c {
            return true;
        }
        let inside = cross(a, b, p) * orientation >= 0
            && cross(b, c, p) * orientation >= 0
            && cross(c, a, p) * orientation >= 0;
        !inside
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_area2(points: &[(i64, i64)], triangles: &[[usize; 3]]) -> i64 {
        triangles
            .iter()
            .map(|t| cross(points[t[0]], points[t[1]], points[t[2]]))
            .sum()
    }

    #[test]
    fn test_too_few_points() {
        assert!(triangulate_polygon(&[(0, 0), (1, 0)]).is_empty());
    }

    #[test]
    fn test_diamond() {
        let points = [(1, 0), (0, 1), (1, 2), (2, 1)];
        let tris = triangulate_polygon(&points);
        assert_eq!(tris.len(), 2);
        for t in &tris {
            assert!(cross(points[t[0]], points[t[1]], points[t[2]]) < 0);
        }
        assert_eq!(total_area2(&points, &tris), signed_area2(&points));
    }

    #[test]
    fn test_reversed_input_keeps_mesh_winding() {
        let points = [(2, 1), (1, 2), (0, 1), (1, 0)];
        assert!(signed_area2(&points) > 0);
        let tris = triangulate_polygon(&points);
        assert_eq!(tris.len(), 2);
        for t in &tris {
            assert!(cross(points[t[0]], points[t[1]], points[t[2]]) < 0);
        }
    }

    #[test]
    fn test_concave_polygon_covers_exact_area() {
        // An L shape: the reflex corner at (1, 1) must not be bridged.
        let points = [(0, 0), (0, 2), (2, 2), (2, 1), (1, 1), (1, 0)];
        let tris = triangulate_polygon(&points);
        assert_eq!(tris.len(), 4);
        assert_eq!(total_area2(&points, &tris), signed_area2(&points));
    }

    #[test]
    fn test_collinear_corners_are_dropped() {
        // Rectangle with midpoints on its long sides.
        let points = [(0, 0), (0, 1), (1, 1), (2, 1), (2, 0), (1, 0)];
        let tris = triangulate_polygon(&points);
        for t in &tris {
            assert_ne!(cross(points[t[0]], points[t[1]], points[t[2]]), 0);
        }
        assert_eq!(total_area2(&points, &tris), signed_area2(&points));
    }

    #[test]
    fn test_degenerate_line() {
        let points = [(0, 0), (1, 0), (2, 0)];
        assert!(triangulate_polygon(&points).is_empty());
    }
}

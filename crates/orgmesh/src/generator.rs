//! The organized fast mesh generator.

use glam::UVec2;
use orgmesh_core::{GeneratorOptions, MeshBuilder, OrgMeshError, OrganizedGrid, Result, Sample};

use crate::contour::{self, Contour, Hole};
use crate::edge_filter::EdgeFilter;
use crate::fill;
use crate::index_map::IndexMap;
use crate::triangulate;

/// Summary of one [`OrganizedFastMeshGenerator::generate_mesh`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshStats {
    /// Index of the first vertex this call appended to the mesh.
    pub vertex_offset: u32,
    /// Number of vertices appended.
    pub vertices: usize,
    /// Number of triangles appended.
    pub triangles: usize,
    /// Candidate triangles dropped by the discontinuity filter.
    pub rejected_long_edges: usize,
}

/// Summary of one [`OrganizedFastMeshGenerator::fill_holes`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    /// Interior holes found in the grid.
    pub holes: usize,
    /// Holes that were closed.
    pub filled: usize,
    /// Holes left open: too large, ringing valid cells, impossible to trace
    /// or spanning a discontinuity.
    pub skipped: usize,
    /// Triangles appended.
    pub triangles: usize,
    /// Fill triangles dropped by the discontinuity filter.
    pub rejected_long_edges: usize,
}

/// Fill-up indices of one contour and the triangles the filter dropped.
#[derive(Debug, Default)]
struct ContourFill {
    indices: Vec<u32>,
    rejected_long_edges: usize,
}

/// Builds triangle meshes from an organized grid of samples.
///
/// The grid is classified once, on construction. Each
/// [`generate_mesh`](Self::generate_mesh) call appends every valid sample and
/// the surviving grid triangles to a mesh; contours and hole fills can then
/// be computed against the same mesh.
///
/// # Example
///
/// ```
/// use orgmesh::{OrganizedFastMeshGenerator, OrganizedGrid, Sample, TriangleMesh, Vec3};
///
/// let grid = OrganizedGrid::from_fn(4, 3, |x, y| {
///     Sample::new(Vec3::new(x as f32, y as f32, 0.0), Vec3::Z)
/// })
/// .unwrap();
///
/// let mut generator = OrganizedFastMeshGenerator::new(&grid);
/// let mut mesh = TriangleMesh::new();
/// let stats = generator.generate_mesh(&mut mesh);
/// assert_eq!(stats.triangles, 2 * 3 * 2);
/// ```
#[derive(Debug, Clone)]
pub struct OrganizedFastMeshGenerator<'a> {
    grid: &'a OrganizedGrid,
    options: GeneratorOptions,
    index_map: IndexMap,
    vertices: Vec<Sample>,
    edge_filter: EdgeFilter,
    vertex_offset: Option<u32>,
}

impl<'a> OrganizedFastMeshGenerator<'a> {
    /// Creates a generator with default options.
    #[must_use]
    pub fn new(grid: &'a OrganizedGrid) -> Self {
        Self::with_options(grid, GeneratorOptions::default())
    }

    /// Creates a generator with the given options.
    #[must_use]
    pub fn with_options(grid: &'a OrganizedGrid, options: GeneratorOptions) -> Self {
        let (index_map, vertices) = IndexMap::classify(grid);
        Self {
            grid,
            edge_filter: EdgeFilter::new(options.edge_threshold),
            options,
            index_map,
            vertices,
            vertex_offset: None,
        }
    }

    /// Returns the grid being meshed.
    #[must_use]
    pub fn grid(&self) -> &'a OrganizedGrid {
        self.grid
    }

    /// Returns the current options.
    #[must_use]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Returns the cell-to-vertex index map.
    #[must_use]
    pub fn index_map(&self) -> &IndexMap {
        &self.index_map
    }

    /// Returns the valid samples in vertex order.
    #[must_use]
    pub fn vertices(&self) -> &[Sample] {
        &self.vertices
    }

    /// Sets the longest allowed triangle edge for subsequent meshing.
    pub fn set_edge_threshold(&mut self, distance: f32) {
        self.options.edge_threshold = Some(distance);
        self.edge_filter.set_threshold(distance);
    }

    /// Disables the discontinuity filter.
    pub fn clear_edge_threshold(&mut self) {
        self.options.edge_threshold = None;
        self.edge_filter.clear();
    }

    /// Appends the valid samples and the grid triangles to `mesh`.
    ///
    /// Vertices are appended in compacted-index order, so the vertex of a
    /// cell is `stats.vertex_offset + index_map().get(cell)`. Hole fills
    /// computed afterwards refer to the vertices of the latest call.
    pub fn generate_mesh(&mut self, mesh: &mut impl MeshBuilder) -> MeshStats {
        let vertex_offset = mesh.num_vertices() as u32;
        for sample in &self.vertices {
            mesh.add_vertex(sample);
        }

        let mut triangles = 0;
        let mut rejected_long_edges = 0;
        let (width, height) = (self.grid.width(), self.grid.height());

        for tri in triangulate::candidate_triangles(&self.index_map, width, height) {
            let Some([a, b, c]) = self.vertex_ids(tri) else {
                continue;
            };
            if self.has_long_edge([a, b, c]) {
                rejected_long_edges += 1;
                continue;
            }
            mesh.add_triangle(vertex_offset + a, vertex_offset + b, vertex_offset + c);
            triangles += 1;
        }

        self.vertex_offset = Some(vertex_offset);

        log::debug!(
            "meshed {}x{} grid: {} vertices, {} triangles, {} rejected as discontinuities",
            width,
            height,
            self.vertices.len(),
            triangles,
            rejected_long_edges
        );

        MeshStats {
            vertex_offset,
            vertices: self.vertices.len(),
            triangles,
            rejected_long_edges,
        }
    }

    /// Traces the hole boundary from `start` to `end`.
    ///
    /// With `start == end` the result is the closed loop around the hole
    /// bordering `start`. The walk is limited to
    /// [`GeneratorOptions::step_limit_for`] steps.
    pub fn contour(&self, start: UVec2, end: UVec2) -> Result<Contour> {
        contour::trace(self.grid, &self.index_map, start, end, self.step_limit())
    }

    /// Traces the closed boundary of every interior hole.
    ///
    /// Holes whose boundary cannot be traced are logged and left out.
    pub fn hole_contours(&self) -> Vec<Contour> {
        contour::find_holes(self.grid, &self.index_map)
            .iter()
            .filter_map(|hole| self.trace_hole(hole))
            .collect()
    }

    /// Closes the region bounded by `contour` with triangles over existing
    /// vertices and appends them to `mesh`.
    ///
    /// Returns the fill-up indices: the vertex indices of the appended
    /// triangles, three per triangle. Fill triangles go through the same
    /// discontinuity filter as grid triangles. The contour is taken as given;
    /// whether a gap is small enough to fill is up to the caller.
    pub fn fill_contour(
        &mut self,
        contour: &[usize],
        mesh: &mut impl MeshBuilder,
    ) -> Result<Vec<u32>> {
        self.fill_cells(contour, mesh).map(|fill| fill.indices)
    }

    /// Traces and fills every interior hole.
    ///
    /// Holes whose contour is longer than
    /// [`GeneratorOptions::max_fill_contour_len`] are left open, as are holes
    /// that ring valid cells, holes that cannot be traced, and holes whose
    /// every fill triangle spans a discontinuity.
    pub fn fill_holes(&mut self, mesh: &mut impl MeshBuilder) -> Result<FillStats> {
        if self.vertex_offset.is_none() {
            return Err(OrgMeshError::MeshNotGenerated);
        }

        let holes = contour::find_holes(self.grid, &self.index_map);
        let mut stats = FillStats {
            holes: holes.len(),
            ..FillStats::default()
        };

        for hole in &holes {
            if hole.surrounds_valid {
                log::warn!(
                    "leaving hole at cell {} open: it surrounds valid samples",
                    hole.seed
                );
                stats.skipped += 1;
                continue;
            }

            let Some(contour) = self.trace_hole(hole) else {
                stats.skipped += 1;
                continue;
            };

            if let Some(max_len) = self.options.max_fill_contour_len {
                if contour.len() > max_len {
                    log::debug!(
                        "leaving hole open: contour of {} cells exceeds {max_len}",
                        contour.len()
                    );
                    stats.skipped += 1;
                    continue;
                }
            }

            match self.fill_cells(contour.cells(), mesh) {
                Ok(fill) => {
                    stats.rejected_long_edges += fill.rejected_long_edges;
                    if fill.indices.is_empty() {
                        stats.skipped += 1;
                    } else {
                        stats.filled += 1;
                        stats.triangles += fill.indices.len() / 3;
                    }
                }
                Err(err) => {
                    log::warn!("cannot fill contour of {} cells: {err}", contour.len());
                    stats.skipped += 1;
                }
            }
        }

        log::debug!(
            "filled {} of {} holes with {} triangles, {} rejected as discontinuities",
            stats.filled,
            stats.holes,
            stats.triangles,
            stats.rejected_long_edges
        );
        Ok(stats)
    }

    fn step_limit(&self) -> usize {
        self.options.step_limit_for(self.grid.width(), self.grid.height())
    }

    fn trace_hole(&self, hole: &Hole) -> Option<Contour> {
        contour::trace_hole(self.grid, &self.index_map, hole, self.step_limit())
            .map_err(|err| log::warn!("cannot trace hole at cell {}: {err}", hole.seed))
            .ok()
    }

    fn fill_cells(&self, contour: &[usize], mesh: &mut impl MeshBuilder) -> Result<ContourFill> {
        let vertex_offset = self.vertex_offset.ok_or(OrgMeshError::MeshNotGenerated)?;

        let mut cells: Vec<usize> = Vec::with_capacity(contour.len());
        for &cell in contour {
            if !self.index_map.is_valid(cell) {
                return Err(OrgMeshError::InvalidContourCell(cell));
            }
            if cells.last() != Some(&cell) {
                cells.push(cell);
            }
        }
        if cells.len() > 1 && cells.first() == cells.last() {
            cells.pop();
        }

        let mut distinct = cells.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if distinct.len() < 3 {
            return Err(OrgMeshError::TooFewContourPoints(distinct.len()));
        }

        let points: Vec<(i64, i64)> = cells
            .iter()
            .map(|&cell| {
                let (x, y) = self.grid.to_cell(cell);
                (x as i64, y as i64)
            })
            .collect();

        let mut fill = ContourFill::default();
        for [i, j, k] in fill::triangulate_polygon(&points) {
            let Some([a, b, c]) = self.vertex_ids([cells[i], cells[j], cells[k]]) else {
                continue;
            };
            // Pinch points repeat a cell along the contour.
            if a == b || b == c || c == a {
                continue;
            }
            if self.has_long_edge([a, b, c]) {
                fill.rejected_long_edges += 1;
                continue;
            }
            let (a, b, c) = (vertex_offset + a, vertex_offset + b, vertex_offset + c);
            mesh.add_triangle(a, b, c);
            fill.indices.extend([a, b, c]);
        }

        log::debug!(
            "filled contour of {} cells with {} triangles, {} rejected as discontinuities",
            cells.len(),
            fill.indices.len() / 3,
            fill.rejected_long_edges
        );
        Ok(fill)
    }

    /// Runs the discontinuity filter on three compacted vertex indices.
    fn has_long_edge(&self, [a, b, c]: [u32; 3]) -> bool {
        let [pa, pb, pc] = [a, b, c].map(|i| self.vertices[i as usize].position);
        self.edge_filter.has_long_edge(pa, pb, pc)
    }

    /// Maps three cells to their compacted vertex indices.
    fn vertex_ids(&self, [a, b, c]: [usize; 3]) -> Option<[u32; 3]> {
        Some([
            self.index_map.get(a)?,
            self.index_map.get(b)?,
            self.index_map.get(c)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use orgmesh_core::TriangleMesh;

    fn flat_grid(width: usize, height: usize, missing: &[usize]) -> OrganizedGrid {
        OrganizedGrid::from_fn(width, height, |x, y| {
            if missing.contains(&(y * width + x)) {
                Sample::missing()
            } else {
                Sample::new(Vec3::new(x as f32, y as f32, 0.0), Vec3::Z)
            }
        })
        .unwrap()
    }

    #[test]
    fn test_full_grid_mesh() {
        let grid = flat_grid(3, 3, &[]);
        let mut generator = OrganizedFastMeshGenerator::new(&grid);
        let mut mesh = TriangleMesh::new();

        let stats = generator.generate_mesh(&mut mesh);

        assert_eq!(stats.vertex_offset, 0);
        assert_eq!(stats.vertices, 9);
        assert_eq!(stats.triangles, 8);
        assert_eq!(stats.rejected_long_edges, 0);
        assert_eq!(mesh.vertices.len(), 9);
        assert_eq!(mesh.num_triangles(), 8);
    }

    #[test]
    fn test_threshold_toggles() {
        let grid = flat_grid(3, 3, &[]);
        let mut generator = OrganizedFastMeshGenerator::new(&grid);

        // Grid diagonals are sqrt(2) long.
        generator.set_edge_threshold(1.2);
        assert_eq!(generator.options().edge_threshold, Some(1.2));
        let stats = generator.generate_mesh(&mut TriangleMesh::new());
        assert_eq!(stats.triangles, 0);
        assert_eq!(stats.rejected_long_edges, 8);

        generator.clear_edge_threshold();
        assert_eq!(generator.options().edge_threshold, None);
        assert_eq!(generator.generate_mesh(&mut TriangleMesh::new()).triangles, 8);
    }

    #[test]
    fn test_vertex_offset_into_existing_mesh() {
        let grid = flat_grid(3, 3, &[4]);
        let mut generator = OrganizedFastMeshGenerator::new(&grid);
        let mut mesh = TriangleMesh::new();
        mesh.add_vertex(&Sample::new(Vec3::splat(-1.0), Vec3::Z));

        let stats = generator.generate_mesh(&mut mesh);
        assert_eq!(stats.vertex_offset, 1);
        assert_eq!(mesh.vertices.len(), 9);
        assert!(mesh.faces.iter().all(|f| f.min_element() >= 1));

        let contour = generator.contour(UVec2::new(1, 0), UVec2::new(1, 0)).unwrap();
        assert_eq!(contour.cells(), &[1, 3, 7, 5]);

        let fill = generator.fill_contour(contour.cells(), &mut mesh).unwrap();
        assert_eq!(fill, vec![5, 2, 4, 4, 7, 5]);
        assert_eq!(mesh.num_triangles(), 6);
    }

    #[test]
    fn test_fill_requires_generated_mesh() {
        let grid = flat_grid(3, 3, &[4]);
        let mut generator = OrganizedFastMeshGenerator::new(&grid);
        let mut mesh = TriangleMesh::new();

        assert!(matches!(
            generator.fill_contour(&[1, 3, 7, 5], &mut mesh),
            Err(OrgMeshError::MeshNotGenerated)
        ));
        assert!(matches!(
            generator.fill_holes(&mut mesh),
            Err(OrgMeshError::MeshNotGenerated)
        ));
    }

    #[test]
    fn test_fill_rejects_bad_contours() {
        let grid = flat_grid(3, 3, &[4]);
        let mut generator = OrganizedFastMeshGenerator::new(&grid);
        let mut mesh = TriangleMesh::new();
        generator.generate_mesh(&mut mesh);

        assert!(matches!(
            generator.fill_contour(&[1, 3, 1], &mut mesh),
            Err(OrgMeshError::TooFewContourPoints(2))
        ));
        assert!(matches!(
            generator.fill_contour(&[1, 4, 5], &mut mesh),
            Err(OrgMeshError::InvalidContourCell(4))
        ));
        assert!(matches!(
            generator.fill_contour(&[1, 3, 99], &mut mesh),
            Err(OrgMeshError::InvalidContourCell(99))
        ));
        assert_eq!(mesh.num_triangles(), 4);
    }

    #[test]
    fn test_fill_holes_respects_max_len() {
        // One single-cell hole (4-cell contour) and one two-cell hole.
        let grid = flat_grid(7, 4, &[8, 11, 12]);
        let options = GeneratorOptions::new().with_max_fill_contour_len(4);
        let mut generator = OrganizedFastMeshGenerator::with_options(&grid, options);
        let mut mesh = TriangleMesh::new();
        generator.generate_mesh(&mut mesh);

        assert_eq!(generator.hole_contours().len(), 2);

        let stats = generator.fill_holes(&mut mesh).unwrap();
        assert_eq!(stats.holes, 2);
        assert_eq!(stats.filled, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.triangles, 2);
    }

    #[test]
    fn test_accessors() {
        let grid = flat_grid(2, 2, &[3]);
        let generator = OrganizedFastMeshGenerator::new(&grid);
        assert_eq!(generator.grid().len(), 4);
        assert_eq!(generator.vertices().len(), 3);
        assert_eq!(generator.index_map().valid_count(), 3);
        assert_eq!(generator.options(), &GeneratorOptions::default());
    }
}

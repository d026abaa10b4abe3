//! Mesh sinks the generator writes into.

use std::collections::HashMap;

use glam::{UVec3, Vec3};

use crate::sample::Sample;

/// An indexed triangle mesh the generator can append to.
///
/// Implement this for your own mesh container to receive vertices and
/// triangles directly. Vertices are only ever appended, so indices handed
/// out by [`add_vertex`](MeshBuilder::add_vertex) stay valid.
pub trait MeshBuilder {
    /// Returns the number of vertices currently in the mesh.
    fn num_vertices(&self) -> usize;

    /// Appends a vertex and returns its index.
    fn add_vertex(&mut self, sample: &Sample) -> u32;

    /// Appends a triangle referencing three existing vertices.
    fn add_triangle(&mut self, a: u32, b: u32, c: u32);
}

/// A plain indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Per-vertex normals.
    pub normals: Vec<Vec3>,
    /// Per-vertex colors, `None` where the sample had no color.
    pub colors: Vec<Option<[u8; 3]>>,
    /// Triangles as vertex index triples.
    pub faces: Vec<UVec3>,
}

impl TriangleMesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of triangles in the mesh.
    #[must_use]
    pub fn num_triangles(&self) -> usize {
        self.faces.len()
    }

    /// Returns true if the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Returns the three corner positions of a face.
    #[must_use]
    pub fn face_positions(&self, face: UVec3) -> [Vec3; 3] {
        [
            self.vertices[face.x as usize],
            self.vertices[face.y as usize],
            self.vertices[face.z as usize],
        ]
    }

    /// Returns the longest squared edge length over all faces, or `0.0` for
    /// an empty mesh.
    #[must_use]
    pub fn max_edge_length_squared(&self) -> f32 {
        self.faces
            .iter()
            .map(|&face| {
                let [a, b, c] = self.face_positions(face);
                a.distance_squared(b)
                    .max(b.distance_squared(c))
                    .max(c.distance_squared(a))
            })
            .fold(0.0, f32::max)
    }

    /// Returns the edges used by exactly one face, as sorted `(min, max)`
    /// vertex pairs in ascending order.
    ///
    /// An empty result means the mesh is closed; otherwise these edges
    /// outline the border and any unfilled holes.
    #[must_use]
    pub fn boundary_edges(&self) -> Vec<(u32, u32)> {
        let mut counts: HashMap<(u32, u32), u32> = HashMap::new();
        for face in &self.faces {
            for (a, b) in [(face.x, face.y), (face.y, face.z), (face.z, face.x)] {
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }

        let mut edges: Vec<(u32, u32)> = counts
            .into_iter()
            .filter_map(|(edge, count)| (count == 1).then_some(edge))
            .collect();
        edges.sort_unstable();
        edges
    }
}

impl MeshBuilder for TriangleMesh {
    fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    fn add_vertex(&mut self, sample: &Sample) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(sample.position);
        self.normals.push(sample.normal);
        self.colors.push(sample.color);
        index
    }

    fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.faces.push(UVec3::new(a, b, c));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> TriangleMesh {
        let mut mesh = TriangleMesh::new();
        for p in [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)] {
            mesh.add_vertex(&Sample::new(p, Vec3::Z));
        }
        mesh.add_triangle(0, 2, 1);
        mesh.add_triangle(1, 2, 3);
        mesh
    }

    #[test]
    fn test_add_vertex_returns_index() {
        let mut mesh = TriangleMesh::new();
        assert_eq!(mesh.add_vertex(&Sample::new(Vec3::ZERO, Vec3::Z)), 0);
        assert_eq!(
            mesh.add_vertex(&Sample::new(Vec3::X, Vec3::Z).with_color([1, 2, 3])),
            1
        );
        assert_eq!(mesh.num_vertices(), 2);
        assert_eq!(mesh.colors, vec![None, Some([1, 2, 3])]);
    }

    #[test]
    fn test_boundary_edges_skip_shared_diagonal() {
        let mesh = quad();
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.boundary_edges(), vec![(0, 1), (0, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_max_edge_length() {
        let mesh = quad();
        assert!((mesh.max_edge_length_squared() - 2.0).abs() < 1e-6);
        assert!(TriangleMesh::new().max_edge_length_squared().abs() < f32::EPSILON);
    }
}

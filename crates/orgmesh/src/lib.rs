//! orgmesh: fast triangle meshing of organized point clouds.
//!
//! An organized point cloud is a fixed `width x height` grid of samples, as
//! produced by depth cameras and laser scanners. Neighbouring cells are
//! neighbouring surface points, so a mesh can be built by connecting each
//! 2x2 block of cells directly, without any spatial search.
//!
//! # Quick Start
//!
//! ```
//! use orgmesh::*;
//!
//! fn main() -> Result<()> {
//!     // A flat 3x3 patch with one missing sample in the middle
//!     let grid = OrganizedGrid::from_fn(3, 3, |x, y| {
//!         if (x, y) == (1, 1) {
//!             Sample::missing()
//!         } else {
//!             Sample::new(Vec3::new(x as f32, y as f32, 0.0), Vec3::Z)
//!         }
//!     })?;
//!
//!     let mut generator = OrganizedFastMeshGenerator::new(&grid);
//!     let mut mesh = TriangleMesh::new();
//!     generator.generate_mesh(&mut mesh);
//!     assert_eq!(mesh.num_triangles(), 4);
//!
//!     // Walk around the gap and close it
//!     let contour = generator.contour(UVec2::new(1, 0), UVec2::new(1, 0))?;
//!     let fill = generator.fill_contour(contour.cells(), &mut mesh)?;
//!     assert_eq!(fill.len(), 6);
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! - [`IndexMap`] classifies cells as valid or missing and compacts the
//!   valid ones into a vertex buffer
//! - [`triangulate`] emits up to two triangles per 2x2 block
//! - [`EdgeFilter`] drops triangles that bridge depth discontinuities
//! - [`contour`] traces boundaries around missing regions
//! - [`fill`] closes a traced boundary with triangles over existing vertices

// Grid code converts between usize cell indices and u32/i64 coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod contour;
pub mod edge_filter;
pub mod fill;
pub mod generator;
pub mod index_map;
pub mod triangulate;

pub use contour::{Contour, Hole};
pub use edge_filter::EdgeFilter;
pub use generator::{FillStats, MeshStats, OrganizedFastMeshGenerator};
pub use index_map::{IndexMap, INVALID_INDEX};

// Re-export core types
pub use orgmesh_core::{
    error::{OrgMeshError, Result},
    GeneratorOptions, MeshBuilder, OrganizedGrid, PointRepr, Sample, TriangleMesh, UVec2, UVec3,
    Vec3,
};

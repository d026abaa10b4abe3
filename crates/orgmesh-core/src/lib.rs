//! Core types for orgmesh.
//!
//! This crate provides the data model shared by the meshing code and its callers:
//! - [`Sample`] and the [`PointRepr`] adapter for external point types
//! - [`OrganizedGrid`], the fixed-size row-major grid of samples
//! - [`MeshBuilder`], the sink the generator appends to, and [`TriangleMesh`]
//! - [`GeneratorOptions`] and the crate-wide error type

// Grid code converts between usize cell indices and u32/i32 vertex indices
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod grid;
pub mod mesh;
pub mod options;
pub mod sample;

pub use error::{OrgMeshError, Result};
pub use grid::OrganizedGrid;
pub use mesh::{MeshBuilder, TriangleMesh};
pub use options::GeneratorOptions;
pub use sample::{PointRepr, Sample};

// Re-export glam types for convenience
pub use glam::{UVec2, UVec3, Vec3};

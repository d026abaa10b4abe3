//! Error types for orgmesh.

use thiserror::Error;

/// The main error type for orgmesh operations.
#[derive(Error, Debug)]
pub enum OrgMeshError {
    /// The sample count does not match the declared grid dimensions.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// The grid has more cells than the `u32` vertex index range can address.
    #[error("grid of {width}x{height} cells exceeds the vertex index range")]
    GridTooLarge { width: usize, height: usize },

    /// A cell coordinate lies outside the grid.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    CellOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A contour endpoint is not a valid cell bordering a hole.
    #[error("cell ({x}, {y}) is not on a hole boundary")]
    NotOnFrontier { x: usize, y: usize },

    /// The boundary walk found no valid neighbour to move to.
    #[error("contour walk stalled at cell ({x}, {y})")]
    ContourStalled { x: usize, y: usize },

    /// The boundary walk went all the way around without meeting its end cell.
    #[error("contour walk closed without reaching cell ({x}, {y})")]
    EndNotReached { x: usize, y: usize },

    /// The boundary walk did not close within its step budget.
    #[error("contour walk exceeded {limit} steps")]
    ContourStepLimit { limit: usize },

    /// A contour has too few distinct cells to enclose anything.
    #[error("contour has {0} distinct cells, at least 3 are needed")]
    TooFewContourPoints(usize),

    /// A contour references a cell that is out of range or has no vertex.
    #[error("contour cell {0} is out of range or invalid")]
    InvalidContourCell(usize),

    /// Hole filling was requested before any mesh was generated.
    #[error("no mesh generated yet - call generate_mesh() first")]
    MeshNotGenerated,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for orgmesh operations.
pub type Result<T> = std::result::Result<T, OrgMeshError>;

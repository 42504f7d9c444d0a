use grid_kernel::{EdgeId, FaceId, VertexId};

/// Failures reported by a meshing service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshingError {
    #[error("{operation} received no input elements")]
    EmptyInput { operation: &'static str },

    #[error("constraint edges are not coplanar (z spread {spread})")]
    NonPlanar { spread: f64 },

    #[error("unsupported boundary: {reason}")]
    UnsupportedBoundary { reason: String },

    #[error("surface is not closed: {free_edges} edges bound a single face")]
    OpenSurface { free_edges: usize },

    #[error("degenerate {kind} near {at:?}")]
    DegenerateElement { kind: &'static str, at: [f64; 3] },

    #[error("extrusion direction has zero length")]
    ZeroDirection,

    #[error("{missing} surface triangles are not faces of the tetrahedralization")]
    BoundaryNotPreserved { missing: usize },
}

/// Result of sweeping a set of edges.
#[derive(Debug, Clone, Default)]
pub struct ExtrudeOutput {
    /// Side faces, two triangles per swept edge.
    pub faces: Vec<FaceId>,
    /// Translated copies of the input edges, in input order.
    pub front_edges: Vec<EdgeId>,
    /// Vertices created by the sweep.
    pub vertices: Vec<VertexId>,
}

/// Tetrahedralization parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetOptions {
    /// Radius-edge ratio bound; tetrahedra above it are reported as poor.
    pub quality: f64,
    /// Require every input triangle to be a face of some tetrahedron.
    pub preserve_boundary: bool,
}

impl Default for TetOptions {
    fn default() -> Self {
        Self {
            quality: 2.0,
            preserve_boundary: true,
        }
    }
}

/// Outcome of a quality-improvement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QualityReport {
    pub flips: usize,
    pub min_angle_before_deg: f64,
    pub min_angle_after_deg: f64,
}

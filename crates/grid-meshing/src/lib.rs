//! Meshing services consumed by the geometry pipeline.
//!
//! The pipeline only talks to the traits in [`traits`]. [`StructuredMesher`]
//! is the built-in implementation for axis-aligned lattice domains.

mod extrude;
mod lattice;
mod quality;
mod tetrahedralize;
mod triangulate;

pub mod traits;
pub mod types;

pub use traits::{Extruder, MeshingServices, QualityImprover, Tetrahedralizer, Triangulator};
pub use types::{ExtrudeOutput, MeshingError, QualityReport, TetOptions};

/// Fills axis-aligned domains whose constraint vertices lie on shared
/// coordinate lines (the output of uniform lattice refinement).
///
/// Triangulation and tetrahedralization fill the bounding rectangle / box of
/// their input with a structured grid through every distinct input coordinate,
/// reusing the input vertices at the grid nodes.
#[derive(Debug, Clone)]
pub struct StructuredMesher {
    /// Coordinates closer than this fall on the same lattice line.
    pub coordinate_tolerance: f64,
}

impl Default for StructuredMesher {
    fn default() -> Self {
        Self {
            coordinate_tolerance: 1e-6,
        }
    }
}

impl StructuredMesher {
    pub fn new() -> Self {
        Self::default()
    }
}

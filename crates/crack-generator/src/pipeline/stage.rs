use std::fmt;

/// States of the bridging-domain pipeline, in the order they are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SketchBuilt,
    LatticeRefined,
    BottomSurfaceTriangulated,
    BottomRegionsClassified,
    /// Number of extrusion steps taken so far.
    Extruded(usize),
    TopSurfaceTriangulated,
    TopRegionsClassified,
    Tetrahedralized,
    VolumesClassified,
    BoundaryFacesReclassified,
    Validated,
    Serialized,
}

impl Stage {
    pub fn is_final(&self) -> bool {
        matches!(self, Stage::Serialized)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::SketchBuilt => write!(f, "sketch built"),
            Stage::LatticeRefined => write!(f, "lattice refined"),
            Stage::BottomSurfaceTriangulated => write!(f, "bottom surface triangulated"),
            Stage::BottomRegionsClassified => write!(f, "bottom regions classified"),
            Stage::Extruded(k) => write!(f, "extruded ({k} steps)"),
            Stage::TopSurfaceTriangulated => write!(f, "top surface triangulated"),
            Stage::TopRegionsClassified => write!(f, "top regions classified"),
            Stage::Tetrahedralized => write!(f, "tetrahedralized"),
            Stage::VolumesClassified => write!(f, "volumes classified"),
            Stage::BoundaryFacesReclassified => write!(f, "boundary faces reclassified"),
            Stage::Validated => write!(f, "validated"),
            Stage::Serialized => write!(f, "serialized"),
        }
    }
}

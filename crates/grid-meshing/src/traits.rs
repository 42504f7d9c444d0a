use grid_kernel::{EdgeId, FaceId, Grid, SubsetIndex, Vec3, VolumeId};

use crate::types::{ExtrudeOutput, MeshingError, QualityReport, TetOptions};

/// Constrained 2-D fill of a closed boundary edge network.
pub trait Triangulator {
    /// Fill the region bounded by `boundary` with triangles created in `subset`.
    fn triangulate(
        &mut self,
        grid: &mut Grid,
        boundary: &[EdgeId],
        subset: SubsetIndex,
    ) -> Result<Vec<FaceId>, MeshingError>;
}

/// Sweep of edges along a direction vector.
pub trait Extruder {
    fn extrude_edges(
        &mut self,
        grid: &mut Grid,
        edges: &[EdgeId],
        direction: Vec3,
        subset: SubsetIndex,
    ) -> Result<ExtrudeOutput, MeshingError>;
}

/// Volumetric fill of a closed triangulated surface.
pub trait Tetrahedralizer {
    fn tetrahedralize(
        &mut self,
        grid: &mut Grid,
        surface: &[FaceId],
        options: &TetOptions,
        subset: SubsetIndex,
    ) -> Result<Vec<VolumeId>, MeshingError>;
}

/// Post-processing of a face set towards a minimum interior angle.
pub trait QualityImprover {
    /// Edges in `constraints` are never modified.
    fn improve(
        &mut self,
        grid: &mut Grid,
        faces: &[FaceId],
        constraints: &[EdgeId],
        min_angle_deg: f64,
    ) -> Result<QualityReport, MeshingError>;
}

/// Every service the pipeline consumes, on one object.
pub trait MeshingServices: Triangulator + Extruder + Tetrahedralizer + QualityImprover {}

impl<T: Triangulator + Extruder + Tetrahedralizer + QualityImprover> MeshingServices for T {}

use crate::context::BuildContext;
use crate::error::BuildWarning;

/// Summary of a finished (or aborted) build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    /// Labels of the completed stages, in order.
    pub stages: Vec<String>,
    pub warnings: Vec<BuildWarning>,
    pub region_names: Vec<String>,
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    pub volumes: usize,
    pub extrusion_steps: usize,
    /// False when the final region set failed validation.
    pub reliable: bool,
}

impl BuildReport {
    pub fn from_context(
        ctx: &BuildContext,
        stages: Vec<String>,
        extrusion_steps: usize,
        reliable: bool,
    ) -> Self {
        let (vertices, edges, faces, volumes) = ctx.grid.counts();
        Self {
            stages,
            warnings: ctx.warnings.clone(),
            region_names: ctx.subsets.names(),
            vertices,
            edges,
            faces,
            volumes,
            extrusion_steps,
            reliable,
        }
    }
}

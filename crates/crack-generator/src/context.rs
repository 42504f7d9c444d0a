use grid_format::GridMetadata;
use grid_kernel::{EdgeId, Grid, Point3d, Selector, SubsetHandler, SubsetIndex, VertexId};
use tracing::{info, warn};

use crate::error::{BuildError, BuildWarning};

/// Everything one build invocation mutates: the grid, its regions, the
/// selection scratch space and the collected warnings.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub grid: Grid,
    pub subsets: SubsetHandler,
    pub selector: Selector,
    pub warnings: Vec<BuildWarning>,
    pub metadata: GridMetadata,
}

impl BuildContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            grid: Grid::new(),
            subsets: SubsetHandler::new(),
            selector: Selector::new(),
            warnings: Vec::new(),
            metadata: GridMetadata::new(name),
        }
    }

    /// Register regions in order; the first becomes the active region.
    pub fn with_regions(name: impl Into<String>, regions: &[&str]) -> Self {
        let mut ctx = Self::new(name);
        for r in regions {
            ctx.subsets.add_subset(*r);
        }
        ctx.subsets.assign_colors();
        ctx
    }

    pub fn region(&self, name: &str) -> Result<SubsetIndex, BuildError> {
        self.subsets
            .subset_index(name)
            .ok_or_else(|| grid_kernel::GridError::UnknownSubsetName(name.to_string()).into())
    }

    /// Region that newly created skeleton elements go to.
    pub fn active_region(&self) -> SubsetIndex {
        self.subsets.default_index()
    }

    pub fn set_active_region(&mut self, index: SubsetIndex) -> Result<(), BuildError> {
        self.subsets.set_default_index(index)?;
        Ok(())
    }

    pub fn add_vertex(&mut self, position: Point3d) -> VertexId {
        let s = self.active_region();
        self.grid.create_vertex(position, s)
    }

    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> EdgeId {
        let s = self.active_region();
        self.grid.create_edge(a, b, s)
    }

    pub fn push_warning(&mut self, warning: BuildWarning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Log element counts after a stage.
    pub fn log_counts(&self, stage: &str) {
        let (vertices, edges, faces, volumes) = self.grid.counts();
        info!(stage, vertices, edges, faces, volumes, "stage complete");
    }
}

use std::collections::{HashMap, HashSet};

use grid_kernel::{
    edge_key, remove_duplicate_vertices, EdgeId, EdgeIndex, FaceId, Grid, SubsetIndex, Vec3,
    VertexId,
};
use grid_meshing::MeshingServices;
use tracing::{debug, info, instrument, warn};

use super::stage::Stage;
use crate::classify::{classify_faces, classify_volumes, RegionBox};
use crate::config::{BuildConfig, BRIDGING_DOMAIN_STEM};
use crate::context::BuildContext;
use crate::error::BuildError;
use crate::layout::{DomainLayout, FINAL_REGIONS, POOL};
use crate::observer::StageObserver;
use crate::params::BridgingDomainParams;
use crate::report::BuildReport;
use crate::skeleton::{join_bases, refine_between, RectSkeleton};

/// Coarse outlines waiting for refinement.
#[derive(Debug, Clone)]
struct Outlines {
    lower: RectSkeleton,
    upper: RectSkeleton,
    joins: Vec<EdgeId>,
}

/// Edges bounding exactly one face of `faces`, in face order.
fn boundary_edges(grid: &Grid, faces: &[FaceId]) -> Vec<EdgeId> {
    let mut uses: HashMap<(VertexId, VertexId), usize> = HashMap::new();
    for &f in faces {
        for (a, b) in grid.face_sides(f) {
            *uses.entry(edge_key(a, b)).or_default() += 1;
        }
    }
    let index = EdgeIndex::build(grid);
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for &f in faces {
        for (a, b) in grid.face_sides(f) {
            let key = edge_key(a, b);
            if uses.get(&key) == Some(&1) && seen.insert(key) {
                out.extend(index.get(a, b));
            }
        }
    }
    out
}

/// Face edges running along a coordinate axis.
fn lattice_lines(grid: &Grid, faces: &[FaceId], tol: f64) -> Vec<EdgeId> {
    let index = EdgeIndex::build(grid);
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for &f in faces {
        for (a, b) in grid.face_sides(f) {
            let d = grid.position(a) - grid.position(b);
            let flat = [d.x, d.y, d.z].iter().filter(|c| c.abs() < tol).count();
            if flat >= 2 && seen.insert(edge_key(a, b)) {
                out.extend(index.get(a, b));
            }
        }
    }
    out
}

/// Quality pass over a freshly triangulated surface. Lattice lines are
/// constraints so the surface keeps matching the structured volume fill.
fn improve_surface(
    ctx: &mut BuildContext,
    services: &mut dyn MeshingServices,
    faces: &[FaceId],
    min_angle_deg: f64,
    tol: f64,
) -> Result<(), BuildError> {
    let constraints = lattice_lines(&ctx.grid, faces, tol);
    let report = services.improve(&mut ctx.grid, faces, &constraints, min_angle_deg)?;
    debug!(
        flips = report.flips,
        min_angle = report.min_angle_after_deg,
        "surface quality pass"
    );
    Ok(())
}

/// State machine assembling the layered bridging-domain volume mesh.
///
/// Each call to [`step`](Self::step) performs one [`Stage`] and notifies the
/// observer; [`run`](Self::run) steps until the grid is serialized.
pub struct BridgingDomainPipeline {
    params: BridgingDomainParams,
    config: BuildConfig,
    layout: DomainLayout,
    ctx: BuildContext,
    pool: SubsetIndex,
    stage: Option<Stage>,
    completed: Vec<Stage>,
    outlines: Option<Outlines>,
    bottom: Vec<FaceId>,
    sides: Vec<FaceId>,
    top: Vec<FaceId>,
    front: Vec<EdgeId>,
    extruded: f64,
    extrusion_steps: usize,
    reliable: bool,
}

impl BridgingDomainPipeline {
    /// Validate the parameters and register the regions. Nothing is built
    /// until the first step.
    pub fn new(params: BridgingDomainParams, config: BuildConfig) -> Result<Self, BuildError> {
        params.validate()?;
        if !(config.extrusion_step_fraction.is_finite() && config.extrusion_step_fraction > 0.0) {
            return Err(BuildError::invalid(
                "extrusion_step_fraction",
                config.extrusion_step_fraction,
                "must be positive and finite",
            ));
        }

        let mut regions = vec![POOL];
        regions.extend(FINAL_REGIONS);
        let mut ctx = BuildContext::with_regions(
            config.checkpoints.stem_or(BRIDGING_DOMAIN_STEM),
            &regions,
        );
        let pool = ctx.region(POOL)?;
        ctx.set_active_region(pool)?;

        let step = config.extrusion_step_fraction * params.lattice_spacing();
        for warning in params.spacing_warnings(step, config.divisibility_tolerance) {
            ctx.push_warning(warning);
        }

        Ok(Self {
            layout: DomainLayout::from(&params),
            params,
            config,
            ctx,
            pool,
            stage: None,
            completed: Vec::new(),
            outlines: None,
            bottom: Vec::new(),
            sides: Vec::new(),
            top: Vec::new(),
            front: Vec::new(),
            extruded: 0.0,
            extrusion_steps: 0,
            reliable: false,
        })
    }

    pub fn stage(&self) -> Option<Stage> {
        self.stage
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    pub fn into_context(self) -> BuildContext {
        self.ctx
    }

    /// Summary of everything completed so far.
    pub fn report(&self) -> BuildReport {
        BuildReport::from_context(
            &self.ctx,
            self.completed.iter().map(Stage::to_string).collect(),
            self.extrusion_steps,
            self.reliable,
        )
    }

    fn lattice_spacing(&self) -> f64 {
        self.params.lattice_spacing()
    }

    fn extrusion_step(&self) -> f64 {
        self.config.extrusion_step_fraction * self.lattice_spacing()
    }

    fn lattice_eps(&self) -> f64 {
        self.config.divisibility_tolerance * self.lattice_spacing()
    }

    fn needs_extrusion(&self) -> bool {
        let eps = self.config.divisibility_tolerance * self.extrusion_step();
        self.extruded < self.params.depth - eps
    }

    fn volume_boxes(&self) -> Result<Vec<RegionBox>, BuildError> {
        self.layout
            .region_boxes(self.extruded, self.config.classification_margin)
            .into_iter()
            .map(|(name, bounds)| RegionBox::named(&self.ctx, name, bounds))
            .collect()
    }

    /// Advance by one stage. Calling it again after [`Stage::Serialized`]
    /// is a no-op.
    pub fn step(
        &mut self,
        services: &mut dyn MeshingServices,
        observer: &mut dyn StageObserver,
    ) -> Result<Stage, BuildError> {
        let next = match self.stage {
            None => self.build_sketch(),
            Some(Stage::SketchBuilt) => self.refine_lattice()?,
            Some(Stage::LatticeRefined) => self.triangulate_bottom(services)?,
            Some(Stage::BottomSurfaceTriangulated) => self.classify_bottom()?,
            Some(Stage::BottomRegionsClassified) => self.extrude_step(services)?,
            Some(Stage::Extruded(_)) if self.needs_extrusion() => self.extrude_step(services)?,
            Some(Stage::Extruded(_)) => self.triangulate_top(services)?,
            Some(Stage::TopSurfaceTriangulated) => self.classify_top()?,
            Some(Stage::TopRegionsClassified) => self.tetrahedralize(services)?,
            Some(Stage::Tetrahedralized) => self.classify_volumes()?,
            Some(Stage::VolumesClassified) => self.reclassify_boundary_faces()?,
            Some(Stage::BoundaryFacesReclassified) => self.validate_regions(),
            Some(Stage::Validated) => return self.serialize(observer),
            Some(Stage::Serialized) => return Ok(Stage::Serialized),
        };

        self.stage = Some(next);
        self.completed.push(next);
        let label = next.to_string();
        self.ctx.log_counts(&label);
        observer.on_stage_complete(self.completed.len(), &label, &self.ctx)?;
        Ok(next)
    }

    /// Step until the grid is serialized.
    #[instrument(skip_all, fields(
        height = self.params.height,
        width = self.params.width,
        depth = self.params.depth,
        spacing = self.lattice_spacing(),
    ))]
    pub fn run(
        &mut self,
        services: &mut dyn MeshingServices,
        observer: &mut dyn StageObserver,
    ) -> Result<BuildReport, BuildError> {
        while !self.step(services, observer)?.is_final() {}
        Ok(self.report())
    }

    fn build_sketch(&mut self) -> Stage {
        let lower = RectSkeleton::outline(&mut self.ctx, &self.layout.lower_rect());
        let upper = RectSkeleton::outline(&mut self.ctx, &self.layout.upper_rect());
        let joins = join_bases(&mut self.ctx, lower.base, upper.base);
        self.outlines = Some(Outlines {
            lower,
            upper,
            joins,
        });
        Stage::SketchBuilt
    }

    fn refine_lattice(&mut self) -> Result<Stage, BuildError> {
        let (s, eps) = (self.lattice_spacing(), self.lattice_eps());
        if let Some(outlines) = self.outlines.take() {
            let lower_base = outlines.lower.refine(&mut self.ctx, s, eps);
            let upper_base = outlines.upper.refine(&mut self.ctx, s, eps);
            refine_between(&mut self.ctx, lower_base, upper_base, &outlines.joins, s, eps);
        }
        let merged = remove_duplicate_vertices(&mut self.ctx.grid, self.config.merge_tolerance)?;
        info!(merged, "fused coincident skeleton vertices");
        Ok(Stage::LatticeRefined)
    }

    fn triangulate_bottom(
        &mut self,
        services: &mut dyn MeshingServices,
    ) -> Result<Stage, BuildError> {
        let skeleton: Vec<EdgeId> = self.ctx.grid.edges.keys().collect();
        self.bottom = services.triangulate(&mut self.ctx.grid, &skeleton, self.pool)?;
        let tol = self.lattice_eps();
        improve_surface(
            &mut self.ctx,
            services,
            &self.bottom,
            self.config.min_face_angle_deg,
            tol,
        )?;
        Ok(Stage::BottomSurfaceTriangulated)
    }

    fn classify_pool_faces(&mut self) -> Result<(), BuildError> {
        let faces = self.ctx.grid.faces_in(self.pool);
        let boxes = self.volume_boxes()?;
        let result = classify_faces(&mut self.ctx, &faces, &boxes)?;
        if result.unmatched > 0 {
            warn!(unmatched = result.unmatched, "faces outside every region box");
        }
        Ok(())
    }

    fn classify_bottom(&mut self) -> Result<Stage, BuildError> {
        self.classify_pool_faces()?;
        Ok(Stage::BottomRegionsClassified)
    }

    /// One sweep of the current front by half a lattice spacing. The last
    /// sweep may overshoot the depth.
    fn extrude_step(&mut self, services: &mut dyn MeshingServices) -> Result<Stage, BuildError> {
        if self.extrusion_steps == 0 {
            self.front = boundary_edges(&self.ctx.grid, &self.bottom);
        }
        let step = self.extrusion_step();
        let out = services.extrude_edges(&mut self.ctx.grid, &self.front, Vec3::Z * step, self.pool)?;
        self.sides.extend(out.faces);
        self.front = out.front_edges;
        self.extruded += step;
        self.extrusion_steps += 1;
        debug!(
            step = self.extrusion_steps,
            extruded = self.extruded,
            "extruded boundary"
        );
        Ok(Stage::Extruded(self.extrusion_steps))
    }

    fn triangulate_top(&mut self, services: &mut dyn MeshingServices) -> Result<Stage, BuildError> {
        self.top = services.triangulate(&mut self.ctx.grid, &self.front, self.pool)?;
        let tol = self.lattice_eps();
        improve_surface(
            &mut self.ctx,
            services,
            &self.top,
            self.config.min_face_angle_deg,
            tol,
        )?;
        Ok(Stage::TopSurfaceTriangulated)
    }

    fn classify_top(&mut self) -> Result<Stage, BuildError> {
        self.classify_pool_faces()?;
        Ok(Stage::TopRegionsClassified)
    }

    fn tetrahedralize(&mut self, services: &mut dyn MeshingServices) -> Result<Stage, BuildError> {
        let surface: Vec<FaceId> = self
            .bottom
            .iter()
            .chain(&self.sides)
            .chain(&self.top)
            .copied()
            .collect();
        let volumes = services.tetrahedralize(
            &mut self.ctx.grid,
            &surface,
            &self.config.tet_options(),
            self.pool,
        )?;
        info!(volumes = volumes.len(), "volume mesh generated");
        Ok(Stage::Tetrahedralized)
    }

    fn classify_volumes(&mut self) -> Result<Stage, BuildError> {
        let volumes = self.ctx.grid.volumes_in(self.pool);
        let boxes = self.volume_boxes()?;
        let result = classify_volumes(&mut self.ctx, &volumes, &boxes)?;
        if result.unmatched > 0 {
            warn!(unmatched = result.unmatched, "volumes outside every region box");
        }
        Ok(Stage::VolumesClassified)
    }

    fn reclassify_boundary_faces(&mut self) -> Result<Stage, BuildError> {
        let faces: Vec<FaceId> = self.ctx.grid.faces.keys().collect();
        let boxes = self
            .layout
            .boundary_boxes(self.extruded, self.config.classification_margin)
            .into_iter()
            .map(|(name, bounds)| RegionBox::named(&self.ctx, name, bounds))
            .collect::<Result<Vec<_>, _>>()?;
        let result = classify_faces(&mut self.ctx, &faces, &boxes)?;
        debug!(top = result.assigned[0], bottom = result.assigned[1], "boundary faces");
        Ok(Stage::BoundaryFacesReclassified)
    }

    fn validate_regions(&mut self) -> Stage {
        let removed = self.ctx.subsets.erase_empty_subsets(&mut self.ctx.grid);
        self.ctx.subsets.assign_colors();
        let names = self.ctx.subsets.names();
        self.reliable = names.len() == self.config.expected_region_count;
        if self.reliable {
            info!(?names, ?removed, "region set validated");
        } else {
            warn!(
                expected = self.config.expected_region_count,
                found = names.len(),
                ?names,
                "unexpected region set"
            );
        }
        Stage::Validated
    }

    /// Hand the final grid to the observer. An invalid region set is
    /// reported only after the grid has been written.
    fn serialize(&mut self, observer: &mut dyn StageObserver) -> Result<Stage, BuildError> {
        self.stage = Some(Stage::Serialized);
        self.completed.push(Stage::Serialized);
        observer.on_finished(&self.ctx)?;
        if !self.reliable {
            let regions = self.ctx.subsets.names();
            return Err(BuildError::AssemblyInvariantViolation {
                expected: self.config.expected_region_count,
                found: regions.len(),
                regions,
            });
        }
        Ok(Stage::Serialized)
    }
}

pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod lattice;
pub mod layout;
pub mod observer;
pub mod params;
pub mod pipeline;
pub mod report;
pub mod skeleton;

pub use classify::{classify_faces, classify_volumes, first_match, Classification, RegionBox};
pub use config::{BuildConfig, CheckpointConfig, BRIDGING_DOMAIN_STEM, CRACK_TIP_STEM};
pub use context::BuildContext;
pub use error::{BuildError, BuildWarning};
pub use layout::{DomainLayout, FINAL_REGIONS, POOL, VOLUME_REGIONS};
pub use observer::{FileCheckpoints, NoCheckpoints, StageObserver};
pub use params::{BridgingDomainParams, CrackParams};
pub use pipeline::{BridgingDomainPipeline, CrackBuilder, Stage};
pub use report::BuildReport;

use grid_meshing::StructuredMesher;

/// Build the crack-tip skeleton and write a checkpoint after each step into
/// `config.checkpoints`.
pub fn build_crack_geometry(
    crack_inner_length: f64,
    inner_thickness: f64,
    crack_outer_length: f64,
    angle_degrees: f64,
    config: &BuildConfig,
) -> Result<BuildReport, BuildError> {
    let params = CrackParams {
        crack_inner_length,
        inner_thickness,
        crack_outer_length,
        angle_degrees,
    };
    let mut builder = CrackBuilder::new(params, config)?;
    let mut checkpoints = FileCheckpoints::from_config(&config.checkpoints, CRACK_TIP_STEM);
    builder.build(&mut checkpoints)
}

/// Build the layered bridging-domain volume mesh with the structured mesher,
/// writing a checkpoint after every stage and the final grid at the end.
///
/// A final region set of the wrong size is still written before
/// [`BuildError::AssemblyInvariantViolation`] is returned.
pub fn build_bridging_domain_geometry(
    params: &BridgingDomainParams,
    config: &BuildConfig,
) -> Result<BuildReport, BuildError> {
    let mut pipeline = BridgingDomainPipeline::new(*params, config.clone())?;
    let mut mesher = StructuredMesher::new();
    let mut checkpoints = FileCheckpoints::from_config(&config.checkpoints, BRIDGING_DOMAIN_STEM);
    pipeline.run(&mut mesher, &mut checkpoints)
}

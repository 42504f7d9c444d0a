use grid_kernel::SubsetIndex;
use tracing::{info, instrument};

use crate::config::{BuildConfig, CRACK_TIP_STEM};
use crate::context::BuildContext;
use crate::error::BuildError;
use crate::observer::StageObserver;
use crate::params::CrackParams;
use crate::report::BuildReport;
use crate::skeleton::{build_arms, close_square, closing_squares, SQUARE_NAMES};

/// Squares are closed outermost first; each one is a checkpoint.
const CLOSING_ORDER: [usize; 3] = [2, 0, 1];

/// Builds the 2-D crack-tip skeleton: two arms from the tip, closed by one
/// square per radius, each square in its own region.
pub struct CrackBuilder {
    params: CrackParams,
    ctx: BuildContext,
    stages: Vec<String>,
}

impl CrackBuilder {
    pub fn new(params: CrackParams, config: &BuildConfig) -> Result<Self, BuildError> {
        params.validate()?;
        Ok(Self {
            params,
            ctx: BuildContext::with_regions(
                config.checkpoints.stem_or(CRACK_TIP_STEM),
                &SQUARE_NAMES,
            ),
            stages: Vec::new(),
        })
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    pub fn into_context(self) -> BuildContext {
        self.ctx
    }

    pub fn report(&self) -> BuildReport {
        BuildReport::from_context(&self.ctx, self.stages.clone(), 0, !self.stages.is_empty())
    }

    fn checkpoint(
        &mut self,
        observer: &mut dyn StageObserver,
        label: String,
    ) -> Result<(), BuildError> {
        self.ctx.log_counts(&label);
        self.stages.push(label.clone());
        observer.on_stage_complete(self.stages.len(), &label, &self.ctx)
    }

    /// Build the skeleton. Every closing height is checked before the first
    /// vertex is created, so an invalid angle leaves the grid empty.
    /// A second call returns the existing report.
    #[instrument(skip_all, fields(angle = self.params.angle_degrees))]
    pub fn build(&mut self, observer: &mut dyn StageObserver) -> Result<BuildReport, BuildError> {
        if !self.stages.is_empty() {
            return Ok(self.report());
        }
        let squares = closing_squares(&self.params)?;

        let mut regions = [SubsetIndex(0); 3];
        for (slot, name) in regions.iter_mut().zip(SQUARE_NAMES) {
            *slot = self.ctx.region(name)?;
        }

        let arms = build_arms(&mut self.ctx, &self.params, regions)?;
        self.checkpoint(observer, "arms".to_string())?;

        for i in CLOSING_ORDER {
            self.ctx.set_active_region(regions[i])?;
            close_square(&mut self.ctx, arms.ends[i], &squares[i]);
            self.checkpoint(observer, SQUARE_NAMES[i].to_lowercase())?;
        }

        observer.on_finished(&self.ctx)?;
        let report = self.report();
        info!(
            vertices = report.vertices,
            edges = report.edges,
            "crack skeleton complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoCheckpoints;

    fn params(angle_degrees: f64) -> CrackParams {
        CrackParams {
            crack_inner_length: 0.2,
            inner_thickness: 0.1,
            crack_outer_length: 2.0,
            angle_degrees,
        }
    }

    /// Records the labels it is shown.
    #[derive(Default)]
    struct Labels(Vec<(usize, String)>, bool);

    impl StageObserver for Labels {
        fn on_stage_complete(
            &mut self,
            step: usize,
            label: &str,
            _: &BuildContext,
        ) -> Result<(), BuildError> {
            self.0.push((step, label.to_string()));
            Ok(())
        }

        fn on_finished(&mut self, _: &BuildContext) -> Result<(), BuildError> {
            self.1 = true;
            Ok(())
        }
    }

    #[test]
    fn test_checkpoint_order() {
        let mut builder = CrackBuilder::new(params(10.0), &BuildConfig::crack_tip()).unwrap();
        let mut labels = Labels::default();
        let report = builder.build(&mut labels).unwrap();

        let expected = vec![
            (1, "arms".to_string()),
            (2, "outer square".to_string()),
            (3, "inner square".to_string()),
            (4, "middle square".to_string()),
        ];
        assert_eq!(labels.0, expected);
        assert!(labels.1);
        // Tip plus two ends per radius, four corners per square.
        assert_eq!((report.vertices, report.edges), (19, 21));
        assert_eq!(report.region_names.len(), 3);
    }

    #[test]
    fn test_invalid_angle_builds_nothing() {
        let mut builder = CrackBuilder::new(params(60.0), &BuildConfig::crack_tip()).unwrap();
        assert!(matches!(
            builder.build(&mut NoCheckpoints),
            Err(BuildError::InvalidGeometry { .. })
        ));
        assert_eq!(builder.context().grid.counts(), (0, 0, 0, 0));
    }

    #[test]
    fn test_second_build_is_a_no_op() {
        let mut builder = CrackBuilder::new(params(10.0), &BuildConfig::crack_tip()).unwrap();
        let first = builder.build(&mut NoCheckpoints).unwrap();
        let second = builder.build(&mut NoCheckpoints).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_square_edges_land_in_their_region() {
        let mut builder = CrackBuilder::new(params(10.0), &BuildConfig::crack_tip()).unwrap();
        builder.build(&mut NoCheckpoints).unwrap();
        let grid = &builder.context().grid;
        for i in 0..3 {
            // Two arm segments and five closing edges.
            assert_eq!(grid.edges_in(SubsetIndex(i)).len(), 7);
        }
    }
}

//! Build configuration.

use std::path::PathBuf;

use grid_meshing::TetOptions;
use serde::{Deserialize, Serialize};

/// Checkpoint file prefix of the crack-tip builder.
pub const CRACK_TIP_STEM: &str = "crack_generator";

/// Checkpoint file prefix of the bridging-domain pipeline.
pub const BRIDGING_DOMAIN_STEM: &str = "bridging_domain";

/// Where and under which name checkpoints are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointConfig {
    pub directory: PathBuf,
    /// File name prefix; files are named `{stem}_step_{n}.json`. When unset
    /// each builder uses its own prefix.
    pub stem: Option<String>,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            stem: None,
        }
    }
}

impl CheckpointConfig {
    pub fn stem_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.stem.as_deref().unwrap_or(fallback)
    }
}

/// Tunables shared by both builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Vertices closer than this are fused after the skeletons are joined.
    pub merge_tolerance: f64,
    /// Extrusion step as a fraction of the lattice spacing.
    pub extrusion_step_fraction: f64,
    /// Named regions the bridging domain must end with.
    pub expected_region_count: usize,
    /// Region boxes are grown by this much before centroid tests.
    pub classification_margin: f64,
    /// Faces below this minimum angle (degrees) are offered to the quality pass.
    pub min_face_angle_deg: f64,
    /// Radius-edge ratio bound handed to the tetrahedralizer.
    pub tet_quality: f64,
    pub preserve_boundary: bool,
    /// Relative slack when testing whether a length is a multiple of the spacing.
    pub divisibility_tolerance: f64,
    pub checkpoints: CheckpointConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            merge_tolerance: 1e-4,
            extrusion_step_fraction: 0.5,
            expected_region_count: 7,
            classification_margin: 1e-6,
            min_face_angle_deg: 30.0,
            tet_quality: 2.0,
            preserve_boundary: true,
            divisibility_tolerance: 1e-6,
            checkpoints: CheckpointConfig::default(),
        }
    }
}

impl BuildConfig {
    fn with_stem(stem: &str) -> Self {
        Self {
            checkpoints: CheckpointConfig {
                stem: Some(stem.to_string()),
                ..CheckpointConfig::default()
            },
            ..Self::default()
        }
    }

    /// Defaults for the crack-tip skeleton.
    pub fn crack_tip() -> Self {
        Self::with_stem(CRACK_TIP_STEM)
    }

    /// Defaults for the bridging-domain pipeline.
    pub fn bridging_domain() -> Self {
        Self::with_stem(BRIDGING_DOMAIN_STEM)
    }

    pub fn with_checkpoint_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.checkpoints.directory = directory.into();
        self
    }

    /// Parse a (possibly partial) JSON configuration; missing keys keep
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn tet_options(&self) -> TetOptions {
        TetOptions {
            quality: self.tet_quality,
            preserve_boundary: self.preserve_boundary,
        }
    }
}

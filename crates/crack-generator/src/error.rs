use grid_format::SaveError;
use grid_kernel::GridError;
use grid_meshing::MeshingError;

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: String,
    },

    #[error("{square} closing height is negative ({height})")]
    InvalidGeometry { square: &'static str, height: f64 },

    #[error("assembly ended with {found} regions, expected {expected}: {regions:?}")]
    AssemblyInvariantViolation {
        expected: usize,
        found: usize,
        regions: Vec<String>,
    },

    #[error("meshing service failed: {0}")]
    ExternalService(#[from] MeshingError),

    #[error("checkpoint failed: {0}")]
    Checkpoint(#[from] SaveError),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}

impl BuildError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: impl Into<String>) -> Self {
        BuildError::InvalidParameter {
            name,
            value,
            reason: reason.into(),
        }
    }
}

/// Non-fatal conditions collected during a build.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildWarning {
    /// `length` is not a whole multiple of `spacing`; the lattice along this
    /// dimension ends with one shorter segment.
    #[error("{dimension} ({length}) is not divisible by the lattice spacing ({spacing})")]
    NonUniformSpacing {
        dimension: &'static str,
        length: f64,
        spacing: f64,
    },
}

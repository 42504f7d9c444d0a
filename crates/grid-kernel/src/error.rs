use crate::grid::subset::SubsetIndex;

/// Errors raised by grid and subset bookkeeping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("subset index {index:?} out of range ({count} subsets)")]
    UnknownSubset { index: SubsetIndex, count: usize },

    #[error("no subset named `{0}`")]
    UnknownSubsetName(String),

    #[error("element references a vertex that does not exist")]
    DanglingVertex,

    #[error("merge tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
}

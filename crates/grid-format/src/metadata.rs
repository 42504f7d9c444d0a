use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata stored alongside the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMetadata {
    /// Human-readable name of the build that produced the grid.
    pub name: String,
    /// Shared by every checkpoint of one build invocation.
    pub build_id: Uuid,
    pub created: DateTime<Utc>,
}

impl GridMetadata {
    /// Metadata for a fresh build with a new id and the current timestamp.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            build_id: Uuid::new_v4(),
            created: Utc::now(),
        }
    }
}

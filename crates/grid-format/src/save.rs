use std::path::Path;

use grid_kernel::{Grid, SubsetHandler, SubsetInfo, VertexId};
use serde::{Deserialize, Serialize};
use slotmap::SecondaryMap;
use tracing::{debug, instrument};

use crate::errors::SaveError;
use crate::metadata::GridMetadata;

/// Format identifier written to every document.
pub const FORMAT_ID: &str = "crack-grid";

/// Current file format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexRecord {
    pub position: [f64; 3],
    pub subset: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub vertices: [usize; 2],
    pub subset: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceRecord {
    pub vertices: [usize; 3],
    pub subset: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeRecord {
    pub vertices: [usize; 4],
    pub subset: usize,
}

/// The top-level file structure. Elements reference vertices by their
/// position in `vertices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDocument {
    pub format: String,
    pub version: u32,
    pub metadata: GridMetadata,
    pub subsets: Vec<SubsetInfo>,
    pub vertices: Vec<VertexRecord>,
    pub edges: Vec<EdgeRecord>,
    pub faces: Vec<FaceRecord>,
    pub volumes: Vec<VolumeRecord>,
}

impl GridDocument {
    /// Flatten a grid into dense, arena-independent indices.
    pub fn from_grid(grid: &Grid, subsets: &SubsetHandler, metadata: &GridMetadata) -> Self {
        let mut dense: SecondaryMap<VertexId, usize> = SecondaryMap::with_capacity(grid.vertices.len());
        let mut vertices = Vec::with_capacity(grid.vertices.len());
        for (id, v) in &grid.vertices {
            dense.insert(id, vertices.len());
            vertices.push(VertexRecord {
                position: v.position.to_array(),
                subset: v.subset.0,
            });
        }
        let index = |v: VertexId| dense[v];

        Self {
            format: FORMAT_ID.to_string(),
            version: FORMAT_VERSION,
            metadata: metadata.clone(),
            subsets: subsets.infos().to_vec(),
            vertices,
            edges: grid
                .edges
                .values()
                .map(|e| EdgeRecord {
                    vertices: e.vertices.map(index),
                    subset: e.subset.0,
                })
                .collect(),
            faces: grid
                .faces
                .values()
                .map(|f| FaceRecord {
                    vertices: f.vertices.map(index),
                    subset: f.subset.0,
                })
                .collect(),
            volumes: grid
                .volumes
                .values()
                .map(|v| VolumeRecord {
                    vertices: v.vertices.map(index),
                    subset: v.subset.0,
                })
                .collect(),
        }
    }
}

/// Serialize a grid and its subsets to a pretty-printed JSON string.
pub fn save_grid(
    grid: &Grid,
    subsets: &SubsetHandler,
    metadata: &GridMetadata,
) -> Result<String, SaveError> {
    if !grid.references_are_valid() {
        return Err(SaveError::Serialize(
            "element references a removed vertex".to_string(),
        ));
    }
    let doc = GridDocument::from_grid(grid, subsets, metadata);
    serde_json::to_string_pretty(&doc).map_err(|e| SaveError::Serialize(e.to_string()))
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn write_grid(
    path: impl AsRef<Path>,
    grid: &Grid,
    subsets: &SubsetHandler,
    metadata: &GridMetadata,
) -> Result<(), SaveError> {
    let path = path.as_ref();
    let json = save_grid(grid, subsets, metadata)?;
    std::fs::write(path, json).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (vertices, edges, faces, volumes) = grid.counts();
    debug!(vertices, edges, faces, volumes, "grid written");
    Ok(())
}

use std::path::Path;

use grid_kernel::{Grid, Point3d, SubsetHandler, SubsetIndex, VertexId};
use tracing::{debug, instrument};

use crate::errors::LoadError;
use crate::metadata::GridMetadata;
use crate::save::{GridDocument, FORMAT_ID, FORMAT_VERSION};

/// A grid rebuilt from a document, with fresh arena keys.
#[derive(Debug, Clone)]
pub struct LoadedGrid {
    pub grid: Grid,
    pub subsets: SubsetHandler,
    pub metadata: GridMetadata,
}

fn checked(kind: &'static str, index: usize, len: usize) -> Result<usize, LoadError> {
    if index < len {
        Ok(index)
    } else {
        Err(LoadError::IndexOutOfRange { kind, index, len })
    }
}

/// Deserialize a grid from a JSON string.
///
/// Validates the format identifier, the version and every vertex and subset
/// index before building the grid.
pub fn load_grid(json: &str) -> Result<LoadedGrid, LoadError> {
    let doc: GridDocument =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if doc.format != FORMAT_ID {
        return Err(LoadError::UnknownFormat(doc.format));
    }
    if doc.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: doc.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let n_subsets = doc.subsets.len();
    let subset = |i: usize| checked("subset", i, n_subsets).map(SubsetIndex);

    let mut grid = Grid::new();
    let mut ids: Vec<VertexId> = Vec::with_capacity(doc.vertices.len());
    for v in &doc.vertices {
        ids.push(grid.create_vertex(Point3d::from_array(v.position), subset(v.subset)?));
    }
    let vertex = |i: usize| checked("vertex", i, ids.len()).map(|i| ids[i]);

    for e in &doc.edges {
        grid.create_edge(vertex(e.vertices[0])?, vertex(e.vertices[1])?, subset(e.subset)?);
    }
    for f in &doc.faces {
        let [a, b, c] = f.vertices;
        grid.create_face([vertex(a)?, vertex(b)?, vertex(c)?], subset(f.subset)?);
    }
    for vol in &doc.volumes {
        let [a, b, c, d] = vol.vertices;
        grid.create_volume(
            [vertex(a)?, vertex(b)?, vertex(c)?, vertex(d)?],
            subset(vol.subset)?,
        );
    }

    Ok(LoadedGrid {
        grid,
        subsets: SubsetHandler::from_infos(doc.subsets),
        metadata: doc.metadata,
    })
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_grid(path: impl AsRef<Path>) -> Result<LoadedGrid, LoadError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = load_grid(&json)?;
    debug!(subsets = loaded.subsets.len(), "grid read");
    Ok(loaded)
}

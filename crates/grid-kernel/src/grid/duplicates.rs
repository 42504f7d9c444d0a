//! Fusing of coincident vertices.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument};

use super::index::{edge_key, face_key};
use super::{Grid, VertexId};
use crate::error::GridError;

type Cell = (i64, i64, i64);

/// Merge every group of vertices closer than `tolerance` into the vertex
/// created first, rewire all edges/faces/volumes to the survivor and drop the
/// elements that became degenerate or duplicated. Returns the number of
/// vertices removed.
#[instrument(skip(grid))]
pub fn remove_duplicate_vertices(grid: &mut Grid, tolerance: f64) -> Result<usize, GridError> {
    if tolerance <= 0.0 || !tolerance.is_finite() {
        return Err(GridError::InvalidTolerance(tolerance));
    }

    let cell_of = |x: f64, y: f64, z: f64| -> Cell {
        (
            (x / tolerance).floor() as i64,
            (y / tolerance).floor() as i64,
            (z / tolerance).floor() as i64,
        )
    };

    let mut buckets: HashMap<Cell, Vec<VertexId>> = HashMap::new();
    let mut replace: HashMap<VertexId, VertexId> = HashMap::new();

    for (id, vertex) in &grid.vertices {
        let p = vertex.position;
        let (cx, cy, cz) = cell_of(p.x, p.y, p.z);
        let mut survivor = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if let Some(candidates) = buckets.get(&(cx + dx, cy + dy, cz + dz)) {
                        for &c in candidates {
                            if grid.vertices[c].position.distance_to(&p) < tolerance {
                                survivor = Some(c);
                                break 'search;
                            }
                        }
                    }
                }
            }
        }
        match survivor {
            Some(s) => {
                replace.insert(id, s);
            }
            None => buckets.entry((cx, cy, cz)).or_default().push(id),
        }
    }

    if replace.is_empty() {
        return Ok(0);
    }

    let map = |v: &mut VertexId| {
        if let Some(s) = replace.get(v) {
            *v = *s;
        }
    };
    grid.edges.values_mut().for_each(|e| e.vertices.iter_mut().for_each(map));
    grid.faces.values_mut().for_each(|f| f.vertices.iter_mut().for_each(map));
    grid.volumes
        .values_mut()
        .for_each(|v| v.vertices.iter_mut().for_each(map));

    for v in replace.keys() {
        grid.vertices.remove(*v);
    }

    let mut seen_edges = HashSet::new();
    let edges_before = grid.edges.len();
    grid.edges.retain(|_, e| {
        let [a, b] = e.vertices;
        a != b && seen_edges.insert(edge_key(a, b))
    });

    let mut seen_faces = HashSet::new();
    let faces_before = grid.faces.len();
    grid.faces.retain(|_, f| {
        let [a, b, c] = f.vertices;
        a != b && b != c && a != c && seen_faces.insert(face_key(f.vertices))
    });

    let volumes_before = grid.volumes.len();
    grid.volumes.retain(|_, vol| {
        let mut sorted = vol.vertices;
        sorted.sort();
        sorted.windows(2).all(|w| w[0] != w[1])
    });

    debug!(
        edges_removed = edges_before - grid.edges.len(),
        faces_removed = faces_before - grid.faces.len(),
        volumes_removed = volumes_before - grid.volumes.len(),
        "dropped collapsed elements"
    );
    info!(merged = replace.len(), "removed duplicate vertices");
    Ok(replace.len())
}

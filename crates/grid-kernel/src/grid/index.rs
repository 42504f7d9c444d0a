//! Hash lookups from vertex tuples to existing elements.

use std::collections::HashMap;

use super::subset::SubsetIndex;
use super::{EdgeId, FaceId, Grid, VertexId};

/// Order-independent key for an edge.
pub fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Order-independent key for a triangle.
pub fn face_key(vertices: [VertexId; 3]) -> [VertexId; 3] {
    let mut key = vertices;
    key.sort();
    key
}

#[derive(Debug, Default)]
pub struct EdgeIndex {
    map: HashMap<(VertexId, VertexId), EdgeId>,
}

impl EdgeIndex {
    pub fn build(grid: &Grid) -> Self {
        let map = grid
            .edges
            .iter()
            .map(|(id, e)| (edge_key(e.vertices[0], e.vertices[1]), id))
            .collect();
        Self { map }
    }

    pub fn get(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.map.get(&edge_key(a, b)).copied()
    }

    pub fn insert(&mut self, a: VertexId, b: VertexId, edge: EdgeId) {
        self.map.insert(edge_key(a, b), edge);
    }

    pub fn remove(&mut self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.map.remove(&edge_key(a, b))
    }

    /// Return the edge joining `a` and `b`, creating it in `subset` if absent.
    pub fn find_or_create(
        &mut self,
        grid: &mut Grid,
        a: VertexId,
        b: VertexId,
        subset: SubsetIndex,
    ) -> EdgeId {
        if let Some(e) = self.get(a, b) {
            return e;
        }
        let e = grid.create_edge(a, b, subset);
        self.insert(a, b, e);
        e
    }
}

#[derive(Debug, Default)]
pub struct FaceIndex {
    map: HashMap<[VertexId; 3], FaceId>,
}

impl FaceIndex {
    pub fn build(grid: &Grid) -> Self {
        let map = grid
            .faces
            .iter()
            .map(|(id, f)| (face_key(f.vertices), id))
            .collect();
        Self { map }
    }

    pub fn get(&self, vertices: [VertexId; 3]) -> Option<FaceId> {
        self.map.get(&face_key(vertices)).copied()
    }
}

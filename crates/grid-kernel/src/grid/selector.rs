//! Working set of selected elements.

use std::collections::BTreeSet;

use super::index::{EdgeIndex, FaceIndex};
use super::{EdgeId, FaceId, Grid, VertexId, VolumeId};

/// Ordered selection of grid elements of every dimension.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    vertices: BTreeSet<VertexId>,
    edges: BTreeSet<EdgeId>,
    faces: BTreeSet<FaceId>,
    volumes: BTreeSet<VolumeId>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_vertex(&mut self, v: VertexId) {
        self.vertices.insert(v);
    }

    pub fn select_edge(&mut self, e: EdgeId) {
        self.edges.insert(e);
    }

    pub fn select_face(&mut self, f: FaceId) {
        self.faces.insert(f);
    }

    pub fn select_volume(&mut self, v: VolumeId) {
        self.volumes.insert(v);
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.faces.clear();
        self.volumes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
            && self.edges.is_empty()
            && self.faces.is_empty()
            && self.volumes.is_empty()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &VertexId> {
        self.vertices.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.edges.iter()
    }

    pub fn faces(&self) -> impl Iterator<Item = &FaceId> {
        self.faces.iter()
    }

    pub fn volumes(&self) -> impl Iterator<Item = &VolumeId> {
        self.volumes.iter()
    }

    pub fn num_selected(&self) -> usize {
        self.vertices.len() + self.edges.len() + self.faces.len() + self.volumes.len()
    }

    /// Pull in the lower-dimensional elements that selected elements depend on:
    /// the corners of every selected element plus every existing edge and face
    /// spanned by the corners of a selected face or volume.
    pub fn close_selection(&mut self, grid: &Grid) {
        let edge_index = EdgeIndex::build(grid);

        if !self.volumes.is_empty() {
            let face_index = FaceIndex::build(grid);
            for vol in &self.volumes {
                let Some(volume) = grid.volumes.get(*vol) else {
                    continue;
                };
                let [a, b, c, d] = volume.vertices;
                for tri in [[a, b, c], [a, b, d], [a, c, d], [b, c, d]] {
                    if let Some(f) = face_index.get(tri) {
                        self.faces.insert(f);
                    }
                }
                for (p, q) in [(a, b), (a, c), (a, d), (b, c), (b, d), (c, d)] {
                    if let Some(e) = edge_index.get(p, q) {
                        self.edges.insert(e);
                    }
                }
                self.vertices.extend(volume.vertices);
            }
        }

        for f in &self.faces {
            let Some(face) = grid.faces.get(*f) else {
                continue;
            };
            let [a, b, c] = face.vertices;
            for (p, q) in [(a, b), (b, c), (c, a)] {
                if let Some(e) = edge_index.get(p, q) {
                    self.edges.insert(e);
                }
            }
            self.vertices.extend(face.vertices);
        }

        for e in &self.edges {
            if let Some(edge) = grid.edges.get(*e) {
                self.vertices.extend(edge.vertices);
            }
        }
    }
}

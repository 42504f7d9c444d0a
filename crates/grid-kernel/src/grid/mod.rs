pub mod duplicates;
pub mod index;
pub mod selector;
pub mod subset;

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::geometry::bounds::BoundingBox;
use crate::geometry::point::Point3d;
use subset::SubsetIndex;

pub use index::{edge_key, face_key, EdgeIndex, FaceIndex};

// ─── Entity Keys ─────────────────────────────────────────────────────────────

new_key_type! {
    pub struct VertexId;
    pub struct EdgeId;
    pub struct FaceId;
    pub struct VolumeId;
}

// ─── Elements ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    /// Position attachment.
    pub position: Point3d,
    pub subset: SubsetIndex,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub vertices: [VertexId; 2],
    pub subset: SubsetIndex,
}

/// Triangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Face {
    pub vertices: [VertexId; 3],
    pub subset: SubsetIndex,
}

/// Tetrahedron.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Volume {
    pub vertices: [VertexId; 4],
    pub subset: SubsetIndex,
}

// ─── Grid ────────────────────────────────────────────────────────────────────

/// Arena-based mesh container.
///
/// Edges, faces and volumes reference vertices by key; positions live on the
/// vertices. Keys of erased elements are never reused for a different element
/// within the same arena generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grid {
    pub vertices: SlotMap<VertexId, Vertex>,
    pub edges: SlotMap<EdgeId, Edge>,
    pub faces: SlotMap<FaceId, Face>,
    pub volumes: SlotMap<VolumeId, Volume>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_vertex(&mut self, position: Point3d, subset: SubsetIndex) -> VertexId {
        self.vertices.insert(Vertex { position, subset })
    }

    pub fn create_edge(&mut self, a: VertexId, b: VertexId, subset: SubsetIndex) -> EdgeId {
        self.edges.insert(Edge {
            vertices: [a, b],
            subset,
        })
    }

    pub fn create_face(&mut self, vertices: [VertexId; 3], subset: SubsetIndex) -> FaceId {
        self.faces.insert(Face { vertices, subset })
    }

    pub fn create_volume(&mut self, vertices: [VertexId; 4], subset: SubsetIndex) -> VolumeId {
        self.volumes.insert(Volume { vertices, subset })
    }

    /// Erase a vertex together with every element that references it.
    pub fn erase_vertex(&mut self, v: VertexId) {
        if self.vertices.remove(v).is_none() {
            return;
        }
        self.edges.retain(|_, e| !e.vertices.contains(&v));
        self.faces.retain(|_, f| !f.vertices.contains(&v));
        self.volumes.retain(|_, vol| !vol.vertices.contains(&v));
    }

    pub fn erase_edge(&mut self, e: EdgeId) -> bool {
        self.edges.remove(e).is_some()
    }

    pub fn erase_face(&mut self, f: FaceId) -> bool {
        self.faces.remove(f).is_some()
    }

    pub fn position(&self, v: VertexId) -> Point3d {
        self.vertices[v].position
    }

    /// Linear search for an edge joining `a` and `b` in either direction.
    /// Use [`EdgeIndex`] for bulk lookups.
    pub fn find_edge(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let key = edge_key(a, b);
        self.edges
            .iter()
            .find(|(_, e)| edge_key(e.vertices[0], e.vertices[1]) == key)
            .map(|(id, _)| id)
    }

    pub fn face_centroid(&self, f: FaceId) -> Point3d {
        let pts = self.faces[f].vertices.map(|v| self.position(v));
        Point3d::centroid(&pts)
    }

    pub fn volume_centroid(&self, vol: VolumeId) -> Point3d {
        let pts = self.volumes[vol].vertices.map(|v| self.position(v));
        Point3d::centroid(&pts)
    }

    pub fn edge_length(&self, e: EdgeId) -> f64 {
        let [a, b] = self.edges[e].vertices;
        self.position(a).distance_to(&self.position(b))
    }

    /// The three vertex pairs bounding a face.
    pub fn face_sides(&self, f: FaceId) -> [(VertexId, VertexId); 3] {
        let [a, b, c] = self.faces[f].vertices;
        [(a, b), (b, c), (c, a)]
    }

    pub fn vertices_in(&self, subset: SubsetIndex) -> Vec<VertexId> {
        self.vertices
            .iter()
            .filter(|(_, v)| v.subset == subset)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn edges_in(&self, subset: SubsetIndex) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|(_, e)| e.subset == subset)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn faces_in(&self, subset: SubsetIndex) -> Vec<FaceId> {
        self.faces
            .iter()
            .filter(|(_, f)| f.subset == subset)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn volumes_in(&self, subset: SubsetIndex) -> Vec<VolumeId> {
        self.volumes
            .iter()
            .filter(|(_, v)| v.subset == subset)
            .map(|(id, _)| id)
            .collect()
    }

    /// Bounding box of all vertex positions.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for v in self.vertices.values() {
            bb.expand_to_include(&v.position);
        }
        bb
    }

    /// Counts as (vertices, edges, faces, volumes).
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.vertices.len(),
            self.edges.len(),
            self.faces.len(),
            self.volumes.len(),
        )
    }

    /// Whether every element references live vertices.
    pub fn references_are_valid(&self) -> bool {
        let live = |v: &VertexId| self.vertices.contains_key(*v);
        self.edges.values().all(|e| e.vertices.iter().all(live))
            && self.faces.values().all(|f| f.vertices.iter().all(live))
            && self.volumes.values().all(|vol| vol.vertices.iter().all(live))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(grid: &mut Grid) -> (FaceId, [VertexId; 3]) {
        let s = SubsetIndex(0);
        let a = grid.create_vertex(Point3d::new(0.0, 0.0, 0.0), s);
        let b = grid.create_vertex(Point3d::new(3.0, 0.0, 0.0), s);
        let c = grid.create_vertex(Point3d::new(0.0, 3.0, 0.0), s);
        (grid.create_face([a, b, c], s), [a, b, c])
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new();
        assert_eq!(grid.counts(), (0, 0, 0, 0));
    }

    #[test]
    fn test_face_centroid() {
        let mut grid = Grid::new();
        let (f, _) = triangle(&mut grid);
        let c = grid.face_centroid(f);
        assert!((c.x - 1.0).abs() < 1e-12);
        assert!((c.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_edge_either_direction() {
        let mut grid = Grid::new();
        let (_, [a, b, c]) = triangle(&mut grid);
        let e = grid.create_edge(a, b, SubsetIndex(0));
        assert_eq!(grid.find_edge(b, a), Some(e));
        assert_eq!(grid.find_edge(a, c), None);
    }

    #[test]
    fn test_erase_vertex_removes_dependents() {
        let mut grid = Grid::new();
        let (_, [a, b, _]) = triangle(&mut grid);
        grid.create_edge(a, b, SubsetIndex(0));
        grid.erase_vertex(a);
        assert_eq!(grid.counts(), (2, 0, 0, 0));
        assert!(grid.references_are_valid());
    }

    #[test]
    fn test_faces_in_subset() {
        let mut grid = Grid::new();
        let (f, [a, b, c]) = triangle(&mut grid);
        let g = grid.create_face([a, c, b], SubsetIndex(2));
        assert_eq!(grid.faces_in(SubsetIndex(0)), vec![f]);
        assert_eq!(grid.faces_in(SubsetIndex(2)), vec![g]);
    }
}

use std::collections::HashMap;

use grid_kernel::{EdgeId, EdgeIndex, Grid, Point3d, SubsetIndex, Vec3, VertexId};
use tracing::{info, instrument};

use crate::traits::Extruder;
use crate::types::{ExtrudeOutput, MeshingError};
use crate::StructuredMesher;

/// Lexicographic order on positions, used to pick a consistent quad diagonal.
fn lower_first(grid: &Grid, a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    let (pa, pb) = (grid.position(a), grid.position(b));
    let key = |p: Point3d| [p.x, p.y, p.z];
    let (ka, kb) = (key(pa), key(pb));
    let a_first = ka
        .iter()
        .zip(kb.iter())
        .find(|(x, y)| x != y)
        .map_or(true, |(x, y)| x < y);
    if a_first {
        (a, b)
    } else {
        (b, a)
    }
}

impl Extruder for StructuredMesher {
    /// Each edge becomes a quad split into two triangles. The diagonal always
    /// runs from the lexicographically lower endpoint to the translated upper
    /// endpoint, matching the diagonal the structured tetrahedralization uses
    /// on the same cell face.
    #[instrument(skip(self, grid, edges), fields(edges = edges.len()))]
    fn extrude_edges(
        &mut self,
        grid: &mut Grid,
        edges: &[EdgeId],
        direction: Vec3,
        subset: SubsetIndex,
    ) -> Result<ExtrudeOutput, MeshingError> {
        if edges.is_empty() {
            return Err(MeshingError::EmptyInput {
                operation: "extrusion",
            });
        }
        if direction.normalized().is_none() {
            return Err(MeshingError::ZeroDirection);
        }

        let mut output = ExtrudeOutput::default();
        let mut swept: HashMap<VertexId, VertexId> = HashMap::new();
        let mut edge_index = EdgeIndex::build(grid);

        let mut lift = |grid: &mut Grid, output: &mut ExtrudeOutput, v: VertexId| -> VertexId {
            *swept.entry(v).or_insert_with(|| {
                let moved = grid.create_vertex(grid.position(v) + direction, subset);
                output.vertices.push(moved);
                moved
            })
        };

        for &e in edges {
            let [a, b] = grid.edges[e].vertices;
            let (lo, hi) = lower_first(grid, a, b);
            let lo_up = lift(grid, &mut output, lo);
            let hi_up = lift(grid, &mut output, hi);

            edge_index.find_or_create(grid, lo, lo_up, subset);
            edge_index.find_or_create(grid, hi, hi_up, subset);
            edge_index.find_or_create(grid, lo, hi_up, subset);
            let front = edge_index.find_or_create(grid, lo_up, hi_up, subset);

            output.faces.push(grid.create_face([lo, hi, hi_up], subset));
            output.faces.push(grid.create_face([lo, hi_up, lo_up], subset));
            output.front_edges.push(front);
        }

        info!(
            faces = output.faces.len(),
            vertices = output.vertices.len(),
            "extruded edges"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extrude_polyline() {
        let mut grid = Grid::new();
        let s = SubsetIndex(0);
        let a = grid.create_vertex(Point3d::planar(0.0, 0.0), s);
        let b = grid.create_vertex(Point3d::planar(1.0, 0.0), s);
        let c = grid.create_vertex(Point3d::planar(2.0, 0.0), s);
        let e1 = grid.create_edge(a, b, s);
        let e2 = grid.create_edge(b, c, s);

        let out = StructuredMesher::new()
            .extrude_edges(&mut grid, &[e1, e2], Vec3::Z * 0.5, s)
            .unwrap();

        assert_eq!(out.faces.len(), 4);
        assert_eq!(out.front_edges.len(), 2);
        // Shared vertex b is swept once.
        assert_eq!(out.vertices.len(), 3);
        for &v in &out.vertices {
            assert!((grid.position(v).z - 0.5).abs() < 1e-12);
        }
        // 2 input + 2 front + 3 vertical + 2 diagonals.
        assert_eq!(grid.edges.len(), 9);
    }

    #[test]
    fn test_front_edges_can_be_extruded_again() {
        let mut grid = Grid::new();
        let s = SubsetIndex(0);
        let a = grid.create_vertex(Point3d::planar(0.0, 0.0), s);
        let b = grid.create_vertex(Point3d::planar(0.0, 1.0), s);
        let e = grid.create_edge(b, a, s);
        let mut mesher = StructuredMesher::new();
        let first = mesher.extrude_edges(&mut grid, &[e], Vec3::Z, s).unwrap();
        let second = mesher
            .extrude_edges(&mut grid, &first.front_edges, Vec3::Z, s)
            .unwrap();
        let [p, q] = grid.edges[second.front_edges[0]].vertices;
        assert!((grid.position(p).z - 2.0).abs() < 1e-12);
        assert!((grid.position(q).z - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_direction_rejected() {
        let mut grid = Grid::new();
        let s = SubsetIndex(0);
        let a = grid.create_vertex(Point3d::planar(0.0, 0.0), s);
        let b = grid.create_vertex(Point3d::planar(1.0, 0.0), s);
        let e = grid.create_edge(a, b, s);
        let err = StructuredMesher::new()
            .extrude_edges(&mut grid, &[e], Vec3::ZERO, s)
            .unwrap_err();
        assert_eq!(err, MeshingError::ZeroDirection);
    }
}

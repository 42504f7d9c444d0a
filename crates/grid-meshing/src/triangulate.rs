use std::collections::HashMap;

use grid_kernel::{EdgeId, EdgeIndex, FaceId, Grid, Point3d, SubsetIndex, VertexId};
use tracing::{debug, info, instrument};

use crate::lattice::AxisLattice;
use crate::traits::Triangulator;
use crate::types::MeshingError;
use crate::StructuredMesher;

impl Triangulator for StructuredMesher {
    #[instrument(skip(self, grid, boundary), fields(boundary_edges = boundary.len()))]
    fn triangulate(
        &mut self,
        grid: &mut Grid,
        boundary: &[EdgeId],
        subset: SubsetIndex,
    ) -> Result<Vec<FaceId>, MeshingError> {
        if boundary.is_empty() {
            return Err(MeshingError::EmptyInput {
                operation: "triangulation",
            });
        }
        let tol = self.coordinate_tolerance;

        let mut boundary_vertices: Vec<VertexId> = boundary
            .iter()
            .flat_map(|&e| grid.edges[e].vertices)
            .collect();
        boundary_vertices.sort();
        boundary_vertices.dedup();

        let zs = AxisLattice::from_values(
            boundary_vertices.iter().map(|&v| grid.position(v).z),
            tol,
        );
        if zs.len() != 1 {
            return Err(MeshingError::NonPlanar { spread: zs.span() });
        }
        let z = zs.value(0);

        let xs = AxisLattice::from_values(boundary_vertices.iter().map(|&v| grid.position(v).x), tol);
        let ys = AxisLattice::from_values(boundary_vertices.iter().map(|&v| grid.position(v).y), tol);
        if xs.len() < 2 || ys.len() < 2 {
            return Err(MeshingError::UnsupportedBoundary {
                reason: "constraint network has no area".to_string(),
            });
        }

        let mut nodes: HashMap<(usize, usize), VertexId> = HashMap::new();
        let lattice_index = |p: Point3d| -> Result<(usize, usize), MeshingError> {
            match (xs.index_of(p.x), ys.index_of(p.y)) {
                (Some(i), Some(j)) => Ok((i, j)),
                _ => Err(MeshingError::UnsupportedBoundary {
                    reason: format!("vertex ({}, {}) is off the lattice", p.x, p.y),
                }),
            }
        };
        for &v in &boundary_vertices {
            let ij = lattice_index(grid.position(v))?;
            nodes.entry(ij).or_insert(v);
        }

        // Each constraint edge must join neighbouring lattice nodes on one line.
        for &e in boundary {
            let [a, b] = grid.edges[e].vertices;
            let (ia, ja) = lattice_index(grid.position(a))?;
            let (ib, jb) = lattice_index(grid.position(b))?;
            let di = ia.abs_diff(ib);
            let dj = ja.abs_diff(jb);
            if !((di == 0 && dj == 1) || (di == 1 && dj == 0)) {
                return Err(MeshingError::UnsupportedBoundary {
                    reason: format!("edge spans lattice steps ({di}, {dj})"),
                });
            }
        }

        let mut node = |grid: &mut Grid, i: usize, j: usize| -> VertexId {
            *nodes
                .entry((i, j))
                .or_insert_with(|| grid.create_vertex(Point3d::new(xs.value(i), ys.value(j), z), subset))
        };

        let mut edge_index = EdgeIndex::build(grid);
        let mut faces = Vec::with_capacity(2 * (xs.len() - 1) * (ys.len() - 1));
        for i in 0..xs.len() - 1 {
            for j in 0..ys.len() - 1 {
                let v00 = node(grid, i, j);
                let v10 = node(grid, i + 1, j);
                let v11 = node(grid, i + 1, j + 1);
                let v01 = node(grid, i, j + 1);
                for tri in [[v00, v10, v11], [v00, v11, v01]] {
                    for (p, q) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                        edge_index.find_or_create(grid, p, q, subset);
                    }
                    faces.push(grid.create_face(tri, subset));
                }
            }
        }

        debug!(nx = xs.len(), ny = ys.len(), z, "structured triangulation lattice");
        info!(faces = faces.len(), "triangulated planar boundary");
        Ok(faces)
    }
}

use std::collections::{HashMap, HashSet};

use grid_kernel::{edge_key, face_key, FaceId, Grid, Point3d, SubsetIndex, Vec3, VertexId, VolumeId};
use nalgebra::{Matrix3, Vector3};
use tracing::{debug, info, instrument, warn};

use crate::lattice::AxisLattice;
use crate::traits::Tetrahedralizer;
use crate::types::{MeshingError, TetOptions};
use crate::StructuredMesher;

/// Axis orders of the six monotone corner paths from (0,0,0) to (1,1,1).
/// Each path spans one tetrahedron; together they tile the cell and put every
/// cell-face diagonal on the (low, low) to (high, high) corner pair.
const KUHN_PATHS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

fn to_na(v: Vec3) -> Vector3<f64> {
    Vector3::new(v.x, v.y, v.z)
}

fn signed_volume(p: &[Point3d; 4]) -> f64 {
    let m = Matrix3::from_columns(&[
        to_na(p[1] - p[0]),
        to_na(p[2] - p[0]),
        to_na(p[3] - p[0]),
    ]);
    m.determinant() / 6.0
}

/// Circumradius over shortest edge. `None` for a flat tetrahedron.
fn radius_edge_ratio(p: &[Point3d; 4]) -> Option<f64> {
    let a = to_na(p[1] - p[0]);
    let b = to_na(p[2] - p[0]);
    let c = to_na(p[3] - p[0]);
    let m = Matrix3::from_rows(&[a.transpose(), b.transpose(), c.transpose()]);
    let rhs = Vector3::new(a.norm_squared(), b.norm_squared(), c.norm_squared()) * 0.5;
    let center = m.lu().solve(&rhs)?;

    let mut shortest = f64::INFINITY;
    for i in 0..4 {
        for j in i + 1..4 {
            shortest = shortest.min(p[i].distance_to(&p[j]));
        }
    }
    (shortest > 0.0).then(|| center.norm() / shortest)
}

/// Edges of `surface` bounding fewer than two of its faces.
fn count_free_edges(grid: &Grid, surface: &[FaceId]) -> usize {
    let mut uses: HashMap<(VertexId, VertexId), usize> = HashMap::new();
    for &f in surface {
        for (a, b) in grid.face_sides(f) {
            *uses.entry(edge_key(a, b)).or_default() += 1;
        }
    }
    uses.values().filter(|&&n| n < 2).count()
}

struct BoxLattice {
    axes: [AxisLattice; 3],
    nodes: HashMap<[usize; 3], VertexId>,
    subset: SubsetIndex,
}

impl BoxLattice {
    fn node(&mut self, grid: &mut Grid, ijk: [usize; 3]) -> VertexId {
        let axes = &self.axes;
        let subset = self.subset;
        *self.nodes.entry(ijk).or_insert_with(|| {
            let p = Point3d::new(
                axes[0].value(ijk[0]),
                axes[1].value(ijk[1]),
                axes[2].value(ijk[2]),
            );
            grid.create_vertex(p, subset)
        })
    }
}

impl Tetrahedralizer for StructuredMesher {
    #[instrument(skip(self, grid, surface, options), fields(surface_faces = surface.len()))]
    fn tetrahedralize(
        &mut self,
        grid: &mut Grid,
        surface: &[FaceId],
        options: &TetOptions,
        subset: SubsetIndex,
    ) -> Result<Vec<VolumeId>, MeshingError> {
        if surface.is_empty() {
            return Err(MeshingError::EmptyInput {
                operation: "tetrahedralization",
            });
        }
        let free_edges = count_free_edges(grid, surface);
        if free_edges > 0 {
            return Err(MeshingError::OpenSurface { free_edges });
        }

        let tol = self.coordinate_tolerance;
        let mut surface_vertices: Vec<VertexId> = surface
            .iter()
            .flat_map(|&f| grid.faces[f].vertices)
            .collect();
        surface_vertices.sort();
        surface_vertices.dedup();

        let axis = |k: usize| {
            AxisLattice::from_values(
                surface_vertices.iter().map(|&v| grid.position(v).to_array()[k]),
                tol,
            )
        };
        let axes = [axis(0), axis(1), axis(2)];
        if axes.iter().any(|a| a.len() < 2) {
            return Err(MeshingError::UnsupportedBoundary {
                reason: "surface encloses no volume".to_string(),
            });
        }

        let mut lattice = BoxLattice {
            nodes: HashMap::new(),
            subset,
            axes,
        };
        for &v in &surface_vertices {
            let p = grid.position(v).to_array();
            let mut ijk = [0; 3];
            for k in 0..3 {
                ijk[k] = lattice.axes[k].index_of(p[k]).ok_or_else(|| {
                    MeshingError::UnsupportedBoundary {
                        reason: format!("surface vertex {p:?} is off the lattice"),
                    }
                })?;
            }
            lattice.nodes.entry(ijk).or_insert(v);
        }

        let dims = [
            lattice.axes[0].len() - 1,
            lattice.axes[1].len() - 1,
            lattice.axes[2].len() - 1,
        ];
        let min_volume = tol.powi(3);
        let mut volumes = Vec::with_capacity(6 * dims[0] * dims[1] * dims[2]);
        let mut poor = 0usize;
        let mut worst_ratio = 0.0f64;

        for i in 0..dims[0] {
            for j in 0..dims[1] {
                for k in 0..dims[2] {
                    for path in KUHN_PATHS {
                        let mut ijk = [i, j, k];
                        let mut tet = [lattice.node(grid, ijk); 4];
                        for (slot, axis) in path.into_iter().enumerate() {
                            ijk[axis] += 1;
                            tet[slot + 1] = lattice.node(grid, ijk);
                        }

                        let mut pts = tet.map(|v| grid.position(v));
                        let vol = signed_volume(&pts);
                        if vol.abs() < min_volume {
                            return Err(MeshingError::DegenerateElement {
                                kind: "tetrahedron",
                                at: Point3d::centroid(&pts).to_array(),
                            });
                        }
                        if vol < 0.0 {
                            tet.swap(2, 3);
                            pts.swap(2, 3);
                        }

                        if let Some(ratio) = radius_edge_ratio(&pts) {
                            worst_ratio = worst_ratio.max(ratio);
                            if ratio > options.quality {
                                poor += 1;
                            }
                        }
                        volumes.push(grid.create_volume(tet, subset));
                    }
                }
            }
        }

        if poor > 0 {
            warn!(
                poor,
                worst_ratio,
                bound = options.quality,
                "tetrahedra exceed the radius-edge bound"
            );
        }

        if options.preserve_boundary {
            let mut tet_faces: HashSet<[VertexId; 3]> = HashSet::with_capacity(4 * volumes.len());
            for &vol in &volumes {
                let [a, b, c, d] = grid.volumes[vol].vertices;
                for tri in [[a, b, c], [a, b, d], [a, c, d], [b, c, d]] {
                    tet_faces.insert(face_key(tri));
                }
            }
            let missing = surface
                .iter()
                .filter(|&&f| !tet_faces.contains(&face_key(grid.faces[f].vertices)))
                .count();
            if missing > 0 {
                return Err(MeshingError::BoundaryNotPreserved { missing });
            }
        }

        debug!(cells = ?dims, "structured tetrahedralization lattice");
        info!(volumes = volumes.len(), worst_ratio, "tetrahedralized closed surface");
        Ok(volumes)
    }
}

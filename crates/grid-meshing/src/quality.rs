use std::collections::{HashMap, HashSet};

use grid_kernel::{edge_key, EdgeId, EdgeIndex, FaceId, Grid, VertexId};
use tracing::{debug, info, instrument};

use crate::traits::QualityImprover;
use crate::types::{MeshingError, QualityReport};
use crate::StructuredMesher;

/// Required gain in minimum angle (degrees) before an edge is flipped.
const FLIP_GAIN: f64 = 1e-9;

fn tri_min_angle(grid: &Grid, tri: [VertexId; 3]) -> f64 {
    let p = tri.map(|v| grid.position(v));
    (0..3)
        .map(|i| {
            let u = p[(i + 1) % 3] - p[i];
            let w = p[(i + 2) % 3] - p[i];
            u.angle_to(&w).to_degrees()
        })
        .fold(f64::INFINITY, f64::min)
}

fn surface_min_angle(grid: &Grid, faces: &[FaceId]) -> f64 {
    faces
        .iter()
        .map(|&f| tri_min_angle(grid, grid.faces[f].vertices))
        .fold(f64::INFINITY, f64::min)
}

/// Rotate a triangle so that `apex` comes last, keeping its winding.
fn with_apex_last(tri: [VertexId; 3], apex: VertexId) -> [VertexId; 3] {
    let mut t = tri;
    while t[2] != apex {
        t.rotate_left(1);
    }
    t
}

fn normal(grid: &Grid, tri: [VertexId; 3]) -> grid_kernel::Vec3 {
    let [a, b, c] = tri.map(|v| grid.position(v));
    (b - a).cross(&(c - a))
}

impl QualityImprover for StructuredMesher {
    /// Lawson flips: an interior edge shared by exactly two faces of the set is
    /// replaced by the opposite diagonal when the quad is convex and the
    /// smaller of the two minimum angles strictly grows. Only faces whose
    /// minimum angle is below `min_angle_deg` trigger a flip.
    #[instrument(skip(self, grid, faces, constraints), fields(faces = faces.len()))]
    fn improve(
        &mut self,
        grid: &mut Grid,
        faces: &[FaceId],
        constraints: &[EdgeId],
        min_angle_deg: f64,
    ) -> Result<QualityReport, MeshingError> {
        if faces.is_empty() {
            return Err(MeshingError::EmptyInput {
                operation: "quality improvement",
            });
        }
        let fixed: HashSet<(VertexId, VertexId)> = constraints
            .iter()
            .filter_map(|&e| grid.edges.get(e))
            .map(|e| edge_key(e.vertices[0], e.vertices[1]))
            .collect();

        let min_angle_before_deg = surface_min_angle(grid, faces);
        let mut edge_index = EdgeIndex::build(grid);
        let mut flips = 0;
        let max_passes = faces.len().max(1);

        for pass in 0..max_passes {
            let mut adjacency: HashMap<(VertexId, VertexId), Vec<FaceId>> = HashMap::new();
            for &f in faces {
                for (a, b) in grid.face_sides(f) {
                    adjacency.entry(edge_key(a, b)).or_default().push(f);
                }
            }
            let mut candidates: Vec<_> = adjacency
                .into_iter()
                .filter(|(key, fs)| fs.len() == 2 && !fixed.contains(key))
                .collect();
            // Deterministic order independent of hashing.
            candidates.sort_by(|a, b| a.0.cmp(&b.0));

            let mut touched: HashSet<FaceId> = HashSet::new();
            let mut pass_flips = 0;
            for ((a, b), fs) in candidates {
                let (f1, f2) = (fs[0], fs[1]);
                if touched.contains(&f1) || touched.contains(&f2) {
                    continue;
                }
                let t1 = grid.faces[f1].vertices;
                let t2 = grid.faces[f2].vertices;
                let before = tri_min_angle(grid, t1).min(tri_min_angle(grid, t2));
                if before >= min_angle_deg {
                    continue;
                }
                let Some(&c) = t1.iter().find(|&&v| v != a && v != b) else {
                    continue;
                };
                let Some(&d) = t2.iter().find(|&&v| v != a && v != b) else {
                    continue;
                };
                if c == d {
                    continue;
                }

                // t1 as (p, q, c); the flipped pair keeps its winding.
                let [p, q, _] = with_apex_last(t1, c);
                let n1 = [p, d, c];
                let n2 = [d, q, c];
                let reference = normal(grid, t1);
                if normal(grid, n1).dot(&reference) <= 0.0
                    || normal(grid, n2).dot(&reference) <= 0.0
                {
                    continue;
                }
                let after = tri_min_angle(grid, n1).min(tri_min_angle(grid, n2));
                if after <= before + FLIP_GAIN {
                    continue;
                }

                let subset = grid.faces[f1].subset;
                if let Some(old) = edge_index.remove(a, b) {
                    grid.erase_edge(old);
                }
                edge_index.find_or_create(grid, c, d, subset);
                grid.faces[f1].vertices = n1;
                grid.faces[f2].vertices = n2;
                touched.insert(f1);
                touched.insert(f2);
                pass_flips += 1;
            }

            debug!(pass, flips = pass_flips, "flip pass");
            flips += pass_flips;
            if pass_flips == 0 {
                break;
            }
        }

        let report = QualityReport {
            flips,
            min_angle_before_deg,
            min_angle_after_deg: surface_min_angle(grid, faces),
        };
        info!(
            flips,
            before = report.min_angle_before_deg,
            after = report.min_angle_after_deg,
            "quality improvement finished"
        );
        Ok(report)
    }
}

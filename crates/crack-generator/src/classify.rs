//! Region membership from element centroids.
//!
//! Triangulation, extrusion and tetrahedralization create fresh elements in
//! the pool region; nothing is carried across those passes. Membership is
//! re-derived here from geometry alone: an element belongs to the first
//! region whose box contains its centroid.

use grid_kernel::{BoundingBox, FaceId, Grid, Point3d, Selector, SubsetIndex, VolumeId};
use tracing::{debug, instrument};

use crate::context::BuildContext;
use crate::error::BuildError;

/// Classification predicate for one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBox {
    pub region: SubsetIndex,
    pub bounds: BoundingBox,
}

impl RegionBox {
    /// Resolve a named box against the context's regions.
    pub fn named(ctx: &BuildContext, name: &str, bounds: BoundingBox) -> Result<Self, BuildError> {
        Ok(Self {
            region: ctx.region(name)?,
            bounds,
        })
    }
}

/// Per-box counts of a classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Elements assigned per box, in box order.
    pub assigned: Vec<usize>,
    /// Elements no box contained; they keep their region.
    pub unmatched: usize,
}

/// Index of the first box containing `p`.
pub fn first_match(boxes: &[RegionBox], p: &Point3d) -> Option<usize> {
    boxes.iter().position(|b| b.bounds.contains_point(p))
}

fn classify_by<K: Copy>(
    ctx: &mut BuildContext,
    items: &[K],
    boxes: &[RegionBox],
    centroid: impl Fn(&Grid, K) -> Point3d,
    select: impl Fn(&mut Selector, K),
) -> Result<Classification, BuildError> {
    let mut buckets: Vec<Vec<K>> = vec![Vec::new(); boxes.len()];
    let mut unmatched = 0;
    for &item in items {
        match first_match(boxes, &centroid(&ctx.grid, item)) {
            Some(i) => buckets[i].push(item),
            None => unmatched += 1,
        }
    }

    let mut assigned = Vec::with_capacity(boxes.len());
    for (b, bucket) in boxes.iter().zip(&buckets) {
        ctx.selector.clear();
        for &item in bucket {
            select(&mut ctx.selector, item);
        }
        ctx.selector.close_selection(&ctx.grid);
        ctx.subsets
            .assign_selection(&mut ctx.grid, &ctx.selector, b.region)?;
        assigned.push(bucket.len());
    }
    ctx.selector.clear();

    debug!(?assigned, unmatched, "classified elements");
    Ok(Classification {
        assigned,
        unmatched,
    })
}

/// Assign each face, with its edges and vertices, to the first box holding
/// its centroid.
#[instrument(skip_all, fields(faces = faces.len(), boxes = boxes.len()))]
pub fn classify_faces(
    ctx: &mut BuildContext,
    faces: &[FaceId],
    boxes: &[RegionBox],
) -> Result<Classification, BuildError> {
    classify_by(
        ctx,
        faces,
        boxes,
        |g, f| g.face_centroid(f),
        |sel, f| sel.select_face(f),
    )
}

/// Assign each volume, with its faces, edges and vertices, to the first box
/// holding its centroid.
#[instrument(skip_all, fields(volumes = volumes.len(), boxes = boxes.len()))]
pub fn classify_volumes(
    ctx: &mut BuildContext,
    volumes: &[VolumeId],
    boxes: &[RegionBox],
) -> Result<Classification, BuildError> {
    classify_by(
        ctx,
        volumes,
        boxes,
        |g, v| g.volume_centroid(v),
        |sel, v| sel.select_volume(v),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_kernel::VertexId;

    /// Three unit squares stacked along y, two triangles each, all in the pool.
    fn strip(ctx: &mut BuildContext) -> Vec<FaceId> {
        let mut v: Vec<[VertexId; 2]> = Vec::new();
        for j in 0..4 {
            let y = j as f64;
            v.push([
                ctx.add_vertex(Point3d::planar(0.0, y)),
                ctx.add_vertex(Point3d::planar(1.0, y)),
            ]);
        }
        let mut faces = Vec::new();
        for j in 0..3 {
            let [a, b] = v[j];
            let [d, c] = v[j + 1];
            for (p, q) in [(a, b), (b, c), (c, a), (c, d), (d, a)] {
                if ctx.grid.find_edge(p, q).is_none() {
                    ctx.add_edge(p, q);
                }
            }
            faces.push(ctx.grid.create_face([a, b, c], SubsetIndex(0)));
            faces.push(ctx.grid.create_face([a, c, d], SubsetIndex(0)));
        }
        faces
    }

    fn band(y0: f64, y1: f64) -> BoundingBox {
        BoundingBox::new(Point3d::new(0.0, y0, 0.0), Point3d::new(1.0, y1, 0.0)).expanded(1e-6)
    }

    #[test]
    fn test_every_face_leaves_the_pool() {
        let mut ctx = BuildContext::with_regions("test", &["Pool", "A", "B"]);
        let faces = strip(&mut ctx);
        let boxes = [
            RegionBox::named(&ctx, "A", band(0.0, 1.0)).unwrap(),
            RegionBox::named(&ctx, "B", band(1.0, 3.0)).unwrap(),
        ];
        let result = classify_faces(&mut ctx, &faces, &boxes).unwrap();

        assert_eq!(result.assigned, vec![2, 4]);
        assert_eq!(result.unmatched, 0);
        let pool = ctx.subsets.element_counts(&ctx.grid, SubsetIndex(0));
        assert!(pool.is_empty());
        assert!(ctx.selector.is_empty());
    }

    #[test]
    fn test_unmatched_faces_stay_in_pool() {
        let mut ctx = BuildContext::with_regions("test", &["Pool", "A"]);
        let faces = strip(&mut ctx);
        let boxes = [RegionBox::named(&ctx, "A", band(0.0, 1.0)).unwrap()];
        let result = classify_faces(&mut ctx, &faces, &boxes).unwrap();
        assert_eq!(result.unmatched, 4);
        assert_eq!(ctx.grid.faces_in(SubsetIndex(0)).len(), 4);
    }

    #[test]
    fn test_first_registered_box_wins_on_overlap() {
        let p = Point3d::planar(0.5, 1.0);
        let lower = RegionBox {
            region: SubsetIndex(1),
            bounds: band(0.0, 1.0),
        };
        let upper = RegionBox {
            region: SubsetIndex(2),
            bounds: band(1.0, 2.0),
        };
        assert_eq!(first_match(&[lower, upper], &p), Some(0));
        assert_eq!(first_match(&[upper, lower], &p), Some(0));
        assert_eq!(first_match(&[upper, lower], &Point3d::planar(0.5, 0.5)), Some(1));
    }
}

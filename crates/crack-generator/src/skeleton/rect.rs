//! Rectangle skeletons of the bridging domain.

use grid_kernel::{EdgeId, Point3d, VertexId};
use tracing::{debug, instrument};

use crate::context::BuildContext;
use crate::lattice::{refine_rectangle, RefinedRect};

/// Corner pairs of a rectangle split by a layer line. Every pair runs from
/// the same side of the domain to the opposite one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectCorners {
    /// Side facing the MD layer.
    pub base: [Point3d; 2],
    /// Line between the boundary layer and the bulk region.
    pub layer: [Point3d; 2],
    /// Outer side.
    pub top: [Point3d; 2],
}

/// Coarse outline of one rectangle: six corners, four sides and the layer
/// line. The coarse edges only exist until the rectangle is refined.
#[derive(Debug, Clone)]
pub struct RectSkeleton {
    pub base: [VertexId; 2],
    pub layer: [VertexId; 2],
    pub top: [VertexId; 2],
    pub coarse: Vec<EdgeId>,
}

impl RectSkeleton {
    pub fn outline(ctx: &mut BuildContext, corners: &RectCorners) -> Self {
        let base = corners.base.map(|p| ctx.add_vertex(p));
        let layer = corners.layer.map(|p| ctx.add_vertex(p));
        let top = corners.top.map(|p| ctx.add_vertex(p));
        let coarse = vec![
            ctx.add_edge(base[0], base[1]),
            ctx.add_edge(top[0], top[1]),
            ctx.add_edge(base[0], top[0]),
            ctx.add_edge(base[1], top[1]),
            ctx.add_edge(layer[0], layer[1]),
        ];
        Self {
            base,
            layer,
            top,
            coarse,
        }
    }

    /// Rasterize base-to-layer and layer-to-top, then drop the coarse edges.
    /// Returns the base corners for joining to the neighbouring rectangle.
    #[instrument(skip(self, ctx))]
    pub fn refine(self, ctx: &mut BuildContext, spacing: f64, eps: f64) -> [VertexId; 2] {
        let boundary = refine_rectangle(ctx, self.base, self.layer, spacing, eps);
        let bulk = refine_rectangle(ctx, self.layer, self.top, spacing, eps);
        erase_edges(ctx, &self.coarse);
        debug!(
            boundary_layer = boundary.edges.len(),
            bulk = bulk.edges.len(),
            "rectangle refined"
        );
        self.base
    }
}

/// Build a rectangle with its layer line, refine it to `spacing` and keep
/// only the lattice edges. Returns the two base corner vertices.
pub fn create_rect(
    ctx: &mut BuildContext,
    corners: &RectCorners,
    spacing: f64,
    eps: f64,
) -> [VertexId; 2] {
    RectSkeleton::outline(ctx, corners).refine(ctx, spacing, eps)
}

/// Coarse side edges joining the base corners of two rectangles.
pub fn join_bases(ctx: &mut BuildContext, lower: [VertexId; 2], upper: [VertexId; 2]) -> Vec<EdgeId> {
    vec![
        ctx.add_edge(lower[0], upper[0]),
        ctx.add_edge(lower[1], upper[1]),
    ]
}

/// Refine the strip between two base lines and drop the coarse joins.
pub fn refine_between(
    ctx: &mut BuildContext,
    lower: [VertexId; 2],
    upper: [VertexId; 2],
    coarse: &[EdgeId],
    spacing: f64,
    eps: f64,
) -> RefinedRect {
    let refined = refine_rectangle(ctx, lower, upper, spacing, eps);
    erase_edges(ctx, coarse);
    refined
}

fn erase_edges(ctx: &mut BuildContext, edges: &[EdgeId]) {
    for &e in edges {
        ctx.grid.erase_edge(e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> RectCorners {
        RectCorners {
            base: [Point3d::planar(0.0, 1.0), Point3d::planar(1.0, 1.0)],
            layer: [Point3d::planar(0.0, 0.8), Point3d::planar(1.0, 0.8)],
            top: [Point3d::planar(0.0, 0.0), Point3d::planar(1.0, 0.0)],
        }
    }

    #[test]
    fn test_coarse_outline_has_five_edges() {
        let mut ctx = BuildContext::with_regions("test", &["pool"]);
        let skel = RectSkeleton::outline(&mut ctx, &corners());
        assert_eq!(ctx.grid.counts(), (6, 5, 0, 0));
        assert_eq!(skel.coarse.len(), 5);
    }

    #[test]
    fn test_create_rect_keeps_only_lattice_edges() {
        let mut ctx = BuildContext::with_regions("test", &["pool"]);
        let base = create_rect(&mut ctx, &corners(), 0.2, 1e-9);

        assert!((ctx.grid.position(base[0]).y - 1.0).abs() < 1e-12);
        assert!((ctx.grid.position(base[1]).x - 1.0).abs() < 1e-12);
        for e in ctx.grid.edges.keys() {
            assert!(ctx.grid.edge_length(e) <= 0.2 + 1e-9);
        }
        // The layer line was rasterized twice; the copies are still separate
        // until duplicates are merged.
        let on_layer = ctx
            .grid
            .vertices
            .values()
            .filter(|v| (v.position.y - 0.8).abs() < 1e-9)
            .count();
        assert_eq!(on_layer, 2 + 2 * 4);
    }
}

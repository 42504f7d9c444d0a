//! Uniform lattice refinement of rectangle boundaries.

use grid_kernel::{EdgeId, VertexId};
use tracing::{debug, instrument};

use crate::context::BuildContext;

/// Offsets `0, s, 2s, …` strictly below `length - eps`, then `length` itself.
///
/// A length that is not a multiple of `spacing` ends with one shorter
/// segment. Yields `ceil(length / spacing) + 1` offsets.
pub fn lattice_positions(length: f64, spacing: f64, eps: f64) -> Vec<f64> {
    let mut positions = Vec::new();
    if spacing <= 0.0 || length <= eps {
        positions.push(0.0);
        positions.push(length.max(0.0));
        return positions;
    }
    let mut pos = 0.0;
    while pos < length - eps {
        positions.push(pos);
        pos += spacing;
    }
    positions.push(length);
    positions
}

/// Vertices and edges produced by one refinement.
#[derive(Debug, Clone, Default)]
pub struct RefinedRect {
    /// Vertices along the `lower` segment, from its first to its second corner.
    pub lower: Vec<VertexId>,
    /// Vertices along the `upper` segment, in the same order.
    pub upper: Vec<VertexId>,
    pub edges: Vec<EdgeId>,
}

impl RefinedRect {
    pub fn vertex_count(&self) -> usize {
        self.lower.len() + self.upper.len()
    }
}

/// Chain of vertices from `from` to `to` at the given offsets, reusing the
/// two end vertices.
fn rasterize(
    ctx: &mut BuildContext,
    from: VertexId,
    to: VertexId,
    spacing: f64,
    eps: f64,
    edges: &mut Vec<EdgeId>,
) -> Vec<VertexId> {
    let (p, q) = (ctx.grid.position(from), ctx.grid.position(to));
    let length = p.distance_to(&q);
    let offsets = lattice_positions(length, spacing, eps);
    let last = offsets.len() - 1;

    let mut chain = Vec::with_capacity(offsets.len());
    for (i, &t) in offsets.iter().enumerate() {
        let v = match i {
            0 => from,
            _ if i == last => to,
            _ => ctx.add_vertex(p.lerp(&q, t / length)),
        };
        if let Some(&prev) = chain.last() {
            edges.push(ctx.add_edge(prev, v));
        }
        chain.push(v);
    }
    chain
}

/// Rasterize the boundary of the rectangle spanned by two parallel segments.
///
/// `lower = [a0, a1]` and `upper = [b0, b1]` with `a0–b0` and `a1–b1` the
/// perpendicular sides. All four sides get vertices every `spacing`, forced
/// onto the exact corners, joined by edges in the active region. The
/// interior stays empty.
#[instrument(skip(ctx), fields(active = ctx.active_region().0))]
pub fn refine_rectangle(
    ctx: &mut BuildContext,
    lower: [VertexId; 2],
    upper: [VertexId; 2],
    spacing: f64,
    eps: f64,
) -> RefinedRect {
    let mut edges = Vec::new();
    let lower_chain = rasterize(ctx, lower[0], lower[1], spacing, eps, &mut edges);
    let upper_chain = rasterize(ctx, upper[0], upper[1], spacing, eps, &mut edges);
    rasterize(ctx, lower[0], upper[0], spacing, eps, &mut edges);
    rasterize(ctx, lower[1], upper[1], spacing, eps, &mut edges);

    debug!(
        along = lower_chain.len(),
        edges = edges.len(),
        "refined rectangle boundary"
    );
    RefinedRect {
        lower: lower_chain,
        upper: upper_chain,
        edges,
    }
}

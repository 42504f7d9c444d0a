//! V-shaped crack-tip skeleton closed by three nested squares.
//!
//! The tip sits at the origin and the arms open towards -x at ±angle. Each
//! arm end pair at radius `r` is closed into a square centred on the tip
//! with half side `r·cos(angle)`.

use grid_kernel::{Point3d, SubsetIndex, VertexId};
use tracing::debug;

use crate::context::BuildContext;
use crate::error::BuildError;
use crate::params::CrackParams;

pub const SQUARE_NAMES: [&str; 3] = ["Inner square", "Middle square", "Outer square"];

/// Derived dimensions of the square closing a V at one radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosingSquare {
    pub radius: f64,
    /// Distance from the tip to the chord midpoint.
    pub diag: f64,
    /// Distance between the two arm ends.
    pub chord: f64,
    /// Extra height needed on top of the chord, `2·diag − chord`.
    pub height: f64,
}

impl ClosingSquare {
    pub fn new(radius: f64, angle_rad: f64) -> Self {
        let diag = radius * angle_rad.cos();
        let chord = 2.0 * radius * angle_rad.sin();
        Self {
            radius,
            diag,
            chord,
            height: 2.0 * diag - chord,
        }
    }

    /// Half the side length; equals `diag`.
    pub fn half_side(&self) -> f64 {
        (self.chord + self.height) / 2.0
    }
}

/// Closing squares for the inner, middle and outer radius. All heights are
/// checked before anything is built.
pub fn closing_squares(params: &CrackParams) -> Result<[ClosingSquare; 3], BuildError> {
    let angle = params.angle_degrees.to_radians();
    let squares = params.radii().map(|r| ClosingSquare::new(r, angle));
    for (square, name) in squares.iter().zip(SQUARE_NAMES) {
        if square.height < 0.0 {
            return Err(BuildError::InvalidGeometry {
                square: name,
                height: square.height,
            });
        }
    }
    Ok(squares)
}

/// Arm end at `radius`; `side` is -1 for the lower arm and +1 for the upper.
pub fn arm_end(radius: f64, angle_rad: f64, side: f64) -> Point3d {
    Point3d::planar(-radius * angle_rad.cos(), side * radius * angle_rad.sin())
}

/// Tip and arm ends (lower, upper) at each radius.
#[derive(Debug, Clone, Copy)]
pub struct CrackArms {
    pub tip: VertexId,
    pub ends: [[VertexId; 2]; 3],
}

/// Both arms as chained segments tip → inner → middle → outer. The segment
/// reaching radius `i` goes to `regions[i]`.
pub fn build_arms(
    ctx: &mut BuildContext,
    params: &CrackParams,
    regions: [SubsetIndex; 3],
) -> Result<CrackArms, BuildError> {
    let angle = params.angle_degrees.to_radians();
    ctx.set_active_region(regions[0])?;
    let tip = ctx.add_vertex(Point3d::ORIGIN);

    let mut prev = [tip, tip];
    let mut ends = [[tip; 2]; 3];
    for (i, r) in params.radii().into_iter().enumerate() {
        ctx.set_active_region(regions[i])?;
        let lower = ctx.add_vertex(arm_end(r, angle, -1.0));
        let upper = ctx.add_vertex(arm_end(r, angle, 1.0));
        ctx.add_edge(prev[0], lower);
        ctx.add_edge(prev[1], upper);
        ends[i] = [lower, upper];
        prev = [lower, upper];
    }
    debug!(tip = ?ctx.grid.position(tip), "crack arms built");
    Ok(CrackArms { tip, ends })
}

/// Close a V into a square in the active region. Returns the corners as
/// (lower left, upper left, lower right, upper right).
pub fn close_square(
    ctx: &mut BuildContext,
    ends: [VertexId; 2],
    square: &ClosingSquare,
) -> [VertexId; 4] {
    let half = square.height / 2.0;
    let run = square.height + square.chord;
    let lower = ctx.grid.position(ends[0]);
    let upper = ctx.grid.position(ends[1]);

    let ll = ctx.add_vertex(Point3d::planar(lower.x, lower.y - half));
    let ul = ctx.add_vertex(Point3d::planar(upper.x, upper.y + half));
    let lr = ctx.add_vertex(Point3d::planar(lower.x + run, lower.y - half));
    let ur = ctx.add_vertex(Point3d::planar(upper.x + run, upper.y + half));

    ctx.add_edge(ends[0], ll);
    ctx.add_edge(ends[1], ul);
    ctx.add_edge(ll, lr);
    ctx.add_edge(ul, ur);
    ctx.add_edge(lr, ur);
    [ll, ul, lr, ur]
}

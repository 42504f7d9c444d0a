//! Parametric boundary skeletons.

pub mod crack;
pub mod rect;

pub use crack::{build_arms, close_square, closing_squares, ClosingSquare, CrackArms, SQUARE_NAMES};
pub use rect::{create_rect, join_bases, refine_between, RectCorners, RectSkeleton};

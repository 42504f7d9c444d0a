use serde::{Deserialize, Serialize};

use super::point::Point3d;

/// Axis-aligned box used as a region predicate: a point is inside when it
/// lies within or on the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3d,
    pub max: Point3d,
}

impl BoundingBox {
    pub fn new(min: Point3d, max: Point3d) -> Self {
        Self { min, max }
    }

    /// Contains nothing; grows with [`expand_to_include`](Self::expand_to_include).
    pub fn empty() -> Self {
        Self::new(
            Point3d::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            Point3d::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        )
    }

    pub fn from_points(points: &[Point3d]) -> Self {
        let mut bb = Self::empty();
        points.iter().for_each(|p| bb.expand_to_include(p));
        bb
    }

    pub fn expand_to_include(&mut self, p: &Point3d) {
        self.min = Point3d::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z));
        self.max = Point3d::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z));
    }

    pub fn contains_point(&self, p: &Point3d) -> bool {
        let inside = |v: f64, lo: f64, hi: f64| lo <= v && v <= hi;
        inside(p.x, self.min.x, self.max.x)
            && inside(p.y, self.min.y, self.max.y)
            && inside(p.z, self.min.z, self.max.z)
    }

    /// Grown by `margin` on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self::new(
            Point3d::new(self.min.x - margin, self.min.y - margin, self.min.z - margin),
            Point3d::new(self.max.x + margin, self.max.y + margin, self.max.z + margin),
        )
    }

    /// Same footprint, z range replaced by `[z_min, z_max]`.
    pub fn with_z_range(&self, z_min: f64, z_max: f64) -> Self {
        Self::new(
            Point3d::new(self.min.x, self.min.y, z_min),
            Point3d::new(self.max.x, self.max.y, z_max),
        )
    }
}

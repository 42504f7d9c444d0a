use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use super::vector::Vec3;

/// Vertex position. Sketches live in the z = 0 plane and are extruded
/// along +z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn planar(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        (*other - *self).length()
    }

    /// Point at fraction `t` of the way to `other`.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        *self + (*other - *self) * t
    }

    /// Mean of `points`; the origin for an empty slice.
    pub fn centroid(points: &[Point3d]) -> Self {
        if points.is_empty() {
            return Self::ORIGIN;
        }
        let sum = points
            .iter()
            .fold(Vec3::ZERO, |acc, p| Vec3::new(acc.x + p.x, acc.y + p.y, acc.z + p.z));
        Self::ORIGIN + sum * (1.0 / points.len() as f64)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Add<Vec3> for Point3d {
    type Output = Point3d;
    fn add(self, rhs: Vec3) -> Self::Output {
        Point3d::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3d {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

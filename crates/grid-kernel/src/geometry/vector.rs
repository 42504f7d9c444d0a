use serde::{Deserialize, Serialize};
use std::ops::{Mul, Sub};

/// Displacement between two grid positions; also the sweep direction of an
/// extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Extrusion axis of the layered domains.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// `None` when the vector is too short to carry a direction.
    pub fn normalized(&self) -> Option<Self> {
        let len = self.length();
        (len >= 1e-15).then(|| *self * (1.0 / len))
    }

    /// Unsigned angle in radians; 0 when either side is degenerate.
    pub fn angle_to(&self, other: &Self) -> f64 {
        let norms = self.length() * other.length();
        if norms < 1e-15 {
            return 0.0;
        }
        (self.dot(other) / norms).clamp(-1.0, 1.0).acos()
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cross_of_lattice_edges_is_normal() {
        let n = Vec3::new(0.2, 0.0, 0.0).cross(&Vec3::new(0.0, 0.3, 0.0));
        assert_relative_eq!(n.z, 0.06, epsilon = 1e-12);
        let unit = n.normalized().unwrap();
        assert_relative_eq!(unit.z, 1.0, epsilon = 1e-12);
        assert_eq!((unit.x, unit.y), (0.0, 0.0));
    }

    #[test]
    fn test_zero_has_no_direction() {
        assert!(Vec3::ZERO.normalized().is_none());
        assert_eq!(Vec3::ZERO.angle_to(&Vec3::Z), 0.0);
    }

    #[test]
    fn test_right_triangle_angle() {
        let u = Vec3::new(1.0, 0.0, 0.0);
        let w = Vec3::new(1.0, 1.0, 0.0);
        assert_relative_eq!(u.angle_to(&w).to_degrees(), 45.0, epsilon = 1e-9);
    }

    #[test]
    fn test_scaled_step() {
        let step = Vec3::Z * 0.15;
        assert_relative_eq!(step.length(), 0.15, epsilon = 1e-15);
    }
}

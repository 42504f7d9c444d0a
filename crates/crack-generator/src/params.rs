//! Input parameters and their eager validation.

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildWarning};

fn require_positive(name: &'static str, value: f64) -> Result<(), BuildError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BuildError::invalid(name, value, "must be positive and finite"))
    }
}

/// Whether `length` is a whole multiple of `spacing` within `tolerance`
/// (relative to the quotient).
pub fn is_divisible(length: f64, spacing: f64, tolerance: f64) -> bool {
    let q = length / spacing;
    (q - q.round()).abs() <= tolerance * q.abs().max(1.0)
}

/// Parameters of the crack-tip skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrackParams {
    pub crack_inner_length: f64,
    pub inner_thickness: f64,
    pub crack_outer_length: f64,
    pub angle_degrees: f64,
}

impl CrackParams {
    /// Lengths must be positive with `inner_thickness < crack_inner_length <
    /// crack_outer_length`, and the half-opening angle inside (0, 90).
    pub fn validate(&self) -> Result<(), BuildError> {
        require_positive("crack_inner_length", self.crack_inner_length)?;
        require_positive("inner_thickness", self.inner_thickness)?;
        require_positive("crack_outer_length", self.crack_outer_length)?;
        if self.inner_thickness >= self.crack_inner_length {
            return Err(BuildError::invalid(
                "inner_thickness",
                self.inner_thickness,
                format!(
                    "must be less than crack_inner_length ({})",
                    self.crack_inner_length
                ),
            ));
        }
        if self.crack_inner_length >= self.crack_outer_length {
            return Err(BuildError::invalid(
                "crack_inner_length",
                self.crack_inner_length,
                format!(
                    "must be less than crack_outer_length ({})",
                    self.crack_outer_length
                ),
            ));
        }
        let a = self.angle_degrees;
        if !(a.is_finite() && a > 0.0 && a < 90.0) {
            return Err(BuildError::invalid(
                "angle_degrees",
                a,
                "must lie strictly between 0 and 90 degrees",
            ));
        }
        Ok(())
    }

    /// Radii of the inner, middle and outer V, in that order.
    pub fn radii(&self) -> [f64; 3] {
        [
            self.inner_thickness,
            self.crack_inner_length,
            self.crack_outer_length,
        ]
    }
}

/// Parameters of the layered bridging-domain slab.
///
/// The slab stacks `FE1 | BD1 | MD | BD2 | FE2` along y: each outer rectangle
/// is `height` tall and carries a boundary layer of `thickness` on its MD
/// side; the MD layer between them is `spacing` tall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BridgingDomainParams {
    pub height: f64,
    pub width: f64,
    pub depth: f64,
    pub thickness: f64,
    pub spacing: f64,
    pub lattice_finess: f64,
    pub lattice_constant: f64,
}

impl BridgingDomainParams {
    /// Target edge length `h·r₀`.
    pub fn lattice_spacing(&self) -> f64 {
        self.lattice_finess * self.lattice_constant
    }

    /// Total extent along y.
    pub fn total_height(&self) -> f64 {
        2.0 * self.height + self.spacing
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        require_positive("height", self.height)?;
        require_positive("width", self.width)?;
        require_positive("depth", self.depth)?;
        require_positive("thickness", self.thickness)?;
        require_positive("spacing", self.spacing)?;
        require_positive("lattice_finess", self.lattice_finess)?;
        require_positive("lattice_constant", self.lattice_constant)?;

        for (name, bound) in [
            ("height", self.height),
            ("width", self.width),
            ("depth", self.depth),
        ] {
            if self.thickness >= bound {
                return Err(BuildError::invalid(
                    "thickness",
                    self.thickness,
                    format!("must be less than {name} ({bound})"),
                ));
            }
        }
        Ok(())
    }

    /// Lattice dimensions that do not divide evenly by the spacing. None of
    /// them stops the build.
    pub fn spacing_warnings(&self, extrusion_step: f64, tolerance: f64) -> Vec<BuildWarning> {
        let s = self.lattice_spacing();
        let checks = [
            ("width", self.width, s),
            ("bulk height", self.height - self.thickness, s),
            ("thickness", self.thickness, s),
            ("spacing", self.spacing, s),
            ("depth", self.depth, extrusion_step),
        ];
        checks
            .into_iter()
            .filter(|&(_, length, spacing)| !is_divisible(length, spacing, tolerance))
            .map(|(dimension, length, spacing)| BuildWarning::NonUniformSpacing {
                dimension,
                length,
                spacing,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BridgingDomainParams {
        BridgingDomainParams {
            height: 1.0,
            width: 1.0,
            depth: 1.0,
            thickness: 0.2,
            spacing: 0.2,
            lattice_finess: 1.0,
            lattice_constant: 0.1,
        }
    }

    #[test]
    fn test_thickness_must_be_below_every_dimension() {
        assert!(params().validate().is_ok());
        let half = BridgingDomainParams {
            thickness: 0.5,
            ..params()
        };
        assert!(half.validate().is_ok());

        let equal = BridgingDomainParams {
            thickness: 1.0,
            ..params()
        };
        assert!(matches!(
            equal.validate(),
            Err(BuildError::InvalidParameter {
                name: "thickness",
                ..
            })
        ));

        let shallow = BridgingDomainParams {
            depth: 0.1,
            ..params()
        };
        assert!(shallow.validate().is_err());
    }

    #[test]
    fn test_non_positive_values_rejected() {
        let p = BridgingDomainParams {
            lattice_constant: 0.0,
            ..params()
        };
        assert!(matches!(
            p.validate(),
            Err(BuildError::InvalidParameter {
                name: "lattice_constant",
                ..
            })
        ));
        let p = BridgingDomainParams {
            width: f64::NAN,
            ..params()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_divisibility() {
        assert!(is_divisible(1.0, 0.1, 1e-6));
        assert!(is_divisible(0.9, 0.3, 1e-6));
        assert!(!is_divisible(1.0, 0.3, 1e-6));
    }

    #[test]
    fn test_spacing_warnings_name_the_dimension() {
        let p = BridgingDomainParams {
            width: 1.05,
            ..params()
        };
        let warnings = p.spacing_warnings(0.05, 1e-6);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            BuildWarning::NonUniformSpacing {
                dimension: "width",
                ..
            }
        ));
        assert!(params().spacing_warnings(0.05, 1e-6).is_empty());
    }

    #[test]
    fn test_crack_angle_range() {
        let ok = CrackParams {
            crack_inner_length: 0.2,
            inner_thickness: 0.1,
            crack_outer_length: 2.0,
            angle_degrees: 10.0,
        };
        assert!(ok.validate().is_ok());
        for angle in [0.0, 90.0, -5.0] {
            let bad = CrackParams {
                angle_degrees: angle,
                ..ok
            };
            assert!(bad.validate().is_err());
        }
    }

    #[test]
    fn test_crack_radii_must_increase() {
        let ok = CrackParams {
            crack_inner_length: 0.2,
            inner_thickness: 0.1,
            crack_outer_length: 2.0,
            angle_degrees: 10.0,
        };
        let swapped = CrackParams {
            inner_thickness: 0.3,
            ..ok
        };
        assert!(matches!(
            swapped.validate(),
            Err(BuildError::InvalidParameter {
                name: "inner_thickness",
                ..
            })
        ));
        let short_outer = CrackParams {
            crack_outer_length: 0.2,
            ..ok
        };
        assert!(matches!(
            short_outer.validate(),
            Err(BuildError::InvalidParameter {
                name: "crack_inner_length",
                ..
            })
        ));
    }
}

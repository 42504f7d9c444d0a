//! Placement of the bridging-domain regions.
//!
//! x runs across the width, y stacks the regions, z is the extrusion depth:
//!
//! ```text
//! y = 2h+s   ┌──────────┐
//!            │   FE2    │
//! y = h+s+t  ├──────────┤
//!            │   BD2    │
//! y = h+s    ├──────────┤
//!            │    MD    │
//! y = h      ├──────────┤
//!            │   BD1    │
//! y = h-t    ├──────────┤
//!            │   FE1    │
//! y = 0      └──────────┘
//! ```

use grid_kernel::{BoundingBox, Point3d};

use crate::params::BridgingDomainParams;
use crate::skeleton::RectCorners;

/// Region holding every element not yet classified.
pub const POOL: &str = "Pool";

/// Volume regions in classification order.
pub const VOLUME_REGIONS: [&str; 5] = ["FE1", "BD1", "FE2", "BD2", "MD"];

/// Every region the finished domain carries.
pub const FINAL_REGIONS: [&str; 7] = ["FE1", "BD1", "FE2", "BD2", "MD", "Top", "Bottom"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainLayout {
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
    pub spacing: f64,
}

impl From<&BridgingDomainParams> for DomainLayout {
    fn from(p: &BridgingDomainParams) -> Self {
        Self {
            width: p.width,
            height: p.height,
            thickness: p.thickness,
            spacing: p.spacing,
        }
    }
}

fn line(width: f64, y: f64) -> [Point3d; 2] {
    [Point3d::planar(0.0, y), Point3d::planar(width, y)]
}

impl DomainLayout {
    pub fn total_height(&self) -> f64 {
        2.0 * self.height + self.spacing
    }

    /// FE1 with BD1 on top of it.
    pub fn lower_rect(&self) -> RectCorners {
        let (h, t, w) = (self.height, self.thickness, self.width);
        RectCorners {
            base: line(w, h),
            layer: line(w, h - t),
            top: line(w, 0.0),
        }
    }

    /// BD2 with FE2 on top of it.
    pub fn upper_rect(&self) -> RectCorners {
        let (h, t, s, w) = (self.height, self.thickness, self.spacing, self.width);
        RectCorners {
            base: line(w, h + s),
            layer: line(w, h + s + t),
            top: line(w, 2.0 * h + s),
        }
    }

    /// y extent of each volume region, in [`VOLUME_REGIONS`] order.
    pub fn region_spans(&self) -> [(&'static str, f64, f64); 5] {
        let (h, t, s) = (self.height, self.thickness, self.spacing);
        [
            ("FE1", 0.0, h - t),
            ("BD1", h - t, h),
            ("FE2", h + s + t, 2.0 * h + s),
            ("BD2", h + s, h + s + t),
            ("MD", h, h + s),
        ]
    }

    /// Boxes of the volume regions over the z range `[0, z_top]`, grown by
    /// `margin`.
    pub fn region_boxes(&self, z_top: f64, margin: f64) -> Vec<(&'static str, BoundingBox)> {
        self.region_spans()
            .into_iter()
            .map(|(name, y0, y1)| {
                let bb = BoundingBox::new(
                    Point3d::new(0.0, y0, 0.0),
                    Point3d::new(self.width, y1, z_top),
                );
                (name, bb.expanded(margin))
            })
            .collect()
    }

    /// Thin slabs around the top (`z = z_top`) and bottom (`z = 0`) faces.
    pub fn boundary_boxes(&self, z_top: f64, margin: f64) -> Vec<(&'static str, BoundingBox)> {
        let footprint = BoundingBox::new(
            Point3d::ORIGIN,
            Point3d::planar(self.width, self.total_height()),
        )
        .expanded(margin);
        vec![
            ("Top", footprint.with_z_range(z_top - margin, z_top + margin)),
            ("Bottom", footprint.with_z_range(-margin, margin)),
        ]
    }
}

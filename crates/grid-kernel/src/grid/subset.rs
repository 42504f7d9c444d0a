//! Named subsets (regions) partitioning grid elements.
//!
//! Membership is stored on the elements themselves; the handler owns the
//! subset names, colors and the default index given to newly created
//! elements.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::selector::Selector;
use super::Grid;
use crate::error::GridError;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SubsetIndex(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetInfo {
    pub name: String,
    /// Display color (RGB).
    pub color: [u8; 3],
}

/// Element counts of one subset: (vertices, edges, faces, volumes).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubsetCounts {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    pub volumes: usize,
}

impl SubsetCounts {
    pub fn total(&self) -> usize {
        self.vertices + self.edges + self.faces + self.volumes
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubsetHandler {
    subsets: Vec<SubsetInfo>,
    default_index: SubsetIndex,
}

impl SubsetHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subset and return its index.
    pub fn add_subset(&mut self, name: impl Into<String>) -> SubsetIndex {
        self.subsets.push(SubsetInfo {
            name: name.into(),
            color: [255, 255, 255],
        });
        SubsetIndex(self.subsets.len() - 1)
    }

    pub fn from_infos(subsets: Vec<SubsetInfo>) -> Self {
        Self {
            subsets,
            default_index: SubsetIndex(0),
        }
    }

    pub fn len(&self) -> usize {
        self.subsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subsets.is_empty()
    }

    pub fn infos(&self) -> &[SubsetInfo] {
        &self.subsets
    }

    pub fn info(&self, index: SubsetIndex) -> Option<&SubsetInfo> {
        self.subsets.get(index.0)
    }

    pub fn names(&self) -> Vec<String> {
        self.subsets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn subset_index(&self, name: &str) -> Option<SubsetIndex> {
        self.subsets
            .iter()
            .position(|s| s.name == name)
            .map(SubsetIndex)
    }

    /// Subset given to elements created without an explicit target.
    pub fn default_index(&self) -> SubsetIndex {
        self.default_index
    }

    pub fn set_default_index(&mut self, index: SubsetIndex) -> Result<(), GridError> {
        self.check(index)?;
        self.default_index = index;
        Ok(())
    }

    /// Move every selected element into `index` in one step.
    pub fn assign_selection(
        &self,
        grid: &mut Grid,
        selector: &Selector,
        index: SubsetIndex,
    ) -> Result<usize, GridError> {
        self.check(index)?;
        let mut moved = 0;
        for v in selector.vertices() {
            if let Some(vertex) = grid.vertices.get_mut(*v) {
                vertex.subset = index;
                moved += 1;
            }
        }
        for e in selector.edges() {
            if let Some(edge) = grid.edges.get_mut(*e) {
                edge.subset = index;
                moved += 1;
            }
        }
        for f in selector.faces() {
            if let Some(face) = grid.faces.get_mut(*f) {
                face.subset = index;
                moved += 1;
            }
        }
        for vol in selector.volumes() {
            if let Some(volume) = grid.volumes.get_mut(*vol) {
                volume.subset = index;
                moved += 1;
            }
        }
        debug!(subset = index.0, moved, "assigned selection to subset");
        Ok(moved)
    }

    pub fn element_counts(&self, grid: &Grid, index: SubsetIndex) -> SubsetCounts {
        SubsetCounts {
            vertices: grid.vertices.values().filter(|v| v.subset == index).count(),
            edges: grid.edges.values().filter(|e| e.subset == index).count(),
            faces: grid.faces.values().filter(|f| f.subset == index).count(),
            volumes: grid.volumes.values().filter(|v| v.subset == index).count(),
        }
    }

    /// Remove subsets without elements and compact the indices stored on
    /// every element. Returns the names of the removed subsets.
    pub fn erase_empty_subsets(&mut self, grid: &mut Grid) -> Vec<String> {
        let mut used = vec![false; self.subsets.len()];
        let mut mark = |s: SubsetIndex| {
            if let Some(flag) = used.get_mut(s.0) {
                *flag = true;
            }
        };
        grid.vertices.values().for_each(|v| mark(v.subset));
        grid.edges.values().for_each(|e| mark(e.subset));
        grid.faces.values().for_each(|f| mark(f.subset));
        grid.volumes.values().for_each(|v| mark(v.subset));

        let mut remap = vec![SubsetIndex(0); self.subsets.len()];
        let mut kept = Vec::new();
        let mut removed = Vec::new();
        for (i, info) in self.subsets.drain(..).enumerate() {
            if used[i] {
                remap[i] = SubsetIndex(kept.len());
                kept.push(info);
            } else {
                removed.push(info.name);
            }
        }
        self.subsets = kept;

        let apply = |s: &mut SubsetIndex| {
            if let Some(new) = remap.get(s.0) {
                *s = *new;
            }
        };
        grid.vertices.values_mut().for_each(|v| apply(&mut v.subset));
        grid.edges.values_mut().for_each(|e| apply(&mut e.subset));
        grid.faces.values_mut().for_each(|f| apply(&mut f.subset));
        grid.volumes.values_mut().for_each(|v| apply(&mut v.subset));

        if self.default_index.0 >= self.subsets.len() {
            self.default_index = SubsetIndex(0);
        } else {
            self.default_index = remap[self.default_index.0];
        }
        removed
    }

    /// Give every subset a distinct, deterministic color.
    pub fn assign_colors(&mut self) {
        for (i, info) in self.subsets.iter_mut().enumerate() {
            info.color = palette_color(i);
        }
    }

    fn check(&self, index: SubsetIndex) -> Result<(), GridError> {
        if index.0 < self.subsets.len() {
            Ok(())
        } else {
            Err(GridError::UnknownSubset {
                index,
                count: self.subsets.len(),
            })
        }
    }
}

/// Hues spaced by the golden angle so neighbouring indices differ strongly.
fn palette_color(i: usize) -> [u8; 3] {
    let hue = (i as f64 * 137.507_764) % 360.0;
    hsv_to_rgb(hue, 0.65, 0.95)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_byte = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_byte(r), to_byte(g), to_byte(b)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point::Point3d;

    #[test]
    fn test_add_and_lookup() {
        let mut sh = SubsetHandler::new();
        let a = sh.add_subset("Inner square");
        let b = sh.add_subset("Outer square");
        assert_eq!(sh.subset_index("Outer square"), Some(b));
        assert_eq!(sh.info(a).map(|i| i.name.as_str()), Some("Inner square"));
        assert_eq!(sh.subset_index("missing"), None);
    }

    #[test]
    fn test_assign_unknown_subset_fails() {
        let sh = SubsetHandler::new();
        let mut grid = Grid::new();
        let err = sh
            .assign_selection(&mut grid, &Selector::new(), SubsetIndex(3))
            .unwrap_err();
        assert_eq!(
            err,
            GridError::UnknownSubset {
                index: SubsetIndex(3),
                count: 0
            }
        );
    }

    #[test]
    fn test_erase_empty_compacts_indices() {
        let mut sh = SubsetHandler::new();
        sh.add_subset("pool");
        sh.add_subset("unused");
        let keep = sh.add_subset("keep");
        let mut grid = Grid::new();
        let v = grid.create_vertex(Point3d::ORIGIN, keep);

        let removed = sh.erase_empty_subsets(&mut grid);
        assert_eq!(removed, vec!["pool".to_string(), "unused".to_string()]);
        assert_eq!(sh.names(), vec!["keep".to_string()]);
        assert_eq!(grid.vertices[v].subset, SubsetIndex(0));
    }

    #[test]
    fn test_colors_are_distinct() {
        let mut sh = SubsetHandler::new();
        for name in ["a", "b", "c", "d", "e", "f", "g"] {
            sh.add_subset(name);
        }
        sh.assign_colors();
        let colors: std::collections::HashSet<[u8; 3]> =
            sh.infos().iter().map(|i| i.color).collect();
        assert_eq!(colors.len(), 7);
    }
}

pub mod error;
pub mod geometry;
pub mod grid;

pub use error::GridError;
pub use geometry::bounds::BoundingBox;
pub use geometry::point::Point3d;
pub use geometry::vector::Vec3;
pub use grid::duplicates::remove_duplicate_vertices;
pub use grid::selector::Selector;
pub use grid::subset::{SubsetCounts, SubsetHandler, SubsetIndex, SubsetInfo};
pub use grid::{edge_key, face_key, EdgeIndex, FaceIndex};
pub use grid::{Edge, EdgeId, Face, FaceId, Grid, Vertex, VertexId, Volume, VolumeId};

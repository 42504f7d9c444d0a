pub mod checkpoint;
pub mod errors;
pub mod load;
pub mod metadata;
pub mod save;

pub use checkpoint::{checkpoint_file_name, checkpoint_path};
pub use errors::{LoadError, SaveError};
pub use load::{load_grid, read_grid, LoadedGrid};
pub use metadata::GridMetadata;
pub use save::{save_grid, write_grid, GridDocument, FORMAT_ID, FORMAT_VERSION};

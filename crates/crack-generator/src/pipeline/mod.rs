//! Staged assembly of the two geometries.

mod bridging;
mod crack;
mod stage;

pub use bridging::BridgingDomainPipeline;
pub use crack::CrackBuilder;
pub use stage::Stage;

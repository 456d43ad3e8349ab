pub mod config;
pub mod edge;
pub mod error;
pub mod id;
pub mod point;
pub mod polygon;
mod ring;
mod solver;

pub use config::EngineConfig;
pub use edge::{Constraint, ConstraintKind, Edge, EdgeId, Grab, Side};
pub use error::EditError;
pub use id::{ConstraintId, IdAllocator};
pub use point::Point2d;
pub use polygon::{Polygon, Removal};
pub use ring::RingIter;

//! Domain layer: vessel segments and the hierarchy built from them
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod hierarchy;
pub mod segment;

pub use arena::{TreeArena, TreeNode};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use hierarchy::{NodeHandle, TreeRow, VesselHierarchy};
pub use segment::{VesselNameSequence, VesselSegment, DEFAULT_VESSEL_PREFIX};

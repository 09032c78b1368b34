//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on collaborator traits (ResourceManager, SegmentationEngine)
//! but are themselves concrete structs, not traits.

mod extraction;
mod vessel_tree;

pub use extraction::{ExtractionService, Selection};
pub use vessel_tree::{DeletionReport, RowAction, VesselTreeService};

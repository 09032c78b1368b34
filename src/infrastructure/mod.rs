//! Infrastructure layer: collaborator implementations and DI container
//!
//! This layer implements the scene and engine traits and wires up services.

pub mod di;
pub mod error;
pub mod files;
pub mod traits;

pub use error::{InfraError, InfraResult};

//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on collaborator traits.

pub mod error;
pub mod services;
pub mod session;

pub use error::{ApplicationError, ApplicationResult};

//! rvessel: branching vessel hierarchies built from extracted vessel segments.
//!
//! Segments are linked by the identity of their endpoints: a segment whose
//! start point is another segment's end point becomes its child.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

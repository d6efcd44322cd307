//! Manifest module - Ordered collections of resources loaded from
//! multi-document sources.
//!
//! This module provides resource identity, the loader, lookup, filtering and
//! transformation.

mod loader;
#[allow(clippy::module_inception)]
mod manifest;
mod predicates;
mod resource;
mod transform;


pub use loader::*;
pub use manifest::*;
pub use predicates::*;
pub use resource::*;
pub use transform::*;

//! Value module - In-memory representation of YAML/JSON documents.
//!
//! Every resource is held as a schema-less [`Value`] tree.

#[allow(clippy::module_inception)]
mod value;

pub use value::*;

//! # Manifest Merge
//!
//! Load declaratively described resources from multi-document manifests and
//! reconcile a desired resource onto the live copy held by a target system.
//!
//! The merge is two-way and desired-wins: every field the desired document
//! names ends up in the live document, and every field it does not name
//! (generated identifiers, status blocks, defaulted fields) is preserved.
//! Lists are replaced as a whole when they differ.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON documents
//! - [`fieldpath`] - Paths to fields inside documents
//! - [`merge`] - The structural merge engine
//! - [`manifest`] - Resource identity, loading, lookup, filtering and transformation
//! - [`apply`] - Apply/delete orchestration against a target-system client
//! - [`source`] - Loading manifests from files and directories
//! - [`error`] - Error types

pub mod apply;
pub mod error;
pub mod fieldpath;
pub mod manifest;
pub mod merge;
pub mod source;
pub mod value;

pub use apply::{apply, delete, ApplyOptions, ApplyReport, Client, MemoryClient, Outcome};
pub use error::{BoxError, DecodeError, Error, IdentityError, Result};
pub use fieldpath::Path;
pub use manifest::{Decoder, Manifest, Predicate, Resource, ResourceId, Transformer};
pub use merge::{merge_into, merge_into_with_changes};
pub use value::{Map, Value};

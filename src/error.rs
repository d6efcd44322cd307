//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::ResourceId;

/// Boxed error returned by pluggable collaborators (decoders, transformers,
/// clients).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// DecodeError reports a document segment that could not be decoded.
///
/// `position` is the 1-based ordinal of the segment in the stream, counting
/// blank segments; `line` is the 1-based line the segment starts on.
#[derive(Debug, Error)]
#[error("failed to decode document {position} (line {line}): {source}")]
pub struct DecodeError {
    pub position: usize,
    pub line: usize,
    #[source]
    pub source: BoxError,
}

/// IdentityError reports a resource that cannot be addressed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("resource is a {found}, expected a map")]
    NotAMap { found: &'static str },

    #[error("resource is missing {field}")]
    MissingField { field: &'static str },
}

/// Error is the crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("{}: {source}", path.display())]
    DecodeFile {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("resource {position}: {source}")]
    Identity {
        position: usize,
        #[source]
        source: IdentityError,
    },

    #[error("failed to transform resource {position}: {source}")]
    Transform {
        position: usize,
        #[source]
        source: BoxError,
    },

    #[error("request for {id} failed: {source}")]
    Client {
        id: ResourceId,
        #[source]
        source: BoxError,
    },

    #[error("live object {id} is a {found}, expected a map")]
    LiveNotMap { id: ResourceId, found: &'static str },

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates an identity error for the resource at a 1-based position.
    pub fn identity(position: usize, source: IdentityError) -> Self {
        Error::Identity { position, source }
    }

    /// Creates a client error for the given resource.
    pub fn client(id: &ResourceId, source: BoxError) -> Self {
        Error::Client {
            id: id.clone(),
            source,
        }
    }
}

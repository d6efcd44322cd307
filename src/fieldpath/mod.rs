//! Field path module - Addresses fields inside nested document maps.
//!
//! The merge engine reports the paths it rewrote in the live document.

mod path;

pub use path::*;

//! Apply module - Drives a target system towards a manifest.
//!
//! The target system is reached through the [`Client`] trait; this module
//! only decides what to create, update, or delete.

mod client;
mod reconcile;

#[cfg(test)]
mod apply_test;

pub use client::*;
pub use reconcile::*;

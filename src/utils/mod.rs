//! Utility modules for the Course4Me client.
//!
//! These helpers are shared by the storage and synchronization layers.
//!
//! # Available Utilities
//!
//! - [`clock`] - Injectable time source for TTL and generation arithmetic
//! - [`datetime`] - Timestamp parsing and human-readable formatting

pub mod clock;
pub mod datetime;

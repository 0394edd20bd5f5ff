//! Test utilities for Manareh crates.
//!
//! Import from `[dev-dependencies]` only.

pub mod auth;

//! Domain types and rules shared across Manareh crates.
//!
//! This crate contains only pure types and functions with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod pagination;
pub mod profile;
pub mod recurrence;

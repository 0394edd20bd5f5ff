//! Auth types shared across Manareh crates.
//!
//! Provides access-token issuing/validation and the `Authorization: Bearer` extractor.

pub mod bearer;
pub mod token;

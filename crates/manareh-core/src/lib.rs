//! Ambient plumbing shared by Manareh binaries: config loading, tracing,
//! request ids and timestamp serde helpers.

pub mod config;
pub mod middleware;
pub mod serde;
pub mod tracing;

//! Shared module - Common types and collaborator ports
//!
//! Program entities, symbolic values and the interfaces of the external
//! analyses the detection engine consumes.

pub mod models;
pub mod ports;

// Re-exports for convenience
pub use models::*;

//! Shared type definitions for the particle execution context bridge.
//!
//! This crate defines the plain, dependency-light types used on both sides
//! of the serialization boundary:
//! - Context identifiers (UUID v7) and opaque thing identifiers
//! - Declarative particle specifications and their connection directions
//!
//! Identity bookkeeping lives in `pec-mapper`; instantiation and wiring in
//! `pec-host`.

mod ids;
mod spec;

pub use ids::{ContextId, ThingId};
pub use spec::{ConnectionSpec, Direction, ParticleSpec, locator_stem};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid particle spec: {0}")]
    InvalidSpec(String),
}

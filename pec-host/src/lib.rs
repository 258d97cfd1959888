//! Particle execution context.
//!
//! Resolves particle specifications to instances through a loader, derives
//! one handle per storage proxy with the capability the spec declares,
//! binds the complete handle table into the particle and only then
//! registers the particle with each proxy.
//!
//! Identity bookkeeping for anything that crosses the boundary is provided
//! by the context's [`ThingMapper`](pec_mapper::ThingMapper).

mod config;
mod context;
mod error;
mod handle;
mod loader;
mod particle;
mod proxy;
mod wiring;

pub use config::{ContextConfig, LoaderPolicy, PolicyMode};
pub use context::ParticleExecutionContext;
pub use error::PecError;
pub use handle::{Capability, DefaultHandleFactory, Handle, HandleFactory};
pub use loader::{NativeParticleFactory, NativeParticleLoader, ParticleFactory, ParticleLoader};
pub use particle::{Particle, ParticleCore};
pub use proxy::{LocalStorageProxy, StorageProxy};
pub use wiring::{HandleSet, HandlesBound, SpecAttached, UnwiredParticle};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, PecError>;

//! Identity bridging for objects referenced across a serialization boundary.
//!
//! A [`ThingMapper`] is one isolated id-space: it translates between locally
//! held objects ([`Thing`]s, compared by reference) and opaque
//! [`ThingId`](pec_types::ThingId) strings that can be embedded in messages.
//!
//! The two directions are stored in a single [`Bijection`] so they cannot
//! drift apart. Mappings are insert-only and live as long as the mapper.

mod bijection;
mod error;
mod mapper;
mod thing;

pub use bijection::{Bijection, Collision};
pub use error::MapperError;
pub use mapper::ThingMapper;
pub use thing::Thing;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, MapperError>;

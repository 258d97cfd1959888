//! Error types for identity mapping.

use pec_types::ThingId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapperError {
    #[error("duplicate mapping: {thing} is already mapped to '{existing}'")]
    DuplicateMapping { thing: String, existing: ThingId },

    #[error("identifier in use: '{0}' is already mapped")]
    IdentifierInUse(ThingId),

    #[error("unknown identifier: '{0}'")]
    UnknownIdentifier(ThingId),

    #[error("unknown thing: {0} has no mapping")]
    UnknownThing(String),
}

//! Error types for the execution context.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PecError {
    #[error("particle resolution failed: no implementation for '{locator}'")]
    ParticleResolution { locator: String },

    #[error("particle factory already registered: {0}")]
    FactoryAlreadyRegistered(String),

    #[error("handle derivation failed for connection '{connection}': {reason}")]
    HandleDerivation { connection: String, reason: String },

    #[error("particle '{particle}' rejected its handles: {reason}")]
    HandleBindingRejected { particle: String, reason: String },

    #[error("capability denied: handle '{handle}' is not {capability}")]
    CapabilityDenied {
        handle: String,
        capability: &'static str,
    },

    #[error("policy denied: {0}")]
    PolicyDenied(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Mapper(#[from] pec_mapper::MapperError),

    #[error(transparent)]
    Types(#[from] pec_types::Error),
}

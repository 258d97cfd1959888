//! Execution context configuration. Reads `~/.pec/context.toml` and
//! carries the id prefix, handle derivation mode and loader policy.

use crate::error::PecError;
use pec_types::locator_stem;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Loader policy mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    #[default]
    /// Any locator may be resolved.
    Unrestricted,
    /// Only listed particles may be resolved.
    Allowlist,
    /// Every particle except the listed ones may be resolved.
    Denylist,
}

/// Which particle implementations the context is willing to load.
///
/// Entries match either the full locator or its file name
/// (`"Echo"` matches `"https://host/particles/Echo.js"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderPolicy {
    #[serde(default)]
    pub mode: PolicyMode,
    #[serde(default)]
    pub particles: Vec<String>,
}

impl LoaderPolicy {
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn allowlist<I, S>(particles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: PolicyMode::Allowlist,
            particles: particles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn denylist<I, S>(particles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: PolicyMode::Denylist,
            particles: particles.into_iter().map(Into::into).collect(),
        }
    }

    fn is_listed(&self, locator: &str) -> bool {
        let stem = locator_stem(locator);
        self.particles.iter().any(|p| p == locator || p == stem)
    }

    /// Check if a locator may be handed to the loader.
    pub fn is_particle_allowed(&self, locator: &str) -> bool {
        match self.mode {
            PolicyMode::Unrestricted => true,
            PolicyMode::Allowlist => self.is_listed(locator),
            PolicyMode::Denylist => !self.is_listed(locator),
        }
    }
}

/// Settings for one `ParticleExecutionContext`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Prefix for synthesized identifiers. Defaults to `"<context-id>:"`.
    pub id_prefix: Option<String>,
    /// Derive handles for different connections on scoped threads. A
    /// panicking handle factory is reported as `HandleDerivation` in either
    /// mode.
    pub parallel_handle_derivation: bool,
    pub policy: LoaderPolicy,
}

impl ContextConfig {
    /// Loads config from `~/.pec/context.toml` if it exists.
    pub fn load() -> Self {
        Self::load_from(config_dir().join("context.toml"))
    }

    /// Loads config from an explicit path.
    /// Falls back to defaults with a warning when the file is unreadable or
    /// malformed.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No context config found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded context config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!(
                        "Failed to parse context config {:?}: {}. Falling back to defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read context config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Strict parse; unknown policy modes and type errors are reported.
    pub fn from_toml_str(contents: &str) -> Result<Self, PecError> {
        Ok(toml::from_str(contents)?)
    }
}

/// Resolve the config directory.
fn config_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        Path::new(&home).join(".pec")
    } else if let Ok(home) = std::env::var("USERPROFILE") {
        Path::new(&home).join(".pec")
    } else {
        PathBuf::from(".pec")
    }
}

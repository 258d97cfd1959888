//! Identifier types shared across the bridge.
//!
//! `ContextId` names one execution context (UUID v7, time-ordered).
//! `ThingId` is the opaque string that stands in for an object in
//! serialized messages.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use uuid::Uuid;

/// Names one particle execution context. UUID v7, so ids sort by
/// creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// The default identifier prefix for things mapped inside this context.
    pub fn id_prefix(&self) -> String {
        format!("{}:", self.0)
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for an object referenced across the boundary.
///
/// The bridge only guarantees uniqueness within one mapper namespace; the
/// content is otherwise meaningless to both sides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThingId(String);

impl ThingId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the synthesized form `<prefix><sequence>`.
    #[must_use]
    pub fn synthesized(prefix: &str, sequence: u64) -> Self {
        Self(format!("{prefix}{sequence}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThingId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ThingId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for ThingId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ThingId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ThingId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

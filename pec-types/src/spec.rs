//! Declarative particle specifications.
//!
//! A `ParticleSpec` names the particle, says where its implementation lives,
//! and declares every connection point with its direction. Specs are
//! immutable once built and travel across the boundary as JSON.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Data flow direction of one connection point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
    #[serde(alias = "in-out")]
    InOut,
}

impl Direction {
    pub fn is_input(&self) -> bool {
        matches!(self, Self::In | Self::InOut)
    }

    pub fn is_output(&self) -> bool {
        matches!(self, Self::Out | Self::InOut)
    }
}

/// A named connection point declared by a particle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    pub name: String,
    pub direction: Direction,
}

impl ConnectionSpec {
    pub fn new(name: impl Into<String>, direction: Direction) -> Self {
        Self {
            name: name.into(),
            direction,
        }
    }
}

/// Declarative description of a particle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticleSpec {
    pub name: String,
    /// Implementation locator (a path or URL to the particle code).
    #[serde(rename = "implFile")]
    pub impl_file: String,
    #[serde(default, rename = "args")]
    pub connections: Vec<ConnectionSpec>,
}

impl ParticleSpec {
    pub fn new(name: impl Into<String>, impl_file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            impl_file: impl_file.into(),
            connections: Vec::new(),
        }
    }

    /// Builder-style connection declaration.
    #[must_use]
    pub fn with_connection(mut self, name: impl Into<String>, direction: Direction) -> Self {
        self.connections.push(ConnectionSpec::new(name, direction));
        self
    }

    /// Parses a spec from its serialized form and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rejects specs with an empty locator or duplicate connection names.
    pub fn validate(&self) -> Result<()> {
        if self.impl_file.trim().is_empty() {
            return Err(Error::InvalidSpec(format!(
                "particle '{}' has no implementation locator",
                self.name
            )));
        }
        let mut seen = HashSet::new();
        for connection in &self.connections {
            if !seen.insert(connection.name.as_str()) {
                return Err(Error::InvalidSpec(format!(
                    "particle '{}' declares connection '{}' twice",
                    self.name, connection.name
                )));
            }
        }
        Ok(())
    }

    /// The implementation locator handed to particle loaders.
    pub fn locator(&self) -> &str {
        &self.impl_file
    }

    /// The last path segment of the locator with any extension removed.
    ///
    /// `"https://host/particles/Echo.js"` becomes `"Echo"`.
    pub fn file_name(&self) -> &str {
        locator_stem(&self.impl_file)
    }

    pub fn connection(&self, name: &str) -> Option<&ConnectionSpec> {
        self.connections.iter().find(|c| c.name == name)
    }

    /// Whether `name` is declared as an input. Undeclared names are not.
    pub fn is_input(&self, name: &str) -> bool {
        self.connection(name)
            .map(|c| c.direction.is_input())
            .unwrap_or(false)
    }

    /// Whether `name` is declared as an output. Undeclared names are not.
    pub fn is_output(&self, name: &str) -> bool {
        self.connection(name)
            .map(|c| c.direction.is_output())
            .unwrap_or(false)
    }

    pub fn connection_names(&self) -> impl Iterator<Item = &str> {
        self.connections.iter().map(|c| c.name.as_str())
    }
}

/// Strips directories, query strings and the extension from a locator.
pub fn locator_stem(locator: &str) -> &str {
    let without_query = locator.split(['?', '#']).next().unwrap_or(locator);
    let last = without_query
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(without_query);
    match last.rfind('.') {
        Some(0) | None => last,
        Some(dot) => &last[..dot],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_stem_strips_path_and_extension() {
        assert_eq!(locator_stem("https://host/particles/Echo.js"), "Echo");
        assert_eq!(locator_stem("particles\\native\\Echo.wasm"), "Echo");
        assert_eq!(locator_stem("Echo"), "Echo");
        assert_eq!(locator_stem("a/b/Echo.min.js?v=2"), "Echo.min");
        assert_eq!(locator_stem(".hidden"), ".hidden");
    }

    #[test]
    fn direction_roles() {
        assert!(Direction::In.is_input());
        assert!(!Direction::In.is_output());
        assert!(Direction::Out.is_output());
        assert!(!Direction::Out.is_input());
        assert!(Direction::InOut.is_input());
        assert!(Direction::InOut.is_output());
    }
}

//! The particle contract and a reusable core for implementers.

use crate::handle::Handle;
use pec_types::ParticleSpec;
use std::collections::HashMap;
use std::sync::Arc;

/// A computational unit wired to storage proxies through handles.
///
/// The execution context drives a particle through exactly one
/// `attach_spec` followed by exactly one `bind_handles`. Notifications only
/// arrive after both, so implementations may assume a complete handle table
/// inside `on_handle_sync` and `on_handle_update`.
pub trait Particle: Send + Sync {
    /// Called once, before any handles exist.
    fn attach_spec(&mut self, spec: Arc<ParticleSpec>);

    fn spec(&self) -> Option<&ParticleSpec>;

    /// Receives the complete name → handle table in one call.
    /// Return `Err(reason)` to refuse it (for example, a missing connection).
    fn bind_handles(&mut self, handles: HashMap<String, Arc<Handle>>) -> Result<(), String>;

    /// A proxy delivered its full model.
    fn on_handle_sync(&self, handle: &Handle, model: &serde_json::Value) {
        let _ = (handle, model);
    }

    /// A proxy delivered an incremental update.
    fn on_handle_update(&self, handle: &Handle, update: &serde_json::Value) {
        let _ = (handle, update);
    }

    /// Human-readable name for logs and errors.
    fn name(&self) -> &str {
        self.spec().map(|s| s.name.as_str()).unwrap_or("<unwired>")
    }
}

/// Spec and handle storage most particles need.
///
/// `bind_handles` here checks that every connection the spec declares has a
/// handle, which is the completeness check the context relies on.
#[derive(Debug, Default)]
pub struct ParticleCore {
    spec: Option<Arc<ParticleSpec>>,
    handles: HashMap<String, Arc<Handle>>,
}

impl ParticleCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach_spec(&mut self, spec: Arc<ParticleSpec>) {
        self.spec = Some(spec);
    }

    pub fn spec(&self) -> Option<&ParticleSpec> {
        self.spec.as_deref()
    }

    pub fn bind_handles(&mut self, handles: HashMap<String, Arc<Handle>>) -> Result<(), String> {
        let spec = self
            .spec
            .as_ref()
            .ok_or_else(|| "handles bound before a spec was attached".to_string())?;
        let missing: Vec<&str> = spec
            .connection_names()
            .filter(|name| !handles.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing handles for {}", missing.join(", ")));
        }
        self.handles = handles;
        Ok(())
    }

    pub fn handle(&self, name: &str) -> Option<&Arc<Handle>> {
        self.handles.get(name)
    }

    pub fn handles(&self) -> &HashMap<String, Arc<Handle>> {
        &self.handles
    }
}

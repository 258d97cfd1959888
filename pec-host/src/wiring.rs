//! Typestate pipeline for wiring one particle.
//!
//! `UnwiredParticle` → `SpecAttached` → `HandlesBound` → registered.
//! Registration is only reachable from `HandlesBound`, and the registration
//! list travels inside it, so no proxy can see the particle before its full
//! handle table is bound.

use crate::error::PecError;
use crate::handle::Handle;
use crate::particle::Particle;
use crate::proxy::StorageProxy;
use pec_types::ParticleSpec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Handles derived for one instantiation, kept in two views: by connection
/// name for the particle, and paired with their proxy for registration.
#[derive(Default)]
pub struct HandleSet {
    by_name: HashMap<String, Arc<Handle>>,
    registrations: Vec<(Arc<Handle>, Arc<dyn StorageProxy>)>,
}

impl HandleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the handle derived for connection `name`. The table is keyed by
    /// the connection name, whatever name the handle factory chose; a
    /// mismatched handle is re-stamped. A second handle for the same
    /// connection replaces the first in both views.
    pub fn insert(&mut self, name: impl Into<String>, handle: Handle, proxy: Arc<dyn StorageProxy>) {
        let name = name.into();
        let handle = if handle.name() == name {
            handle
        } else {
            debug!(connection = %name, handle = %handle.name(), "re-stamping handle with connection name");
            handle.renamed(name.clone())
        };
        let handle = Arc::new(handle);
        if self.by_name.insert(name.clone(), Arc::clone(&handle)).is_some() {
            self.registrations.retain(|(h, _)| h.name() != name);
        }
        self.registrations.push((handle, proxy));
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

/// A freshly created particle with nothing attached.
pub struct UnwiredParticle {
    particle: Box<dyn Particle>,
}

impl UnwiredParticle {
    pub fn new(particle: Box<dyn Particle>) -> Self {
        Self { particle }
    }

    pub fn attach_spec(mut self, spec: Arc<ParticleSpec>) -> SpecAttached {
        self.particle.attach_spec(Arc::clone(&spec));
        SpecAttached {
            particle: self.particle,
            spec,
        }
    }
}

/// A particle that knows its spec but has no handles yet.
pub struct SpecAttached {
    particle: Box<dyn Particle>,
    spec: Arc<ParticleSpec>,
}

impl SpecAttached {
    pub fn spec(&self) -> &ParticleSpec {
        &self.spec
    }

    /// Hands the whole table to the particle at once.
    pub fn bind_handles(mut self, handles: HandleSet) -> Result<HandlesBound, PecError> {
        let HandleSet {
            by_name,
            registrations,
        } = handles;
        self.particle
            .bind_handles(by_name)
            .map_err(|reason| PecError::HandleBindingRejected {
                particle: self.spec.name.clone(),
                reason,
            })?;
        Ok(HandlesBound {
            particle: Arc::from(self.particle),
            registrations,
        })
    }
}

/// A particle with its complete handle table, not yet visible to proxies.
pub struct HandlesBound {
    particle: Arc<dyn Particle>,
    registrations: Vec<(Arc<Handle>, Arc<dyn StorageProxy>)>,
}

impl HandlesBound {
    pub fn particle(&self) -> &Arc<dyn Particle> {
        &self.particle
    }

    /// Registers the particle with every proxy through its handle.
    pub fn register(self) -> Arc<dyn Particle> {
        for (handle, proxy) in self.registrations {
            debug!(
                particle = %self.particle.name(),
                handle = %handle.name(),
                proxy = %proxy.id(),
                "registering"
            );
            proxy.register(Arc::clone(&self.particle), handle);
        }
        self.particle
    }
}

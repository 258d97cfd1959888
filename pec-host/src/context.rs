//! Particle instantiation and wiring.
//!
//! Owns the loader, the handle factory and the context's identity
//! namespace, and keeps every particle it has wired.

use crate::config::ContextConfig;
use crate::error::PecError;
use crate::handle::{Handle, HandleFactory};
use crate::loader::ParticleLoader;
use crate::particle::Particle;
use crate::proxy::StorageProxy;
use crate::wiring::{HandleSet, UnwiredParticle};
use parking_lot::RwLock;
use pec_mapper::ThingMapper;
use pec_types::{ContextId, ParticleSpec};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

type Derived = Result<(String, Handle, Arc<dyn StorageProxy>), PecError>;

pub struct ParticleExecutionContext {
    id: ContextId,
    loader: Arc<dyn ParticleLoader>,
    handle_factory: Arc<dyn HandleFactory>,
    config: ContextConfig,
    mapper: ThingMapper,
    particles: RwLock<Vec<Arc<dyn Particle>>>,
}

impl ParticleExecutionContext {
    pub fn new(loader: Arc<dyn ParticleLoader>, handle_factory: Arc<dyn HandleFactory>) -> Self {
        Self::with_config(loader, handle_factory, ContextConfig::default())
    }

    pub fn with_config(
        loader: Arc<dyn ParticleLoader>,
        handle_factory: Arc<dyn HandleFactory>,
        config: ContextConfig,
    ) -> Self {
        let id = ContextId::new();
        let prefix = config
            .id_prefix
            .clone()
            .unwrap_or_else(|| id.id_prefix());
        Self {
            id,
            loader,
            handle_factory,
            config,
            mapper: ThingMapper::new(prefix),
            particles: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Identity namespace for things this context exposes across the
    /// boundary.
    pub fn mapper(&self) -> &ThingMapper {
        &self.mapper
    }

    /// Particles wired by this context, in instantiation order.
    pub fn particles(&self) -> Vec<Arc<dyn Particle>> {
        self.particles.read().clone()
    }

    // ================================================================
    // Instantiation
    // ================================================================

    /// Creates the particle described by `spec` and wires it to `proxies`.
    ///
    /// Any failure before registration leaves every proxy untouched and the
    /// context's particle list unchanged.
    pub fn instantiate_particle(
        &self,
        spec: ParticleSpec,
        proxies: &HashMap<String, Arc<dyn StorageProxy>>,
    ) -> Result<Arc<dyn Particle>, PecError> {
        spec.validate()?;
        let locator = spec.locator().to_string();

        if !self.config.policy.is_particle_allowed(&locator) {
            return Err(PecError::PolicyDenied(format!(
                "particle '{}' blocked by policy",
                locator
            )));
        }

        let factory = self
            .loader
            .resolve(&locator)
            .ok_or_else(|| PecError::ParticleResolution {
                locator: locator.clone(),
            })?;

        let spec = Arc::new(spec);
        let attached = UnwiredParticle::new(factory.create()).attach_spec(Arc::clone(&spec));

        let handles = self.derive_handles(&spec, proxies)?;
        let handle_count = handles.len();

        let particle = attached.bind_handles(handles)?.register();

        info!(
            context = %self.id,
            particle = %spec.name,
            locator = %locator,
            handles = handle_count,
            "Particle instantiated"
        );
        self.particles.write().push(Arc::clone(&particle));
        Ok(particle)
    }

    /// Derives one handle per proxy, in name order. The first failure
    /// discards every handle derived so far.
    fn derive_handles(
        &self,
        spec: &ParticleSpec,
        proxies: &HashMap<String, Arc<dyn StorageProxy>>,
    ) -> Result<HandleSet, PecError> {
        let mut entries: Vec<(&str, &Arc<dyn StorageProxy>)> =
            proxies.iter().map(|(name, proxy)| (name.as_str(), proxy)).collect();
        entries.sort_unstable_by_key(|(name, _)| *name);

        for (name, _) in &entries {
            if spec.connection(name).is_none() {
                warn!(particle = %spec.name, connection = %name, "proxy supplied for undeclared connection");
            }
        }

        let derived: Vec<Derived> = if self.config.parallel_handle_derivation && entries.len() > 1 {
            self.derive_parallel(spec, &entries)
        } else {
            entries
                .iter()
                .map(|(name, proxy)| {
                    panic::catch_unwind(AssertUnwindSafe(|| self.derive_one(spec, name, proxy)))
                        .unwrap_or_else(|_| Err(derivation_panicked(name)))
                })
                .collect()
        };

        let mut handles = HandleSet::new();
        for result in derived {
            let (name, handle, proxy) = result?;
            handles.insert(name, handle, proxy);
        }
        Ok(handles)
    }

    fn derive_parallel(
        &self,
        spec: &ParticleSpec,
        entries: &[(&str, &Arc<dyn StorageProxy>)],
    ) -> Vec<Derived> {
        std::thread::scope(|s| {
            let workers: Vec<_> = entries
                .iter()
                .map(|(name, proxy)| {
                    let name = *name;
                    let proxy = *proxy;
                    (name, s.spawn(move || self.derive_one(spec, name, proxy)))
                })
                .collect();

            workers
                .into_iter()
                .map(|(name, worker)| {
                    worker
                        .join()
                        .unwrap_or_else(|_| Err(derivation_panicked(name)))
                })
                .collect()
        })
    }

    fn derive_one(&self, spec: &ParticleSpec, name: &str, proxy: &Arc<dyn StorageProxy>) -> Derived {
        let is_input = spec.is_input(name);
        let is_output = spec.is_output(name);
        let handle = self
            .handle_factory
            .derive(Arc::clone(proxy), name, is_input, is_output)
            .map_err(|e| match e {
                e @ PecError::HandleDerivation { .. } => e,
                other => PecError::HandleDerivation {
                    connection: name.to_string(),
                    reason: other.to_string(),
                },
            })?;
        debug!(connection = %name, proxy = %proxy.id(), is_input, is_output, "handle derived");
        Ok((name.to_string(), handle, Arc::clone(proxy)))
    }
}

fn derivation_panicked(connection: &str) -> PecError {
    PecError::HandleDerivation {
        connection: connection.to_string(),
        reason: "handle factory panicked".to_string(),
    }
}

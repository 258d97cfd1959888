//! Particle code lookup.
//!
//! A [`ParticleLoader`] turns an implementation locator into a factory. The
//! bundled [`NativeParticleLoader`] is a registry of factories compiled into
//! the host, looked up by the locator's file name.

use crate::error::PecError;
use crate::particle::Particle;
use pec_types::locator_stem;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds fresh, unwired particles of one kind.
pub trait ParticleFactory: Send + Sync {
    fn particle_name(&self) -> &str;

    fn create(&self) -> Box<dyn Particle>;
}

/// Resolves implementation locators to factories.
///
/// Resolution must be repeatable: resolving the same locator twice yields an
/// equivalent factory. The context does not cache results.
pub trait ParticleLoader: Send + Sync {
    fn resolve(&self, locator: &str) -> Option<Arc<dyn ParticleFactory>>;
}

/// Factory backed by a constructor closure.
pub struct NativeParticleFactory<F> {
    name: String,
    constructor: F,
}

impl<F> NativeParticleFactory<F>
where
    F: Fn() -> Box<dyn Particle> + Send + Sync,
{
    pub fn new(name: impl Into<String>, constructor: F) -> Self {
        Self {
            name: name.into(),
            constructor,
        }
    }
}

impl<F> ParticleFactory for NativeParticleFactory<F>
where
    F: Fn() -> Box<dyn Particle> + Send + Sync,
{
    fn particle_name(&self) -> &str {
        &self.name
    }

    fn create(&self) -> Box<dyn Particle> {
        (self.constructor)()
    }
}

/// Registry of factories compiled into the host.
#[derive(Default)]
pub struct NativeParticleLoader {
    factories: HashMap<String, Arc<dyn ParticleFactory>>,
}

impl NativeParticleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory under its own `particle_name()`.
    pub fn register(&mut self, factory: Arc<dyn ParticleFactory>) -> Result<(), PecError> {
        let name = factory.particle_name().to_string();
        if self.factories.contains_key(&name) {
            return Err(PecError::FactoryAlreadyRegistered(name));
        }
        info!(particle = %name, "Native particle factory registered");
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Convenience for closure-backed factories.
    pub fn register_fn<F>(&mut self, name: impl Into<String>, constructor: F) -> Result<(), PecError>
    where
        F: Fn() -> Box<dyn Particle> + Send + Sync + 'static,
    {
        self.register(Arc::new(NativeParticleFactory::new(name, constructor)))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ParticleLoader for NativeParticleLoader {
    fn resolve(&self, locator: &str) -> Option<Arc<dyn ParticleFactory>> {
        let name = locator_stem(locator);
        let found = self.factories.get(name).cloned();
        debug!(locator = %locator, particle = %name, found = found.is_some(), "resolve");
        found
    }
}

impl fmt::Debug for NativeParticleLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeParticleLoader")
            .field("factories", &self.names())
            .finish()
    }
}

//! Storage proxy contract and an in-process implementation.
//!
//! Real proxies replicate data from the other side of the boundary. The
//! context only needs `register`; handles additionally read and write
//! through the proxy.

use crate::error::PecError;
use crate::handle::Handle;
use crate::particle::Particle;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// External data endpoint that particles observe through handles.
///
/// `register` must not call back into the particle before it returns.
/// Later notifications go through `Particle::on_handle_sync` and
/// `Particle::on_handle_update`. One proxy may hold many registrations.
pub trait StorageProxy: Send + Sync {
    fn id(&self) -> &str;

    fn register(&self, particle: Arc<dyn Particle>, handle: Arc<Handle>);

    fn read(&self) -> Result<serde_json::Value, PecError>;

    fn write(&self, value: serde_json::Value) -> Result<(), PecError>;
}

type Observer = (Arc<dyn Particle>, Arc<Handle>);

/// Single-value proxy kept in process memory.
///
/// Registration only records the observer. `synchronize` delivers the
/// current model to every observer and `write` delivers the new value as an
/// update. Observers are notified outside the lock, so a particle may read
/// or write from inside a callback.
pub struct LocalStorageProxy {
    id: String,
    value: RwLock<serde_json::Value>,
    observers: RwLock<Vec<Observer>>,
}

impl LocalStorageProxy {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_value(id, serde_json::Value::Null)
    }

    pub fn with_value(id: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            value: RwLock::new(value),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Delivers the current model to every registered observer.
    pub fn synchronize(&self) {
        let model = self.value.read().clone();
        for (particle, handle) in self.snapshot() {
            particle.on_handle_sync(&handle, &model);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Handles registered on behalf of `particle`.
    pub fn registrations_for(&self, particle: &Arc<dyn Particle>) -> Vec<Arc<Handle>> {
        self.observers
            .read()
            .iter()
            .filter(|(p, _)| std::ptr::addr_eq(Arc::as_ptr(p), Arc::as_ptr(particle)))
            .map(|(_, h)| Arc::clone(h))
            .collect()
    }

    fn snapshot(&self) -> Vec<Observer> {
        self.observers.read().clone()
    }
}

impl StorageProxy for LocalStorageProxy {
    fn id(&self) -> &str {
        &self.id
    }

    fn register(&self, particle: Arc<dyn Particle>, handle: Arc<Handle>) {
        debug!(proxy = %self.id, handle = %handle.name(), particle = %particle.name(), "observer registered");
        self.observers.write().push((particle, handle));
    }

    fn read(&self) -> Result<serde_json::Value, PecError> {
        Ok(self.value.read().clone())
    }

    fn write(&self, value: serde_json::Value) -> Result<(), PecError> {
        *self.value.write() = value.clone();
        for (particle, handle) in self.snapshot() {
            particle.on_handle_update(&handle, &value);
        }
        Ok(())
    }
}

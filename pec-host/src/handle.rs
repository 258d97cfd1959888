//! Handles: one particle's capability-scoped view of one storage proxy.

use crate::error::PecError;
use crate::proxy::StorageProxy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// What a handle may do with its proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Read,
    Write,
}

impl Capability {
    /// Adjective used in capability errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Read => "readable",
            Self::Write => "writable",
        }
    }
}

/// Binding of a particle connection to a storage proxy.
///
/// Reads require the connection to be an input, writes require it to be an
/// output.
pub struct Handle {
    name: String,
    proxy: Arc<dyn StorageProxy>,
    can_read: bool,
    can_write: bool,
}

impl Handle {
    pub fn new(
        name: impl Into<String>,
        proxy: Arc<dyn StorageProxy>,
        can_read: bool,
        can_write: bool,
    ) -> Self {
        Self {
            name: name.into(),
            proxy,
            can_read,
            can_write,
        }
    }

    /// The same handle under another connection name.
    pub(crate) fn renamed(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Connection name this handle was derived for.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn proxy(&self) -> &Arc<dyn StorageProxy> {
        &self.proxy
    }

    pub fn can_read(&self) -> bool {
        self.can_read
    }

    pub fn can_write(&self) -> bool {
        self.can_write
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Read => self.can_read,
            Capability::Write => self.can_write,
        }
    }

    fn require(&self, capability: Capability) -> Result<(), PecError> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(PecError::CapabilityDenied {
                handle: self.name.clone(),
                capability: capability.describe(),
            })
        }
    }

    pub fn read(&self) -> Result<serde_json::Value, PecError> {
        self.require(Capability::Read)?;
        self.proxy.read()
    }

    pub fn write(&self, value: serde_json::Value) -> Result<(), PecError> {
        self.require(Capability::Write)?;
        self.proxy.write(value)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("name", &self.name)
            .field("proxy", &self.proxy.id())
            .field("can_read", &self.can_read)
            .field("can_write", &self.can_write)
            .finish()
    }
}

/// Produces handles for the execution context.
///
/// Implementations must not touch context or mapper state; the context may
/// call `derive` for different connections concurrently.
pub trait HandleFactory: Send + Sync {
    fn derive(
        &self,
        proxy: Arc<dyn StorageProxy>,
        name: &str,
        is_input: bool,
        is_output: bool,
    ) -> Result<Handle, PecError>;
}

/// Builds a plain [`Handle`] whose capabilities mirror the declared roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandleFactory;

impl HandleFactory for DefaultHandleFactory {
    fn derive(
        &self,
        proxy: Arc<dyn StorageProxy>,
        name: &str,
        is_input: bool,
        is_output: bool,
    ) -> Result<Handle, PecError> {
        Ok(Handle::new(name, proxy, is_input, is_output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::LocalStorageProxy;
    use serde_json::json;

    fn proxy() -> Arc<dyn StorageProxy> {
        Arc::new(LocalStorageProxy::with_value("p", json!({"n": 1})))
    }

    #[test]
    fn input_handle_reads_but_cannot_write() {
        let handle = DefaultHandleFactory.derive(proxy(), "in", true, false).unwrap();
        assert_eq!(handle.read().unwrap(), json!({"n": 1}));
        let err = handle.write(json!(2)).unwrap_err();
        assert!(matches!(
            err,
            PecError::CapabilityDenied { ref handle, capability: "writable" } if handle == "in"
        ));
    }

    #[test]
    fn output_handle_writes_but_cannot_read() {
        let p = proxy();
        let handle = DefaultHandleFactory
            .derive(Arc::clone(&p), "out", false, true)
            .unwrap();
        handle.write(json!("fresh")).unwrap();
        assert_eq!(p.read().unwrap(), json!("fresh"));
        assert!(matches!(
            handle.read(),
            Err(PecError::CapabilityDenied { capability: "readable", .. })
        ));
    }

    #[test]
    fn undeclared_handle_has_no_capability() {
        let handle = DefaultHandleFactory.derive(proxy(), "stray", false, false).unwrap();
        assert!(!handle.has(Capability::Read));
        assert!(!handle.has(Capability::Write));
    }

    #[test]
    fn debug_shows_proxy_id() {
        let handle = Handle::new("h", proxy(), true, true);
        let debug = format!("{handle:?}");
        assert!(debug.contains("\"p\""));
        assert!(debug.contains("\"h\""));
    }
}

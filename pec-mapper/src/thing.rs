//! Reference-identity wrapper for any shareable object.

use std::any::{Any, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An object that may need a cross-boundary identity.
///
/// Two `Thing`s are equal only if they wrap the same allocation. Structural
/// equality of the wrapped values is never consulted. A `Thing` keeps its
/// object alive, so the allocation address cannot be reused while a mapping
/// refers to it.
#[derive(Clone)]
pub struct Thing {
    addr: usize,
    type_name: &'static str,
    object: Arc<dyn Any + Send + Sync>,
}

impl Thing {
    /// Wraps a shared object. Works for trait objects such as
    /// `Arc<dyn Particle>` as well as concrete types.
    pub fn new<T>(object: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let addr = Arc::as_ptr(&object) as *const () as usize;
        Self {
            addr,
            type_name: type_name::<T>(),
            object: Arc::new(object),
        }
    }

    /// Recovers the original `Arc<T>` if this thing was created from one.
    pub fn downcast<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.object.downcast_ref::<Arc<T>>().cloned()
    }

    /// Whether this thing wraps exactly `object`'s allocation.
    pub fn is<T>(&self, object: &Arc<T>) -> bool
    where
        T: ?Sized,
    {
        self.addr == Arc::as_ptr(object) as *const () as usize
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for Thing {
    fn eq(&self, other: &Self) -> bool {
        self.addr == other.addr
    }
}

impl Eq for Thing {}

impl Hash for Thing {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr.hash(state);
    }
}

impl fmt::Debug for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thing<{}>@{:#x}", self.type_name, self.addr)
    }
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> &str;
    }

    struct Fixed(&'static str);

    impl Named for Fixed {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn identity_is_by_allocation() {
        let a = Arc::new(String::from("same"));
        let b = Arc::new(String::from("same"));

        assert_eq!(Thing::new(a.clone()), Thing::new(a.clone()));
        assert_ne!(Thing::new(a), Thing::new(b));
    }

    #[test]
    fn trait_object_roundtrip() {
        let named: Arc<dyn Named> = Arc::new(Fixed("echo"));
        let thing = Thing::new(named.clone());

        let back = thing.downcast::<dyn Named>().unwrap();
        assert_eq!(back.name(), "echo");
        assert!(Arc::ptr_eq(&back, &named));
        assert!(thing.is(&named));
        assert!(thing.downcast::<String>().is_none());
    }

    #[test]
    fn concrete_and_erased_views_share_identity() {
        let concrete = Arc::new(Fixed("x"));
        let erased: Arc<dyn Named> = concrete.clone();
        assert_eq!(Thing::new(concrete), Thing::new(erased));
    }

    #[test]
    fn debug_names_the_type() {
        let thing = Thing::new(Arc::new(5u32));
        assert!(format!("{thing:?}").contains("u32"));
    }
}

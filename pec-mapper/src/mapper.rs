//! One identifier namespace.
//!
//! Every operation takes the namespace lock exactly once, so a create or
//! ensure is a single critical section against the table and the sequence
//! counter. Lookups share a read lock.

use crate::bijection::{Bijection, Collision};
use crate::error::MapperError;
use crate::thing::Thing;
use crate::Result;
use parking_lot::RwLock;
use pec_types::ThingId;
use tracing::debug;

#[derive(Debug, Default)]
struct Namespace {
    table: Bijection<ThingId, Thing>,
    next_sequence: u64,
}

impl Namespace {
    /// Issues `<prefix><n>` and advances the counter, whether or not the
    /// caller ends up using the identifier.
    fn synthesize(&mut self, prefix: &str) -> ThingId {
        let id = ThingId::synthesized(prefix, self.next_sequence);
        self.next_sequence += 1;
        id
    }

    fn create(&mut self, prefix: &str, thing: Thing, requested: Option<ThingId>) -> Result<ThingId> {
        if let Some(existing) = self.table.get_by_right(&thing) {
            return Err(MapperError::DuplicateMapping {
                thing: thing.to_string(),
                existing: existing.clone(),
            });
        }
        let id = match requested {
            Some(id) => id,
            None => self.synthesize(prefix),
        };
        // The thing side was checked above under the same lock, so only the
        // identifier can collide here.
        match self.table.try_insert(id.clone(), thing) {
            Ok(()) => Ok(id),
            Err(Collision::Left | Collision::Right) => Err(MapperError::IdentifierInUse(id)),
        }
    }
}

/// Bidirectional id ↔ thing table for one boundary.
///
/// Independent mappers never share state; two mappers constructed with the
/// same prefix will issue the same identifiers for their own things.
#[derive(Debug)]
pub struct ThingMapper {
    prefix: String,
    namespace: RwLock<Namespace>,
}

impl ThingMapper {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            namespace: RwLock::new(Namespace::default()),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Maps `thing` to `requested_id`, or to a freshly synthesized id.
    ///
    /// Fails with `DuplicateMapping` if the thing is already mapped and with
    /// `IdentifierInUse` if the chosen id is taken. Both tables are updated
    /// together or not at all.
    pub fn create_mapping(&self, thing: Thing, requested_id: Option<ThingId>) -> Result<ThingId> {
        let mut ns = self.namespace.write();
        let id = ns.create(&self.prefix, thing, requested_id)?;
        debug!(prefix = %self.prefix, id = %id, "thing mapped");
        Ok(id)
    }

    /// Returns the thing mapped to `id`.
    pub fn lookup_thing(&self, id: &str) -> Result<Thing> {
        self.namespace
            .read()
            .table
            .get_by_left(id)
            .cloned()
            .ok_or_else(|| MapperError::UnknownIdentifier(ThingId::from(id)))
    }

    /// Returns the existing id for `thing`, mapping it with a synthesized id
    /// first if needed. Repeated calls for the same thing do not mutate.
    pub fn ensure_mapping(&self, thing: Thing) -> Result<ThingId> {
        let mut ns = self.namespace.write();
        if let Some(existing) = ns.table.get_by_right(&thing) {
            return Ok(existing.clone());
        }
        let id = ns.create(&self.prefix, thing, None)?;
        debug!(prefix = %self.prefix, id = %id, "thing mapped on demand");
        Ok(id)
    }

    /// Returns the id mapped to `thing`.
    pub fn lookup_identifier(&self, thing: &Thing) -> Result<ThingId> {
        self.namespace
            .read()
            .table
            .get_by_right(thing)
            .cloned()
            .ok_or_else(|| MapperError::UnknownThing(thing.to_string()))
    }

    /// Typed convenience over [`lookup_thing`](Self::lookup_thing): the thing
    /// must have been created from an `Arc<T>`.
    pub fn lookup_as<T>(&self, id: &str) -> Result<std::sync::Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let thing = self.lookup_thing(id)?;
        thing
            .downcast::<T>()
            .ok_or_else(|| MapperError::UnknownIdentifier(ThingId::from(id)))
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.namespace.read().table.contains_left(id)
    }

    pub fn is_mapped(&self, thing: &Thing) -> bool {
        self.namespace.read().table.contains_right(thing)
    }

    /// Number of active mappings.
    pub fn len(&self) -> usize {
        self.namespace.read().table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The sequence number the next synthesized id will use.
    pub fn next_sequence(&self) -> u64 {
        self.namespace.read().next_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn thing() -> Thing {
        Thing::new(Arc::new(()))
    }

    #[test]
    fn failed_synthesis_still_advances_counter() {
        let mapper = ThingMapper::new("p");
        mapper
            .create_mapping(thing(), Some(ThingId::from("p0")))
            .unwrap();

        let err = mapper.create_mapping(thing(), None).unwrap_err();
        assert_eq!(err, MapperError::IdentifierInUse(ThingId::from("p0")));
        assert_eq!(mapper.next_sequence(), 1);

        let id = mapper.create_mapping(thing(), None).unwrap();
        assert_eq!(id, "p1");
    }

    #[test]
    fn duplicate_check_happens_before_synthesis() {
        let mapper = ThingMapper::new("p");
        let t = thing();
        mapper.create_mapping(t.clone(), None).unwrap();
        assert!(mapper.create_mapping(t, None).is_err());
        assert_eq!(mapper.next_sequence(), 1);
    }

    #[test]
    fn lookup_as_rejects_wrong_type() {
        let mapper = ThingMapper::new("p");
        let id = mapper
            .create_mapping(Thing::new(Arc::new(7u8)), None)
            .unwrap();
        assert_eq!(*mapper.lookup_as::<u8>(id.as_str()).unwrap(), 7);
        assert!(mapper.lookup_as::<String>(id.as_str()).is_err());
    }
}

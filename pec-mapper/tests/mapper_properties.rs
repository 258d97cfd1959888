//! Property-based tests for identity mapping.
//!
//! - Uniqueness: distinct things never share an identifier
//! - Idempotence: ensuring a mapped thing again changes nothing
//! - Inverse: both lookup directions agree for every established pair
//! - Monotonic synthesis: synthesized ids follow `<prefix><n>` without gaps

use pec_mapper::{Thing, ThingMapper};
use pec_types::ThingId;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

fn prefix_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{0,6}:?").unwrap()
}

fn fresh_things(n: usize) -> Vec<Thing> {
    (0..n).map(|i| Thing::new(Arc::new(i))).collect()
}

proptest! {
    #[test]
    fn distinct_things_get_distinct_ids(n in 1usize..64, prefix in prefix_strategy()) {
        let mapper = ThingMapper::new(prefix);
        let things = fresh_things(n);
        let ids: HashSet<ThingId> = things
            .iter()
            .map(|t| mapper.ensure_mapping(t.clone()).unwrap())
            .collect();
        prop_assert_eq!(ids.len(), n);
    }

    #[test]
    fn ensure_twice_is_stable(n in 1usize..32, repeats in 1usize..4) {
        let mapper = ThingMapper::new("p");
        let things = fresh_things(n);
        let first: Vec<ThingId> = things
            .iter()
            .map(|t| mapper.ensure_mapping(t.clone()).unwrap())
            .collect();
        for _ in 0..repeats {
            for (thing, id) in things.iter().zip(&first) {
                prop_assert_eq!(&mapper.ensure_mapping(thing.clone()).unwrap(), id);
            }
        }
        prop_assert_eq!(mapper.len(), n);
        prop_assert_eq!(mapper.next_sequence(), n as u64);
    }

    #[test]
    fn lookups_are_inverse(ids in prop::collection::hash_set("[a-z0-9]{1,8}", 1..32)) {
        let mapper = ThingMapper::new("p");
        let ids: Vec<String> = ids.into_iter().collect();
        let things = fresh_things(ids.len());
        for (thing, id) in things.iter().zip(&ids) {
            mapper.create_mapping(thing.clone(), Some(ThingId::from(id.as_str()))).unwrap();
        }
        for (thing, id) in things.iter().zip(&ids) {
            prop_assert_eq!(&mapper.lookup_thing(id).unwrap(), thing);
            let found = mapper.lookup_identifier(thing).unwrap();
            prop_assert_eq!(found.as_str(), id.as_str());
        }
    }

    #[test]
    fn synthesized_ids_are_sequential(n in 1usize..64, prefix in prefix_strategy()) {
        let mapper = ThingMapper::new(prefix.clone());
        for (i, thing) in fresh_things(n).into_iter().enumerate() {
            let id = mapper.create_mapping(thing, None).unwrap();
            prop_assert_eq!(id, ThingId::synthesized(&prefix, i as u64));
        }
    }
}

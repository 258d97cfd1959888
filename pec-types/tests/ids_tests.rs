use pec_types::{ContextId, ThingId};
use std::collections::HashSet;

// ── ContextId ─────────────────────────────────────────────────────

#[test]
fn context_ids_are_distinct() {
    let a = ContextId::new();
    let b = ContextId::new();
    assert_ne!(a, b);
}

#[test]
fn context_id_prefix_is_display_plus_separator() {
    let id = ContextId::new();
    assert_eq!(id.id_prefix(), format!("{id}:"));
}

// ── ThingId ───────────────────────────────────────────────────────

#[test]
fn thing_id_synthesized_format() {
    assert_eq!(ThingId::synthesized("p", 0), "p0");
    assert_eq!(ThingId::synthesized("ctx:", 12).as_str(), "ctx:12");
}

#[test]
fn thing_id_hash_and_eq() {
    let mut set = HashSet::new();
    set.insert(ThingId::from("id1"));
    set.insert(ThingId::new("id1"));
    set.insert(ThingId::from("id2".to_string()));
    assert_eq!(set.len(), 2);
    assert!(set.contains("id1"));
}

#[test]
fn thing_id_serializes_as_plain_string() {
    let id = ThingId::from("handle-7");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"handle-7\"");
    let parsed: ThingId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}

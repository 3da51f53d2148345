use super::*;
use std::collections::HashSet;
use std::sync::Arc;

#[test]
fn resource_ids_are_sequential_from_one() {
    let ids = IdGenerator::new();
    let got: Vec<String> = (0..5).map(|_| ids.next_resource_id()).collect();
    assert_eq!(got, ["r1", "r2", "r3", "r4", "r5"]);
}

#[test]
fn reset_rebases_the_counter() {
    let ids = IdGenerator::new();
    ids.next_resource_id();
    ids.reset_counter(5);
    assert_eq!(ids.next_resource_id(), "r6");
}

#[test]
fn text_style_ids_use_their_own_counter() {
    let ids = IdGenerator::new();
    ids.next_resource_id();
    ids.next_resource_id();
    assert_eq!(ids.next_text_style_id(), "ts1");
    assert_eq!(ids.next_resource_id(), "r3");
    ids.reset_text_style_counter(9);
    assert_eq!(ids.next_text_style_id(), "ts10");
}

#[test]
fn concurrent_callers_never_share_an_id() {
    let ids = Arc::new(IdGenerator::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ids = Arc::clone(&ids);
            std::thread::spawn(move || (0..100).map(|_| ids.next_resource_id()).collect::<Vec<_>>())
        })
        .collect();
    let mut seen = HashSet::new();
    for h in handles {
        for id in h.join().unwrap() {
            assert!(seen.insert(id));
        }
    }
    assert_eq!(seen.len(), 800);
    assert!(seen.contains("r800"));
}

#[test]
fn unique_id_is_32_uppercase_hex() {
    let id = IdGenerator::new().unique_id("asset");
    assert_eq!(id.len(), 32);
    assert!(
        id.chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
    );
}

#[test]
fn hash_hex_is_deterministic() {
    assert_eq!(hash_hex("a-1"), hash_hex("a-1"));
    assert_ne!(hash_hex("a-1"), hash_hex("a-2"));
}

//! Structural validation walk: checks the trie invariants that every
//! public operation must preserve, and that the size field is honest.

use crate::node::{self, Node};
use crate::table::Table;
use crate::{HamtMap, TablePolicy};

use super::util::{colliding, controlled, CollidingKey};

/// Walks the whole trie, panicking on any violated invariant. Returns the
/// number of entries actually reachable, which must equal `len()`.
pub(crate) fn validate<K, V, S>(map: &HamtMap<K, V, S>) -> usize {
    match map.root_table() {
        None => {
            assert_eq!(map.len(), 0, "empty root but nonzero size");
            0
        }
        Some(root) => {
            let reachable = validate_table(root, 0, 0);
            assert_eq!(map.len(), reachable, "size disagrees with reachable entries");
            reachable
        }
    }
}

fn validate_table<K, V>(table: &Table<K, V>, depth: u32, prefix: u32) -> usize {
    assert!(depth <= node::MAX_DEPTH, "table deeper than MAX_DEPTH");
    assert!(table.len() > 0, "table with zero children at depth {depth}");
    assert_eq!(
        table.hash_path(),
        prefix,
        "table hash path disagrees with its position"
    );

    let mut reachable = 0;
    for (slot, child) in table.entries() {
        match &*child {
            Node::Leaf(leaf) => {
                assert_eq!(
                    leaf.hash & node::hash_path_mask(depth),
                    prefix,
                    "flat leaf hash disagrees with table prefix"
                );
                assert_eq!(node::index(leaf.hash, depth), slot, "leaf in wrong slot");
                reachable += 1;
            }
            Node::Collision(leaf) => {
                assert!(leaf.entries.len() >= 2, "collision leaf below two entries");
                assert_eq!(
                    leaf.hash & node::hash_path_mask(depth),
                    prefix,
                    "collision leaf hash disagrees with table prefix"
                );
                assert_eq!(node::index(leaf.hash, depth), slot, "leaf in wrong slot");
                reachable += leaf.entries.len();
            }
            Node::Table(sub) => {
                let sub_prefix = node::build_hash_path(prefix, slot, depth);
                reachable += validate_table(sub, depth + 1, sub_prefix);
            }
        }
    }
    reachable
}

// ---------------------------------------------------------------------------
// Scripted workloads, validated step by step
// ---------------------------------------------------------------------------

#[test]
fn valid_after_scripted_inserts_and_removes() {
    for policy in [
        TablePolicy::SparseOnly,
        TablePolicy::DenseOnly,
        TablePolicy::Graded,
    ] {
        let mut map: HamtMap<u64, u64> = HamtMap::with_policy(policy);
        validate(&map);

        for i in 0..500 {
            map = map.insert(i, i * 2).0;
        }
        validate(&map);

        for i in (0..500).step_by(3) {
            map = map.remove(&i).0;
        }
        validate(&map);

        for i in 0..500 {
            map = map.remove(&i).0;
        }
        validate(&map);
        assert!(map.is_empty());
    }
}

#[test]
fn valid_with_crafted_deep_paths() {
    // Keys sharing 25 low bits force single-child tables down to the
    // deepest level; the walk must see consistent prefixes throughout.
    let mut map = controlled(TablePolicy::Graded);
    map = map.insert(7, 1).0;
    map = map.insert(7 | (1 << 25), 2).0;
    map = map.insert(7 | (2 << 25), 3).0;
    validate(&map);

    map = map.remove(&(7 | (1 << 25))).0;
    validate(&map);
    assert_eq!(map.len(), 2);
}

#[test]
fn valid_with_full_hash_collisions() {
    let mut map = colliding(TablePolicy::Graded);
    for id in 0..4 {
        map = map.insert(CollidingKey::new(id, 0x0AAA_AAAA), id as i32).0;
    }
    validate(&map);

    map = map.remove(&CollidingKey::new(2, 0x0AAA_AAAA)).0;
    validate(&map);
    assert_eq!(map.len(), 3);
}

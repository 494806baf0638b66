//! Structural sharing: a write rebuilds only the path it touched.

use std::collections::HashSet;
use std::rc::Rc;

use crate::node::{Node, MAX_LEVELS};
use crate::table::Table;
use crate::{HamtMap, TablePolicy};

/// Collects the addresses of every child node reachable from `table`.
fn collect_nodes<K, V>(table: &Table<K, V>, out: &mut HashSet<*const Node<K, V>>) {
    for child in table.children() {
        out.insert(Rc::as_ptr(child));
        if let Node::Table(sub) = &**child {
            collect_nodes(sub, out);
        }
    }
}

/// Counts tables reachable from `table` that are not shared with the set
/// of nodes collected from an older version. The root table itself always
/// counts: it is rebuilt by every write.
fn fresh_tables<K, V>(table: &Table<K, V>, old: &HashSet<*const Node<K, V>>) -> usize {
    let mut fresh = 1;
    for child in table.children() {
        if old.contains(&Rc::as_ptr(child)) {
            continue;
        }
        if let Node::Table(sub) = &**child {
            fresh += fresh_tables(sub, old);
        }
    }
    fresh
}

fn node_set<K, V, S>(map: &HamtMap<K, V, S>) -> HashSet<*const Node<K, V>> {
    let mut out = HashSet::new();
    if let Some(root) = map.root_table() {
        collect_nodes(root, &mut out);
    }
    out
}

fn build(policy: TablePolicy, n: u64) -> HamtMap<u64, u64> {
    let mut map = HamtMap::with_policy(policy);
    for i in 0..n {
        map = map.insert(i, i).0;
    }
    map
}

/// One insert into a large map allocates at most `MAX_DEPTH + 2` tables.
#[test]
fn insert_rebuilds_one_path() {
    for policy in [
        TablePolicy::SparseOnly,
        TablePolicy::DenseOnly,
        TablePolicy::Graded,
    ] {
        let m1 = build(policy, 10_000);
        let old = node_set(&m1);

        let (m2, _) = m1.insert(999_999, 999_999);
        let fresh = fresh_tables(m2.root_table().unwrap(), &old);
        assert!(
            fresh <= MAX_LEVELS + 1,
            "insert rebuilt {fresh} tables under {policy:?}"
        );
    }
}

/// One remove from a large map allocates at most `MAX_DEPTH + 2` tables.
#[test]
fn remove_rebuilds_one_path() {
    for policy in [
        TablePolicy::SparseOnly,
        TablePolicy::DenseOnly,
        TablePolicy::Graded,
    ] {
        let m1 = build(policy, 10_000);
        let old = node_set(&m1);

        let (m2, removed) = m1.remove(&5_000);
        assert_eq!(removed, Some(5_000));
        let fresh = fresh_tables(m2.root_table().unwrap(), &old);
        assert!(
            fresh <= MAX_LEVELS + 1,
            "remove rebuilt {fresh} tables under {policy:?}"
        );
    }
}

/// Value replacement shares everything off the written path too.
#[test]
fn overwrite_rebuilds_one_path() {
    let m1 = build(TablePolicy::Graded, 10_000);
    let old = node_set(&m1);

    let (m2, inserted) = m1.insert(1_234, 0);
    assert!(!inserted);
    let fresh = fresh_tables(m2.root_table().unwrap(), &old);
    assert!(fresh <= MAX_LEVELS + 1, "overwrite rebuilt {fresh} tables");
}

/// A miss on remove shares the entire trie.
#[test]
fn missed_remove_shares_everything() {
    let m1 = build(TablePolicy::Graded, 1_000);
    let old = node_set(&m1);

    let (m2, removed) = m1.remove(&1_000_000);
    assert_eq!(removed, None);
    assert_eq!(node_set(&m2), old, "a miss must not allocate new nodes");
}

/// The untouched sibling subtrees of a write are shared by pointer.
#[test]
fn siblings_shared_by_pointer() {
    let m1 = build(TablePolicy::Graded, 10_000);
    let (m2, _) = m1.insert(42, 0);

    let old = node_set(&m1);
    let new = node_set(&m2);
    let shared = new.intersection(&old).count();

    // All but a handful of path nodes survive into the new version.
    assert!(
        new.len() - shared <= MAX_LEVELS + 1,
        "only the written path may be fresh ({} fresh nodes)",
        new.len() - shared
    );
}

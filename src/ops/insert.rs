//! Insertion operation — path-copy insert returning a new root.

use std::rc::Rc;

use crate::leaf::{self, FlatLeaf, LeafInsert};
use crate::node::{self, HashBits, Node};
use crate::ops::copy_up;
use crate::path::PathRecorder;
use crate::table::{Table, TablePolicy};

/// Outcome of an insert into a non-empty trie.
pub(crate) struct InsertOutcome<K, V> {
    /// The new root.
    pub root: Table<K, V>,
    /// `true` if a new key was added, `false` on value replacement.
    pub inserted: bool,
}

/// Inserts `key`/`value` (with masked hashcode `hash`) under `root`.
pub(crate) fn insert<K, V>(
    root: &Table<K, V>,
    hash: HashBits,
    key: K,
    value: V,
    policy: TablePolicy,
) -> InsertOutcome<K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    let mut path = PathRecorder::new();
    let mut table = root;
    let mut hash_path: HashBits = 0;

    for depth in 0..=node::MAX_DEPTH {
        let slot = node::index(hash, depth);

        let Some(child) = table.get(slot) else {
            // Empty slot: the new pair lands here as a flat leaf.
            let new_leaf = Rc::new(Node::Leaf(FlatLeaf::new(hash, key, value)));
            let new_table = table.set(slot, Some(new_leaf), policy);
            return InsertOutcome {
                root: finish(path, new_table, policy),
                inserted: true,
            };
        };

        match &**child {
            Node::Table(next) => {
                hash_path = node::build_hash_path(hash_path, slot, depth);
                path.push(table, slot);
                table = next;
            }
            old_leaf => {
                if old_leaf.hashcode() == hash {
                    // Same full hash: the leaf absorbs the pair, replacing
                    // the value or growing into a collision leaf.
                    let LeafInsert { node: new_leaf, replaced } =
                        leaf::put(old_leaf, key, value);
                    let new_table = table.set(slot, Some(Rc::new(new_leaf)), policy);
                    return InsertOutcome {
                        root: finish(path, new_table, policy),
                        inserted: !replaced,
                    };
                }

                // Prefixes agree down to here but the full hashes differ:
                // both leaves move into a subtable one level down.
                let sub_path = node::build_hash_path(hash_path, slot, depth);
                let sub = join_leaves(
                    depth + 1,
                    sub_path,
                    Rc::clone(child),
                    FlatLeaf::new(hash, key, value),
                    policy,
                );
                let new_table =
                    table.set(slot, Some(Rc::new(Node::Table(sub))), policy);
                return InsertOutcome {
                    root: finish(path, new_table, policy),
                    inserted: true,
                };
            }
        }
    }

    unreachable!("insert descended past MAX_DEPTH without finding a leaf or empty slot");
}

/// Copies the rewritten table up through the recorded ancestors.
fn finish<K, V>(
    path: PathRecorder<'_, K, V>,
    table: Option<Table<K, V>>,
    policy: TablePolicy,
) -> Table<K, V> {
    copy_up(path, table, policy).expect("insert cannot empty a table")
}

/// Builds the subtree holding two leaves whose hashcodes agree on the
/// prefix shared so far, splitting one level at a time until their slot
/// indices diverge.
///
/// If the indices still agree at `MAX_DEPTH` the two hashcodes are equal,
/// and the leaves merge into a single (collision) leaf placed in the
/// deepest table.
fn join_leaves<K, V>(
    depth: u32,
    hash_path: HashBits,
    old: Rc<Node<K, V>>,
    new: FlatLeaf<K, V>,
    policy: TablePolicy,
) -> Table<K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    let old_slot = node::index(old.hashcode(), depth);
    let new_slot = node::index(new.hash, depth);

    if old_slot != new_slot {
        let new = Rc::new(Node::Leaf(new));
        let entries = if old_slot < new_slot {
            vec![(old_slot, old), (new_slot, new)]
        } else {
            vec![(new_slot, new), (old_slot, old)]
        };
        return Table::from_entries(hash_path, entries, policy);
    }

    if depth >= node::MAX_DEPTH {
        let LeafInsert { node: merged, .. } = leaf::put(&old, new.key, new.value);
        return Table::from_entries(hash_path, vec![(old_slot, Rc::new(merged))], policy);
    }

    let child = join_leaves(
        depth + 1,
        node::build_hash_path(hash_path, old_slot, depth),
        old,
        new,
        policy,
    );
    Table::from_entries(
        hash_path,
        vec![(old_slot, Rc::new(Node::Table(child)))],
        policy,
    )
}

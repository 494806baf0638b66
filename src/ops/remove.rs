//! Removal operation — path-copy delete returning a new root.

use std::rc::Rc;

use crate::leaf::{self, LeafRemoval};
use crate::node::{self, HashBits, Node};
use crate::ops::copy_up;
use crate::path::PathRecorder;
use crate::table::{Table, TablePolicy};

/// Outcome of a remove from a non-empty trie.
pub(crate) enum RemoveOutcome<K, V> {
    /// Key was not found — the map is unchanged.
    NotFound,
    /// Key was removed.
    Removed {
        /// The new root, or `None` if the map is now empty.
        root: Option<Table<K, V>>,
        /// The removed value.
        value: V,
    },
}

/// Removes `key` (with masked hashcode `hash`) from the trie under `root`.
///
/// The ancestors are rebuilt only after a confirmed removal; a miss leaves
/// every node untouched.
pub(crate) fn remove<K, V>(
    root: &Table<K, V>,
    hash: HashBits,
    key: &K,
    policy: TablePolicy,
) -> RemoveOutcome<K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    let mut path = PathRecorder::new();
    let mut table = root;

    for depth in 0..=node::MAX_DEPTH {
        let slot = node::index(hash, depth);

        let Some(child) = table.get(slot) else {
            return RemoveOutcome::NotFound;
        };

        match &**child {
            Node::Table(next) => {
                path.push(table, slot);
                table = next;
            }
            old_leaf => {
                if old_leaf.hashcode() != hash {
                    return RemoveOutcome::NotFound;
                }
                return match leaf::del(old_leaf, key) {
                    LeafRemoval::NotFound => RemoveOutcome::NotFound,
                    LeafRemoval::Removed { node: remaining, value } => {
                        // An emptied leaf clears the slot; the table (and
                        // any emptied ancestors) may vanish with it.
                        let new_table = table.set(slot, remaining.map(Rc::new), policy);
                        RemoveOutcome::Removed {
                            root: copy_up(path, new_table, policy),
                            value,
                        }
                    }
                };
            }
        }
    }

    RemoveOutcome::NotFound
}

//! Lookup operation — descends the trie to find a key.

use crate::leaf;
use crate::node::{self, HashBits, Node};
use crate::table::Table;

/// Searches for `key` (with masked hashcode `hash`) under `root`.
pub(crate) fn lookup<'a, K: Eq, V>(
    root: &'a Table<K, V>,
    hash: HashBits,
    key: &K,
) -> Option<&'a V> {
    let mut table = root;

    for depth in 0..=node::MAX_DEPTH {
        let slot = node::index(hash, depth);
        let child = table.get(slot)?;

        match &**child {
            Node::Table(next) => table = next,
            // A leaf's full hash deciding the answer is sound even at
            // shallow depths: equal full hashes would have descended
            // together to this leaf by construction.
            other => {
                if other.hashcode() != hash {
                    return None;
                }
                return leaf::get(other, key);
            }
        }
    }

    None
}

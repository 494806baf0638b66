//! Leaf variants: one pair per leaf, or a bucket of full-hash collisions.
//!
//! Leaves are immutable; `put`/`del` build replacements and report what
//! happened through [`LeafInsert`] and [`LeafRemoval`].

use crate::node::{HashBits, Node};

/// Leaf storing a single key/value pair with its full masked hashcode.
pub(crate) struct FlatLeaf<K, V> {
    /// Full masked hashcode of `key`.
    pub hash: HashBits,
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
}

impl<K, V> FlatLeaf<K, V> {
    pub(crate) const fn new(hash: HashBits, key: K, value: V) -> Self {
        Self { hash, key, value }
    }
}

/// Leaf storing two or more pairs whose keys share one full hashcode.
///
/// Invariant: `entries.len() >= 2`; keys are pairwise distinct.
pub(crate) struct CollisionLeaf<K, V> {
    /// The hashcode shared by every entry.
    pub hash: HashBits,
    /// The colliding pairs, in insertion order.
    pub entries: Vec<(K, V)>,
}

/// Outcome of a leaf-level insert.
pub(crate) struct LeafInsert<K, V> {
    /// The replacement leaf.
    pub node: Node<K, V>,
    /// `true` if an existing value was replaced (no new key added).
    pub replaced: bool,
}

/// Outcome of a leaf-level removal.
pub(crate) enum LeafRemoval<K, V> {
    /// The key is not stored in this leaf.
    NotFound,
    /// The key was removed.
    Removed {
        /// What survives: `None` if the leaf is gone, a flat leaf after a
        /// two-entry collision demotes, or a smaller collision leaf.
        node: Option<Node<K, V>>,
        /// The removed value.
        value: V,
    },
}

// ---------------------------------------------------------------------------
// Dispatch over the two leaf kinds
// ---------------------------------------------------------------------------

/// Looks up `key` in a leaf node.
pub(crate) fn get<'a, K: Eq, V>(node: &'a Node<K, V>, key: &K) -> Option<&'a V> {
    match node {
        Node::Leaf(leaf) => (leaf.key == *key).then_some(&leaf.value),
        Node::Collision(leaf) => leaf
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v),
        Node::Table(_) => unreachable!("leaf::get on a table node"),
    }
}

/// Inserts `key`/`value` into a leaf node whose hashcode equals the key's.
///
/// A flat leaf with a different key promotes to a collision leaf; a
/// matching key gets its value replaced.
pub(crate) fn put<K, V>(node: &Node<K, V>, key: K, value: V) -> LeafInsert<K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    match node {
        Node::Leaf(leaf) => {
            if leaf.key == key {
                return LeafInsert {
                    node: Node::Leaf(FlatLeaf::new(leaf.hash, key, value)),
                    replaced: true,
                };
            }
            LeafInsert {
                node: Node::Collision(CollisionLeaf {
                    hash: leaf.hash,
                    entries: vec![(leaf.key.clone(), leaf.value.clone()), (key, value)],
                }),
                replaced: false,
            }
        }
        Node::Collision(leaf) => {
            let mut entries = leaf.entries.clone();
            if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == key) {
                entry.1 = value;
                return LeafInsert {
                    node: Node::Collision(CollisionLeaf { hash: leaf.hash, entries }),
                    replaced: true,
                };
            }
            entries.push((key, value));
            LeafInsert {
                node: Node::Collision(CollisionLeaf { hash: leaf.hash, entries }),
                replaced: false,
            }
        }
        Node::Table(_) => unreachable!("leaf::put on a table node"),
    }
}

/// Removes `key` from a leaf node.
///
/// A two-entry collision leaf demotes to a flat leaf holding the survivor;
/// a flat leaf vanishes and the caller drops its slot from the parent.
pub(crate) fn del<K, V>(node: &Node<K, V>, key: &K) -> LeafRemoval<K, V>
where
    K: Eq + Clone,
    V: Clone,
{
    match node {
        Node::Leaf(leaf) => {
            if leaf.key != *key {
                return LeafRemoval::NotFound;
            }
            LeafRemoval::Removed {
                node: None,
                value: leaf.value.clone(),
            }
        }
        Node::Collision(leaf) => {
            let Some(at) = leaf.entries.iter().position(|(k, _)| k == key) else {
                return LeafRemoval::NotFound;
            };
            let value = leaf.entries[at].1.clone();

            if leaf.entries.len() == 2 {
                let (k, v) = leaf.entries[1 - at].clone();
                return LeafRemoval::Removed {
                    node: Some(Node::Leaf(FlatLeaf::new(leaf.hash, k, v))),
                    value,
                };
            }

            let mut entries = leaf.entries.clone();
            entries.remove(at);
            LeafRemoval::Removed {
                node: Some(Node::Collision(CollisionLeaf { hash: leaf.hash, entries })),
                value,
            }
        }
        Node::Table(_) => unreachable!("leaf::del on a table node"),
    }
}

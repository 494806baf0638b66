//! Persistent HAMT map façade.

use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::ops;
use std::rc::Rc;

use rustc_hash::FxHasher;

use crate::iter::Iter;
use crate::leaf::FlatLeaf;
use crate::node::{self, HashBits, Node};
use crate::ops::insert::{self as insert_op, InsertOutcome};
use crate::ops::remove::{self as remove_op, RemoveOutcome};
use crate::ops::get as get_op;
use crate::table::{Table, TablePolicy};

/// Persistent hash map based on a HAMT.
///
/// Mutating operations take `&self` and return a new map; the old version
/// stays valid and shares every untouched subtree with the new one. A
/// write rebuilds only the tables on the root-to-leaf path it touched.
///
/// Keys hash through the map's [`BuildHasher`] (Fx by default); only the
/// low 30 bits of the hashcode steer the trie.
pub struct HamtMap<K, V, S = BuildHasherDefault<FxHasher>> {
    root: Option<Rc<Table<K, V>>>,
    size: usize,
    policy: TablePolicy,
    hash_builder: S,
}

// ---------------------------------------------------------------------------
// Construction & accessors
// ---------------------------------------------------------------------------

impl<K, V> HamtMap<K, V, BuildHasherDefault<FxHasher>> {
    /// Creates an empty map with the default (graded) table policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(TablePolicy::default())
    }

    /// Creates an empty map using the given table-representation policy.
    ///
    /// The policy is fixed for the lifetime of this map and every version
    /// derived from it.
    #[must_use]
    pub fn with_policy(policy: TablePolicy) -> Self {
        Self::with_policy_and_hasher(policy, BuildHasherDefault::<FxHasher>::default())
    }
}

impl<K, V, S> HamtMap<K, V, S> {
    /// Creates an empty map that hashes keys with `hash_builder`.
    #[must_use]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_policy_and_hasher(TablePolicy::default(), hash_builder)
    }

    /// Creates an empty map with both the policy and the hasher chosen.
    #[must_use]
    pub fn with_policy_and_hasher(policy: TablePolicy, hash_builder: S) -> Self {
        Self {
            root: None,
            size: 0,
            policy,
            hash_builder,
        }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the table-representation policy this map was built with.
    #[must_use]
    pub fn policy(&self) -> TablePolicy {
        self.policy
    }

    /// Returns an iterator over `(&K, &V)` pairs.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref())
    }

    /// Root table, for invariant checks in the test tree.
    #[cfg(test)]
    pub(crate) fn root_table(&self) -> Option<&Table<K, V>> {
        self.root.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Read operations — K: Hash + Eq
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V, S: BuildHasher> HamtMap<K, V, S> {
    /// Returns a reference to the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let root = self.root.as_deref()?;
        get_op::lookup(root, self.hash_of(key), key)
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Masked trie hashcode of a key.
    fn hash_of(&self, key: &K) -> HashBits {
        node::mask_hash(self.hash_builder.hash_one(key))
    }
}

// ---------------------------------------------------------------------------
// Write operations — K: Hash + Eq + Clone, V: Clone
// ---------------------------------------------------------------------------

impl<K, V, S> HamtMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    /// Returns a new map with `key` bound to `value`, plus `true` if the
    /// key was newly added or `false` if an existing value was replaced.
    ///
    /// `self` is unchanged.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> (Self, bool) {
        let hash = self.hash_of(&key);

        let Some(root) = self.root.as_deref() else {
            let slot = node::index(hash, 0);
            let leaf = Rc::new(Node::Leaf(FlatLeaf::new(hash, key, value)));
            let root = Table::single(0, slot, leaf);
            return (self.with_root(Some(root), 1), true);
        };

        let InsertOutcome { root, inserted } =
            insert_op::insert(root, hash, key, value, self.policy);
        let size = self.size + usize::from(inserted);
        (self.with_root(Some(root), size), inserted)
    }

    /// Returns a new map without `key`, plus the removed value if the key
    /// was present.
    ///
    /// `self` is unchanged; a miss returns a cheap clone of it.
    #[must_use]
    pub fn remove(&self, key: &K) -> (Self, Option<V>) {
        let Some(root) = self.root.as_deref() else {
            return (self.clone(), None);
        };

        match remove_op::remove(root, self.hash_of(key), key, self.policy) {
            RemoveOutcome::NotFound => (self.clone(), None),
            RemoveOutcome::Removed { root, value } => {
                (self.with_root(root, self.size - 1), Some(value))
            }
        }
    }

    /// A sibling version of this map around a replacement root.
    fn with_root(&self, root: Option<Table<K, V>>, size: usize) -> Self {
        Self {
            root: root.map(Rc::new),
            size,
            policy: self.policy,
            hash_builder: self.hash_builder.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

// Cloning shares the root by reference — K/V data is never copied.
impl<K, V, S: Clone> Clone for HamtMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            size: self.size,
            policy: self.policy,
            hash_builder: self.hash_builder.clone(),
        }
    }
}

impl<K, V, S: Default> Default for HamtMap<K, V, S> {
    fn default() -> Self {
        Self::with_policy_and_hasher(TablePolicy::default(), S::default())
    }
}

impl<K, V, S> fmt::Debug for HamtMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamtMap")
            .field("len", &self.size)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Content equality: same keys bound to equal values. Two equal maps may
/// still differ structurally (e.g. when built under different policies).
impl<K, V, S> PartialEq for HamtMap<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for HamtMap<K, V, S>
where
    K: Hash + Eq,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> Extend<(K, V)> for HamtMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            *self = self.insert(k, v).0;
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HamtMap<K, V, S>
where
    K: Hash + Eq + Clone,
    V: Clone,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_policy_and_hasher(TablePolicy::default(), S::default());
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ops::Index<&K> for HamtMap<K, V, S> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V, S> IntoIterator for &'a HamtMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

//! Shared test support: a hasher with fully controllable output.

use std::hash::{BuildHasherDefault, Hash, Hasher};

use crate::{HamtMap, TablePolicy};

/// Hasher that returns the last written integer unchanged, so a key's trie
/// hashcode can be dictated bit-for-bit by the test.
#[derive(Default)]
pub(crate) struct PassThroughHasher(u64);

impl Hasher for PassThroughHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 << 8) | u64::from(b);
        }
    }

    fn write_u32(&mut self, n: u32) {
        self.0 = u64::from(n);
    }
}

pub(crate) type PassThrough = BuildHasherDefault<PassThroughHasher>;

/// Map whose `u32` keys hash to themselves: key bits land on the trie
/// verbatim, so slot indices at every depth are chosen by the test.
pub(crate) type ControlledMap = HamtMap<u32, i32, PassThrough>;

pub(crate) fn controlled(policy: TablePolicy) -> ControlledMap {
    HamtMap::with_policy_and_hasher(policy, PassThrough::default())
}

/// A key type with a controllable hash value for testing hash collisions:
/// distinct `id`s may share the same `forced_hash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CollidingKey {
    pub id: u32,
    pub forced_hash: u32,
}

impl CollidingKey {
    pub(crate) const fn new(id: u32, forced_hash: u32) -> Self {
        Self { id, forced_hash }
    }
}

impl Hash for CollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.forced_hash);
    }
}

pub(crate) type CollidingMap<V> = HamtMap<CollidingKey, V, PassThrough>;

pub(crate) fn colliding<V>(policy: TablePolicy) -> CollidingMap<V> {
    HamtMap::with_policy_and_hasher(policy, PassThrough::default())
}

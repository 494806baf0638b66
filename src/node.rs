//! Trie node type, width constants, and hash-path helpers.

use std::fmt;

use crate::leaf::{CollisionLeaf, FlatLeaf};
use crate::table::Table;

/// Unsigned integer wide enough to hold [`HASH_WIDTH`] hash bits.
pub(crate) type HashBits = u32;

/// Bits of hashcode consumed per trie level (5 → 32-way branching).
pub(crate) const BITS_PER_LEVEL: u32 = 5;

/// Table fan-out: `2^BITS_PER_LEVEL`.
pub(crate) const FANOUT: usize = 1 << BITS_PER_LEVEL;

/// Deepest table depth. Depths range `0..=MAX_DEPTH`.
pub(crate) const MAX_DEPTH: u32 = 5;

/// Number of trie levels, and the path recorder capacity.
pub(crate) const MAX_LEVELS: usize = MAX_DEPTH as usize + 1;

/// Significant hashcode bits consumed by the trie (30 of 32).
pub(crate) const HASH_WIDTH: u32 = BITS_PER_LEVEL * (MAX_DEPTH + 1);

/// Mask selecting the [`HASH_WIDTH`] significant bits of a hashcode.
pub(crate) const HASH_MASK: HashBits = (1 << HASH_WIDTH) - 1;

// ---------------------------------------------------------------------------
// Bit utilities
// ---------------------------------------------------------------------------

/// Masks a raw 64-bit hash down to the [`HASH_WIDTH`] bits the trie uses.
///
/// The high bits are never consulted.
#[inline]
#[must_use]
pub(crate) const fn mask_hash(raw: u64) -> HashBits {
    (raw as HashBits) & HASH_MASK
}

/// Extracts the 5-bit slot index of `hash` at the given depth.
#[inline]
#[must_use]
pub(crate) const fn index(hash: HashBits, depth: u32) -> u32 {
    (hash >> (depth * BITS_PER_LEVEL)) & (FANOUT as u32 - 1)
}

/// Mask selecting the hash-path prefix bits valid at `depth`.
#[inline]
#[must_use]
pub(crate) const fn hash_path_mask(depth: u32) -> HashBits {
    (1 << (depth * BITS_PER_LEVEL)) - 1
}

/// Extends a hash-path prefix valid at `depth` with the slot index taken
/// there, producing the prefix valid at `depth + 1`.
#[inline]
#[must_use]
pub(crate) const fn build_hash_path(path: HashBits, slot: u32, depth: u32) -> HashBits {
    debug_assert!(path & !hash_path_mask(depth) == 0);
    path | (slot << (depth * BITS_PER_LEVEL))
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A trie node: one key/value pair, a full-hash collision bucket, or an
/// interior table.
pub(crate) enum Node<K, V> {
    /// Leaf holding exactly one key/value pair.
    Leaf(FlatLeaf<K, V>),
    /// Leaf holding two or more pairs whose keys share a full hashcode.
    Collision(CollisionLeaf<K, V>),
    /// Interior child-holding table (sparse or dense).
    Table(Table<K, V>),
}

impl<K, V> Node<K, V> {
    /// For leaves, the full masked hashcode of the stored key(s); for
    /// tables, the hash-path prefix of the table's position.
    #[must_use]
    pub(crate) fn hashcode(&self) -> HashBits {
        match self {
            Self::Leaf(leaf) => leaf.hash,
            Self::Collision(leaf) => leaf.hash,
            Self::Table(table) => table.hash_path(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(leaf) => f
                .debug_struct("Leaf")
                .field("hash", &format_args!("{:#010x}", leaf.hash))
                .field("key", &leaf.key)
                .field("value", &leaf.value)
                .finish(),
            Self::Collision(leaf) => f
                .debug_struct("Collision")
                .field("hash", &format_args!("{:#010x}", leaf.hash))
                .field("entries", &leaf.entries)
                .finish(),
            Self::Table(table) => table.fmt(f),
        }
    }
}

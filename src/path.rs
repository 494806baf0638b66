//! Path recorder: the ancestor stack captured during a write descent.

use arrayvec::ArrayVec;

use crate::node::MAX_LEVELS;
use crate::table::Table;

/// Bounded LIFO of `(ancestor table, slot taken there)` pairs, deepest
/// last. Discarded at the end of each operation; never part of the trie.
pub(crate) struct PathRecorder<'a, K, V> {
    stack: ArrayVec<(&'a Table<K, V>, u32), MAX_LEVELS>,
}

impl<'a, K, V> PathRecorder<'a, K, V> {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { stack: ArrayVec::new() }
    }

    /// Records an ancestor and the slot the descent took in it.
    ///
    /// # Panics
    ///
    /// Panics if pushed more than `MAX_LEVELS` times — a descent deeper
    /// than the trie allows is an internal invariant violation.
    pub(crate) fn push(&mut self, table: &'a Table<K, V>, slot: u32) {
        self.stack.push((table, slot));
    }

    /// Pops the deepest recorded ancestor.
    pub(crate) fn pop(&mut self) -> Option<(&'a Table<K, V>, u32)> {
        self.stack.pop()
    }
}

//! Trie operations: lookup, insert, remove, and the shared copy-up walk.

pub(crate) mod get;
pub(crate) mod insert;
pub(crate) mod remove;

use std::rc::Rc;

use crate::node::Node;
use crate::path::PathRecorder;
use crate::table::{Table, TablePolicy};

/// Rebuilds the recorded ancestors around a replacement subtree, deepest
/// first, and returns the new root.
///
/// `table` is the replacement for the table the descent stopped in, or
/// `None` when the write emptied it. An empty child propagates upward: the
/// parent's slot is dropped, and a parent emptied by that drop propagates
/// in turn. `None` out means the whole map is now empty.
pub(crate) fn copy_up<K, V>(
    mut path: PathRecorder<'_, K, V>,
    mut table: Option<Table<K, V>>,
    policy: TablePolicy,
) -> Option<Table<K, V>> {
    while let Some((parent, slot)) = path.pop() {
        let child = table.map(|t| Rc::new(Node::Table(t)));
        table = parent.set(slot, child, policy);
    }
    table
}

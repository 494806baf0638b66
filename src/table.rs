//! Interior tables: bitmap-compressed sparse form and fixed-array dense
//! form behind one contract, plus the representation policy.

use std::fmt;
use std::rc::Rc;

use crate::node::{FANOUT, HashBits, Node};

/// Occupancy at which a sparse table grades up to dense, and below which
/// a dense table grades back down.
const GRADE_THRESHOLD: usize = FANOUT / 2;

/// Table representation policy, fixed for a map's lifetime.
///
/// Both representations satisfy the same contract; the policy only decides
/// which one a table is built in, and whether a write that crosses the
/// occupancy threshold converts between them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TablePolicy {
    /// Every table is sparse; no promotion.
    SparseOnly,
    /// Tables holding two or more children are dense. The root still
    /// starts sparse while it holds a single child, so singleton maps
    /// stay cheap.
    DenseOnly,
    /// Sparse below `FANOUT/2` children, dense at or above; converts in
    /// both directions on every write that crosses the threshold.
    #[default]
    Graded,
}

impl TablePolicy {
    /// Occupancy at or above which a freshly written table must be dense.
    #[must_use]
    fn promote_at(self) -> Option<usize> {
        match self {
            Self::SparseOnly => None,
            Self::DenseOnly => Some(2),
            Self::Graded => Some(GRADE_THRESHOLD),
        }
    }

    /// Occupancy below which a freshly written dense table must be sparse.
    #[must_use]
    fn demote_at(self) -> Option<usize> {
        match self {
            Self::Graded => Some(GRADE_THRESHOLD),
            Self::SparseOnly | Self::DenseOnly => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table contract
// ---------------------------------------------------------------------------

/// An interior table in one of its two physical forms.
pub(crate) enum Table<K, V> {
    /// Bitmap + contiguous children, sized to occupancy.
    Sparse(SparseTable<K, V>),
    /// Fixed-size child array indexed directly by slot.
    Dense(DenseTable<K, V>),
}

impl<K, V> Table<K, V> {
    /// A one-child sparse table. Every policy starts singletons sparse.
    #[must_use]
    pub(crate) fn single(hash_path: HashBits, slot: u32, child: Rc<Node<K, V>>) -> Self {
        Self::Sparse(SparseTable {
            hash_path,
            bitmap: 1 << slot,
            children: vec![child],
        })
    }

    /// Builds a table from `(slot, child)` pairs in ascending slot order,
    /// picking the representation the policy requires for that occupancy.
    #[must_use]
    pub(crate) fn from_entries(
        hash_path: HashBits,
        entries: Vec<(u32, Rc<Node<K, V>>)>,
        policy: TablePolicy,
    ) -> Self {
        if policy.promote_at().is_some_and(|limit| entries.len() >= limit) {
            Self::Dense(DenseTable::from_entries(hash_path, entries))
        } else {
            Self::Sparse(SparseTable::from_entries(hash_path, entries))
        }
    }

    /// The hash-path prefix locating this table within the trie.
    #[must_use]
    pub(crate) fn hash_path(&self) -> HashBits {
        match self {
            Self::Sparse(t) => t.hash_path,
            Self::Dense(t) => t.hash_path,
        }
    }

    /// Number of occupied slots.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Sparse(t) => t.bitmap.count_ones() as usize,
            Self::Dense(t) => t.bitmap.count_ones() as usize,
        }
    }

    /// Returns the child at `slot`, if any.
    #[must_use]
    pub(crate) fn get(&self, slot: u32) -> Option<&Rc<Node<K, V>>> {
        match self {
            Self::Sparse(t) => t.get(slot),
            Self::Dense(t) => t.children[slot as usize].as_ref(),
        }
    }

    /// Writes `slot`, returning the replacement table.
    ///
    /// `Some(child)` fills or replaces the slot; `None` clears it. Returns
    /// `None` when the write empties the table — the caller must drop this
    /// table's slot from its parent. The returned table may be in the
    /// other representation when the write crosses the policy threshold;
    /// callers must not assume the kind.
    #[must_use]
    pub(crate) fn set(
        &self,
        slot: u32,
        child: Option<Rc<Node<K, V>>>,
        policy: TablePolicy,
    ) -> Option<Self> {
        match self {
            Self::Sparse(t) => t.set(slot, child, policy),
            Self::Dense(t) => t.set(slot, child, policy),
        }
    }

    /// All `(slot, child)` pairs in ascending slot order.
    ///
    /// Promotion and demotion rebuild through this, so the ordering
    /// carries across representations.
    #[must_use]
    pub(crate) fn entries(&self) -> Vec<(u32, Rc<Node<K, V>>)> {
        match self {
            Self::Sparse(t) => t.entries(),
            Self::Dense(t) => t.entries(),
        }
    }

    /// The children alone, ascending by slot.
    pub(crate) fn children(&self) -> Children<'_, K, V> {
        match self {
            Self::Sparse(t) => Children::Sparse(t.children.iter()),
            Self::Dense(t) => Children::Dense(t.children.iter().flatten()),
        }
    }
}

/// Iterator over a table's children in ascending slot order.
pub(crate) enum Children<'a, K, V> {
    Sparse(std::slice::Iter<'a, Rc<Node<K, V>>>),
    Dense(std::iter::Flatten<std::slice::Iter<'a, Option<Rc<Node<K, V>>>>>),
}

impl<'a, K, V> Iterator for Children<'a, K, V> {
    type Item = &'a Rc<Node<K, V>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Sparse(it) => it.next(),
            Self::Dense(it) => it.next(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sparse form
// ---------------------------------------------------------------------------

/// Bitmap-indexed table. Bit `i` of `bitmap` set ⇔ slot `i` occupied; the
/// child for slot `i` sits at position `popcount(bitmap & ((1 << i) - 1))`.
pub(crate) struct SparseTable<K, V> {
    pub(crate) hash_path: HashBits,
    pub(crate) bitmap: u32,
    pub(crate) children: Vec<Rc<Node<K, V>>>,
}

impl<K, V> SparseTable<K, V> {
    fn from_entries(hash_path: HashBits, entries: Vec<(u32, Rc<Node<K, V>>)>) -> Self {
        let mut bitmap = 0u32;
        let mut children = Vec::with_capacity(entries.len());
        for (slot, child) in entries {
            bitmap |= 1 << slot;
            children.push(child);
        }
        Self { hash_path, bitmap, children }
    }

    fn get(&self, slot: u32) -> Option<&Rc<Node<K, V>>> {
        let bit = 1u32 << slot;
        if self.bitmap & bit == 0 {
            return None;
        }
        Some(&self.children[self.position(bit)])
    }

    /// Position of the bit's child within the contiguous sequence.
    fn position(&self, bit: u32) -> usize {
        (self.bitmap & (bit - 1)).count_ones() as usize
    }

    fn set(
        &self,
        slot: u32,
        child: Option<Rc<Node<K, V>>>,
        policy: TablePolicy,
    ) -> Option<Table<K, V>> {
        let bit = 1u32 << slot;
        let pos = self.position(bit);
        let occupied = self.bitmap & bit != 0;

        match (child, occupied) {
            (Some(child), false) => {
                let mut children = Vec::with_capacity(self.children.len() + 1);
                children.extend(self.children[..pos].iter().cloned());
                children.push(child);
                children.extend(self.children[pos..].iter().cloned());
                let table = Self {
                    hash_path: self.hash_path,
                    bitmap: self.bitmap | bit,
                    children,
                };
                if policy.promote_at().is_some_and(|limit| table.children.len() >= limit) {
                    return Some(Table::Dense(DenseTable::from_entries(
                        table.hash_path,
                        table.entries(),
                    )));
                }
                Some(Table::Sparse(table))
            }
            (Some(child), true) => {
                let mut children = self.children.clone();
                children[pos] = child;
                Some(Table::Sparse(Self {
                    hash_path: self.hash_path,
                    bitmap: self.bitmap,
                    children,
                }))
            }
            (None, true) => {
                let bitmap = self.bitmap & !bit;
                if bitmap == 0 {
                    return None;
                }
                let mut children = self.children.clone();
                children.remove(pos);
                Some(Table::Sparse(Self {
                    hash_path: self.hash_path,
                    bitmap,
                    children,
                }))
            }
            (None, false) => Some(Table::Sparse(self.clone())),
        }
    }

    fn entries(&self) -> Vec<(u32, Rc<Node<K, V>>)> {
        let mut out = Vec::with_capacity(self.children.len());
        let mut pos = 0;
        for slot in 0..FANOUT as u32 {
            if self.bitmap & (1 << slot) != 0 {
                out.push((slot, Rc::clone(&self.children[pos])));
                pos += 1;
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Dense form
// ---------------------------------------------------------------------------

/// Full-width table. `children[i]` is `None` when slot `i` is unoccupied;
/// `bitmap` mirrors occupancy.
pub(crate) struct DenseTable<K, V> {
    pub(crate) hash_path: HashBits,
    pub(crate) bitmap: u32,
    pub(crate) children: [Option<Rc<Node<K, V>>>; FANOUT],
}

impl<K, V> DenseTable<K, V> {
    fn from_entries(hash_path: HashBits, entries: Vec<(u32, Rc<Node<K, V>>)>) -> Self {
        let mut bitmap = 0u32;
        let mut children: [Option<Rc<Node<K, V>>>; FANOUT] = std::array::from_fn(|_| None);
        for (slot, child) in entries {
            bitmap |= 1 << slot;
            children[slot as usize] = Some(child);
        }
        Self { hash_path, bitmap, children }
    }

    fn set(
        &self,
        slot: u32,
        child: Option<Rc<Node<K, V>>>,
        policy: TablePolicy,
    ) -> Option<Table<K, V>> {
        let bit = 1u32 << slot;
        let occupied = self.bitmap & bit != 0;
        if child.is_none() && !occupied {
            return Some(Table::Dense(self.clone()));
        }

        let bitmap = if child.is_some() {
            self.bitmap | bit
        } else {
            self.bitmap & !bit
        };
        if bitmap == 0 {
            return None;
        }

        let mut children = self.children.clone();
        children[slot as usize] = child;
        let table = Self {
            hash_path: self.hash_path,
            bitmap,
            children,
        };
        if policy.demote_at().is_some_and(|limit| table.len() < limit) {
            return Some(Table::Sparse(SparseTable::from_entries(
                table.hash_path,
                table.entries(),
            )));
        }
        Some(Table::Dense(table))
    }

    fn len(&self) -> usize {
        self.bitmap.count_ones() as usize
    }

    fn entries(&self) -> Vec<(u32, Rc<Node<K, V>>)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(slot, child)| {
                child.as_ref().map(|c| (slot as u32, Rc::clone(c)))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Manual trait impls — avoid false `K: Trait, V: Trait` bounds.
// Tables hold children behind `Rc`, so cloning never touches K/V data.
// ---------------------------------------------------------------------------

impl<K, V> Clone for SparseTable<K, V> {
    fn clone(&self) -> Self {
        Self {
            hash_path: self.hash_path,
            bitmap: self.bitmap,
            children: self.children.clone(),
        }
    }
}

impl<K, V> Clone for DenseTable<K, V> {
    fn clone(&self) -> Self {
        Self {
            hash_path: self.hash_path,
            bitmap: self.bitmap,
            children: self.children.clone(),
        }
    }
}

impl<K, V> Clone for Table<K, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Sparse(t) => Self::Sparse(t.clone()),
            Self::Dense(t) => Self::Dense(t.clone()),
        }
    }
}

impl<K, V> fmt::Debug for Table<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, hash_path, bitmap) = match self {
            Self::Sparse(t) => ("Sparse", t.hash_path, t.bitmap),
            Self::Dense(t) => ("Dense", t.hash_path, t.bitmap),
        };
        f.debug_struct(kind)
            .field("hash_path", &format_args!("{hash_path:#010x}"))
            .field("bitmap", &format_args!("{bitmap:#034b}"))
            .field("len", &self.len())
            .finish()
    }
}

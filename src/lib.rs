//! Persistent hash map based on a HAMT.
//!
//! A HAMT (Hash Array-Mapped Trie) maps keys to values through a trie of
//! fixed-fanout tables indexed by successive 5-bit slices of the key's
//! hashcode. Every mutating operation returns a **new** map; the previous
//! version stays valid and shares all untouched subtrees with the new one.
//!
//! # Key properties
//!
//! - **Persistent**: `insert`/`remove` take `&self` and return a new map
//! - **Structural sharing**: a write rebuilds one root-to-leaf path, at
//!   most `MAX_DEPTH + 2` tables; everything else is shared by reference
//! - **Two table representations**: bitmap-compressed sparse tables and
//!   fixed-array dense tables behind one contract, with an optional
//!   graded policy converting between them (see [`TablePolicy`])
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # References
//!
//! - Bagwell, 2001 — "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod iter;
mod leaf;
mod map;
mod node;
mod ops;
mod path;
mod table;

#[cfg(test)]
mod tests;

pub use iter::Iter;
pub use map::HamtMap;
pub use table::TablePolicy;

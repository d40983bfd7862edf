// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A random-access list backed by a rank-augmented red-black tree.
//!
//! [`TreeList`] stores a sequence in a balanced binary tree whose nodes
//! each count the elements of their subtree. That single augmentation
//! makes every positional operation logarithmic: getting, replacing,
//! inserting or removing the element at an arbitrary rank all run in
//! O(log n), which places the structure between `Vec` (constant-time
//! indexing, linear mid-sequence insertion) and a linked list
//! (constant-time insertion at a known node, linear indexing).
//!
//! Beyond the positional basics the list supports:
//!
//! - **O(n) bulk construction** from a known number of elements
//!   ([`From<Vec<A>>`][std::convert::From],
//!   [`FromIterator`][std::iter::FromIterator]), building
//!   a perfectly balanced tree without a single rotation;
//! - **O(log n) concatenation** ([`TreeList::concat`],
//!   [`TreeList::append`]), splicing two trees together where their
//!   black heights meet;
//! - a **bidirectional cursor** ([`TreeList::cursor`]) that walks the
//!   sequence in either direction and inserts, removes or replaces
//!   elements at its own position without searching from the root;
//! - a **splittable cursor** ([`TreeList::splitter`]) that divides its
//!   remaining elements into exactly-sized halves for
//!   divide-and-conquer traversal, and powers the `rayon` parallel
//!   iterators when the `rayon` feature is enabled.
//!
//! # Example
//!
//! ```
//! # #[macro_use] extern crate tree_list;
//! # use tree_list::TreeList;
//! # fn main() {
//! let mut list: TreeList<i32> = (1..=5).collect();
//! list.insert(2, 10);
//! assert_eq!(treelist![1, 2, 10, 3, 4, 5], list);
//! assert_eq!(10, list.remove(2));
//!
//! let tail: TreeList<i32> = (6..=8).collect();
//! list.append(tail);
//! assert_eq!(treelist![1, 2, 3, 4, 5, 6, 7, 8], list);
//! # }
//! ```
//!
//! # Feature flags
//!
//! - `serde`: serialize and deserialize lists as sequences.
//! - `rayon`: parallel iterators over lists.
//! - `proptest`: a `proptest` strategy generating lists.
//! - `quickcheck`: a `quickcheck::Arbitrary` implementation.
//! - `arbitrary`: an `arbitrary::Arbitrary` implementation.
//! - `debug`: expensive internal invariant checks, for fuzzing and
//!   debugging.

mod config;
mod nodes;

pub mod list;

#[cfg(any(test, feature = "proptest"))]
pub mod proptest;

#[cfg(feature = "arbitrary")]
mod arbitrary;
#[cfg(feature = "quickcheck")]
mod quickcheck;
#[cfg(feature = "serde")]
mod ser;

pub use crate::list::{CursorMut, IntoIter, Iter, IterMut, Splitter, TreeList};

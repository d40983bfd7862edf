// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Node-level cursors over the rank-augmented tree.
//!
//! [`NodeCursor`] is the stateful bidirectional cursor behind the public
//! list cursor: a root-to-node path plus a before/after flag and the
//! current rank, stepped incrementally through in-order neighbours and
//! able to insert and remove at its own position. [`NodeSplitter`] is
//! the forward-only, count-driven cursor behind the public splitter and
//! the parallel iterators; it can split itself into two exactly-sized,
//! order-preserving halves.
//!
//! Both types borrow nothing; the owning tree is passed into every
//! operation, which leaves the borrow flavour to the public wrappers.

use std::ptr;

use crate::nodes::rbtree::{max_depth, weight, Color, Link, Node, Path, Tree};

/// Moves a path one position forward in sequence order: descend into the
/// right subtree and then all the way left, or ascend until the node
/// left behind was a left child.
///
/// # Safety
///
/// The path must be a valid root-to-node path of a live tree, and the
/// node at its end must have an in-order successor.
pub(crate) unsafe fn step_forward<A>(path: &mut Path<A>) {
    let mut current = path.last();
    if !(*current).right.is_null() {
        current = (*current).right;
        path.push(current);
        while !(*current).left.is_null() {
            current = (*current).left;
            path.push(current);
        }
    } else {
        loop {
            path.pop();
            let parent = path.last();
            if (*parent).left == current {
                break;
            }
            current = parent;
        }
    }
}

/// Mirror image of [`step_forward`]: moves the path to the in-order
/// predecessor.
///
/// # Safety
///
/// As for [`step_forward`], with a predecessor in place of a successor.
pub(crate) unsafe fn step_backward<A>(path: &mut Path<A>) {
    let mut current = path.last();
    if !(*current).left.is_null() {
        current = (*current).left;
        path.push(current);
        while !(*current).right.is_null() {
            current = (*current).right;
            path.push(current);
        }
    } else {
        loop {
            path.pop();
            let parent = path.last();
            if (*parent).right == current {
                break;
            }
            current = parent;
        }
    }
}

/// Moves a path `delta` positions forward using subtree weights to pick
/// the direction, without restarting from the root. O(depth), not
/// O(delta).
///
/// # Safety
///
/// The path must be a valid root-to-node path of a live tree and the
/// target rank must exist in the tree.
pub(crate) unsafe fn advance<A>(path: &mut Path<A>, delta: usize) {
    // The running increment may go negative while ascending even though
    // the overall movement is forward.
    let mut increment = delta as isize;
    let mut current = path.last();
    while increment != 0 {
        if increment > 0 {
            if increment <= weight((*current).right) as isize {
                current = (*current).right;
                path.push(current);
                increment -= weight((*current).left) as isize + 1;
            } else {
                path.pop();
                let parent = path.last();
                if (*parent).right == current {
                    increment += weight((*current).left) as isize + 1;
                } else {
                    increment -= weight((*current).right) as isize + 1;
                }
                current = parent;
            }
        } else {
            // A negative increment never needs to ascend again.
            current = (*current).left;
            path.push(current);
            increment += weight((*current).right) as isize + 1;
        }
    }
}

/// A bidirectional cursor over the nodes of a tree.
///
/// The cursor conceptually sits in a gap of the sequence: before the
/// node at the end of its path, or after it, depending on the `before`
/// flag. An empty tree collapses to a single "before nothing" state.
/// A single-shot `armed` flag authorizes one position-anchored mutation
/// per successful step, matching the usual list-iterator contract.
pub(crate) struct NodeCursor<A> {
    path: Path<A>,
    before: bool,
    rank: usize,
    armed: bool,
}

impl<A> NodeCursor<A> {
    /// Creates a cursor positioned so that the next forward step yields
    /// the element of rank `at`; `at` equal to the length puts the
    /// cursor past the end.
    pub(crate) fn new(tree: &Tree<A>, at: usize) -> Self {
        debug_assert!(at <= tree.len());
        let mut path = Path::with_capacity(max_depth(tree.len()) + 1);
        let mut before = true;
        if !tree.is_empty() {
            let mut at = at;
            if at == tree.len() {
                before = false;
                at -= 1;
            }
            tree.find_path(at, &mut path);
        }
        Self::from_path(path, before)
    }

    /// Builds the cursor state from a path alone, deriving the rank by
    /// accumulating left-subtree weights along the descent.
    fn from_path(path: Path<A>, before: bool) -> Self {
        if path.is_empty() {
            return NodeCursor {
                path,
                before: true,
                rank: 0,
                armed: false,
            };
        }
        let rank = unsafe {
            let mut current = path.get(0);
            let mut rank = weight((*current).left);
            for i in 1..path.len() {
                let child = path.get(i);
                if (*current).left == child {
                    rank = rank + weight((*child).left) - (*child).weight;
                } else {
                    rank = rank + weight((*child).left) + 1;
                }
                current = child;
            }
            rank
        };
        NodeCursor {
            path,
            before,
            rank,
            armed: false,
        }
    }

    pub(crate) fn has_next(&self, tree: &Tree<A>) -> bool {
        !tree.is_empty() && (self.before || self.rank + 1 < tree.len())
    }

    pub(crate) fn has_prev(&self, tree: &Tree<A>) -> bool {
        !tree.is_empty() && (!self.before || self.rank > 0)
    }

    /// Rank of the element a forward step would yield; equals the tree
    /// length when the cursor is past the end.
    pub(crate) fn next_index(&self) -> usize {
        if self.before {
            self.rank
        } else {
            self.rank + 1
        }
    }

    /// Rank of the element a backward step would yield, or `None` at the
    /// front of the sequence.
    pub(crate) fn prev_index(&self) -> Option<usize> {
        if self.before {
            self.rank.checked_sub(1)
        } else {
            Some(self.rank)
        }
    }

    /// Steps forward, returning the node stepped over, or null when the
    /// cursor is already past the end.
    pub(crate) fn next(&mut self, tree: &Tree<A>) -> Link<A> {
        if !self.has_next(tree) {
            return ptr::null_mut();
        }
        unsafe {
            if self.before {
                self.before = false;
            } else {
                step_forward(&mut self.path);
                self.rank += 1;
            }
        }
        self.armed = true;
        self.path.last()
    }

    /// Steps backward, returning the node stepped over, or null when the
    /// cursor is already at the front.
    pub(crate) fn prev(&mut self, tree: &Tree<A>) -> Link<A> {
        if !self.has_prev(tree) {
            return ptr::null_mut();
        }
        unsafe {
            if !self.before {
                self.before = true;
            } else {
                step_backward(&mut self.path);
                self.rank -= 1;
            }
        }
        self.armed = true;
        self.path.last()
    }

    /// The node last stepped over, or null when no step authorized a
    /// mutation yet.
    pub(crate) fn current(&self) -> Link<A> {
        if self.armed {
            self.path.last()
        } else {
            ptr::null_mut()
        }
    }

    /// Removes the element last stepped over. Returns `None` when no
    /// preceding step authorizes the removal (single-shot: a second call
    /// without an intervening step also refuses).
    ///
    /// Removal restructures the tree arbitrarily, so the cursor
    /// repositions itself afterwards by searching for its own (possibly
    /// shifted) rank again.
    pub(crate) fn remove(&mut self, tree: &mut Tree<A>) -> Option<A> {
        if !self.armed {
            return None;
        }
        let value = tree.remove(&mut self.path);
        if tree.is_empty() {
            self.path.clear();
            self.rank = 0;
            self.before = true;
        } else {
            if self.rank == tree.len() {
                self.rank -= 1;
                self.before = false;
            } else if self.rank == 0 {
                self.before = true;
            } else if !self.before {
                self.rank -= 1;
            }
            tree.find_path(self.rank, &mut self.path);
        }
        self.armed = false;
        Some(value)
    }

    /// Inserts a new element into the gap the cursor occupies and leaves
    /// the cursor positioned just after it.
    pub(crate) fn insert(&mut self, tree: &mut Tree<A>, value: A) {
        unsafe {
            if self.path.is_empty() {
                let node = Node::new(Color::Black, value);
                tree.root = node;
                self.path.push(node);
                self.rank = 0;
                self.before = false;
            } else {
                let node = Node::new(Color::Red, value);
                // Starting from the cursor node, descend to the nil slot
                // adjacent to the cursor's gap.
                let mut parent = self.path.last();
                let attach_left;
                if self.before {
                    if (*parent).left.is_null() {
                        attach_left = true;
                    } else {
                        attach_left = false;
                        parent = (*parent).left;
                        self.path.push(parent);
                        while !(*parent).right.is_null() {
                            parent = (*parent).right;
                            self.path.push(parent);
                        }
                    }
                } else if (*parent).right.is_null() {
                    attach_left = false;
                } else {
                    attach_left = true;
                    parent = (*parent).right;
                    self.path.push(parent);
                    while !(*parent).left.is_null() {
                        parent = (*parent).left;
                        self.path.push(parent);
                    }
                }
                if attach_left {
                    (*parent).left = node;
                } else {
                    (*parent).right = node;
                }
                self.path.push(node);
                tree.after_insert(&self.path);
                if !self.before {
                    self.rank += 1;
                }
                self.before = false;
                // The fixup may have rotated parts of the old path away;
                // re-derive it from the new node's rank.
                tree.find_path(self.rank, &mut self.path);
            }
        }
        self.armed = false;
    }
}

/// A forward-only, count-driven cursor supporting balanced binary
/// splitting.
///
/// The path is positioned on the next node to yield; `remaining` is the
/// number of nodes this cursor will still serve. Splitting hands the
/// first half to a new cursor and advances this one past it, producing
/// two disjoint, contiguous halves with exactly known sizes.
pub(crate) struct NodeSplitter<A> {
    path: Path<A>,
    remaining: usize,
}

impl<A> NodeSplitter<A> {
    pub(crate) fn new(tree: &Tree<A>) -> Self {
        let mut path = Path::with_capacity(max_depth(tree.len()) + 1);
        if !tree.is_empty() {
            tree.find_path(0, &mut path);
        }
        NodeSplitter {
            path,
            remaining: tree.len(),
        }
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    /// Yields the current node and moves on, or returns null when
    /// exhausted.
    pub(crate) fn try_advance(&mut self) -> Link<A> {
        if self.remaining == 0 {
            return ptr::null_mut();
        }
        self.remaining -= 1;
        let node = self.path.last();
        if self.remaining > 0 {
            unsafe {
                advance(&mut self.path, 1);
            }
        }
        node
    }

    /// Splits off the first half, keeping the second for this cursor.
    /// Refuses when fewer than two elements remain.
    pub(crate) fn split(&mut self) -> Option<NodeSplitter<A>> {
        if self.remaining < 2 {
            return None;
        }
        Some(self.split_at(self.remaining / 2))
    }

    /// Splits off the first `prefix` elements into the returned cursor,
    /// keeping the rest. `prefix` may be 0 or the whole remainder, in
    /// which case one of the two cursors ends up empty.
    pub(crate) fn split_at(&mut self, prefix: usize) -> NodeSplitter<A> {
        debug_assert!(prefix <= self.remaining);
        if prefix == 0 {
            return NodeSplitter {
                path: Path::with_capacity(1),
                remaining: 0,
            };
        }
        if prefix == self.remaining {
            let whole = NodeSplitter {
                path: std::mem::replace(&mut self.path, Path::with_capacity(1)),
                remaining: self.remaining,
            };
            self.remaining = 0;
            return whole;
        }
        let mut suffix_path = self.path.clone();
        unsafe {
            advance(&mut suffix_path, prefix);
        }
        let head = NodeSplitter {
            path: std::mem::replace(&mut self.path, suffix_path),
            remaining: prefix,
        };
        self.remaining -= prefix;
        head
    }
}

impl<A> Clone for NodeSplitter<A> {
    fn clone(&self) -> Self {
        NodeSplitter {
            path: self.path.clone(),
            remaining: self.remaining,
        }
    }
}

/// A double-ended walk used by the borrowing iterators: one path per
/// end, with a shared element budget that keeps the two ends from
/// crossing.
pub(crate) struct NodeRange<A> {
    front: Path<A>,
    back: Path<A>,
    remaining: usize,
}

impl<A> NodeRange<A> {
    pub(crate) fn new(tree: &Tree<A>) -> Self {
        let mut front = Path::with_capacity(max_depth(tree.len()) + 1);
        let mut back = Path::with_capacity(max_depth(tree.len()) + 1);
        if !tree.is_empty() {
            tree.find_path(0, &mut front);
            tree.find_path(tree.len() - 1, &mut back);
        }
        NodeRange {
            front,
            back,
            remaining: tree.len(),
        }
    }

    /// Builds the range covering exactly the elements a splitter has
    /// left to serve.
    #[cfg(feature = "rayon")]
    pub(crate) fn from_splitter(splitter: NodeSplitter<A>) -> Self {
        let NodeSplitter { path, remaining } = splitter;
        let mut back = path.clone();
        if remaining > 1 {
            unsafe {
                advance(&mut back, remaining - 1);
            }
        }
        NodeRange {
            front: path,
            back,
            remaining,
        }
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    pub(crate) fn next(&mut self) -> Link<A> {
        if self.remaining == 0 {
            return ptr::null_mut();
        }
        self.remaining -= 1;
        let node = self.front.last();
        if self.remaining > 0 {
            unsafe {
                step_forward(&mut self.front);
            }
        }
        node
    }

    pub(crate) fn next_back(&mut self) -> Link<A> {
        if self.remaining == 0 {
            return ptr::null_mut();
        }
        self.remaining -= 1;
        let node = self.back.last();
        if self.remaining > 0 {
            unsafe {
                step_backward(&mut self.back);
            }
        }
        node
    }
}

impl<A> Clone for NodeRange<A> {
    fn clone(&self) -> Self {
        NodeRange {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

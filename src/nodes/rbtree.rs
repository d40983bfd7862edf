// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The rank-augmented red-black tree engine.
//!
//! Every node stores the size of its subtree alongside the usual colour
//! bit, which turns the tree into an order-statistics structure: the
//! element with a given rank is located by comparing the rank against
//! left-subtree weights on the way down. Nodes carry no parent pointers;
//! every mutating operation instead threads an explicit root-to-node
//! [`Path`] through the tree, which is also what the cursor types build
//! on to avoid re-searching from the root.
//!
//! The null pointer doubles as the shared "nil" leaf: it is permanently
//! black, has weight zero, and is only ever compared against, never
//! dereferenced.

use std::mem;
use std::ptr;

use crate::config::MAX_LEN;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Color {
    Red,
    Black,
}

pub(crate) type Link<A> = *mut Node<A>;

pub(crate) struct Node<A> {
    pub(crate) left: Link<A>,
    pub(crate) right: Link<A>,
    /// Size of the subtree rooted at this node, this node included.
    pub(crate) weight: usize,
    pub(crate) color: Color,
    pub(crate) value: A,
}

impl<A> Node<A> {
    /// Allocates a fresh leaf node of weight 1 with nil children.
    pub(crate) fn new(color: Color, value: A) -> Link<A> {
        Box::into_raw(Box::new(Node {
            left: ptr::null_mut(),
            right: ptr::null_mut(),
            weight: 1,
            color,
            value,
        }))
    }
}

/// Subtree weight of a possibly-nil link.
///
/// # Safety
///
/// `node` must be null or point to a live node.
#[inline]
pub(crate) unsafe fn weight<A>(node: Link<A>) -> usize {
    if node.is_null() {
        0
    } else {
        (*node).weight
    }
}

/// # Safety
///
/// `node` must be null or point to a live node.
#[inline]
pub(crate) unsafe fn is_red<A>(node: Link<A>) -> bool {
    !node.is_null() && (*node).color == Color::Red
}

/// # Safety
///
/// `node` must be null or point to a live node.
#[inline]
pub(crate) unsafe fn is_black<A>(node: Link<A>) -> bool {
    node.is_null() || (*node).color == Color::Black
}

/// An estimate of the deepest possible node path for a tree of `len`
/// elements. May overestimate by one or two levels.
pub(crate) fn max_depth(len: usize) -> usize {
    2 * (usize::BITS - len.leading_zeros()) as usize
}

/// A growable root-to-node stack of node pointers.
///
/// Each entry is a child of the previous one. The buffer is transient
/// and reused across operations; entries beyond the current length may
/// be stale and must never be dereferenced.
pub(crate) struct Path<A> {
    stack: Vec<Link<A>>,
}

impl<A> Path<A> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Path {
            stack: Vec::with_capacity(capacity.max(1)),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.stack.clear();
    }

    #[inline]
    pub(crate) fn push(&mut self, node: Link<A>) {
        self.stack.push(node);
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        self.stack.pop();
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Link<A> {
        self.stack[index]
    }

    #[inline]
    pub(crate) fn set(&mut self, index: usize, node: Link<A>) {
        self.stack[index] = node;
    }

    /// The entry just above `index`, or null when `index` is the root.
    #[inline]
    pub(crate) fn above(&self, index: usize) -> Link<A> {
        if index == 0 {
            ptr::null_mut()
        } else {
            self.stack[index - 1]
        }
    }

    #[inline]
    pub(crate) fn last(&self) -> Link<A> {
        self.stack[self.stack.len() - 1]
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.stack.truncate(len);
    }
}

impl<A> Clone for Path<A> {
    fn clone(&self) -> Self {
        Path {
            stack: self.stack.clone(),
        }
    }
}

/// The tree itself: just a root link. An empty tree has a null root.
pub(crate) struct Tree<A> {
    pub(crate) root: Link<A>,
}

impl<A> Tree<A> {
    pub(crate) fn new() -> Self {
        Tree {
            root: ptr::null_mut(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        unsafe { weight(self.root) }
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    /// Drops every node in the tree, leaving it empty.
    pub(crate) fn clear(&mut self) {
        unsafe {
            drop_subtree(mem::replace(&mut self.root, ptr::null_mut()));
        }
    }

    /// Finds the node with the given rank.
    pub(crate) fn find(&self, rank: usize) -> Link<A> {
        debug_assert!(rank < self.len());
        unsafe {
            let mut rank = rank;
            let mut current = self.root;
            loop {
                let left_weight = weight((*current).left);
                if rank == left_weight {
                    return current;
                } else if rank < left_weight {
                    current = (*current).left;
                } else {
                    rank -= left_weight + 1;
                    current = (*current).right;
                }
            }
        }
    }

    /// Finds the node with the given rank, recording the full descent
    /// path (target included) into `path`.
    pub(crate) fn find_path(&self, rank: usize, path: &mut Path<A>) -> Link<A> {
        debug_assert!(rank < self.len());
        path.clear();
        unsafe {
            let mut rank = rank;
            let mut current = self.root;
            loop {
                path.push(current);
                let left_weight = weight((*current).left);
                if rank == left_weight {
                    return current;
                } else if rank < left_weight {
                    current = (*current).left;
                } else {
                    rank -= left_weight + 1;
                    current = (*current).right;
                }
            }
        }
    }

    /// Inserts `value` so that it ends up with rank `rank`, leaving the
    /// path to the new node in `path`. Ranks equal to the current length
    /// append.
    pub(crate) fn insert_at(&mut self, rank: usize, value: A, path: &mut Path<A>) {
        debug_assert!(rank <= self.len());
        debug_assert!(self.len() < MAX_LEN);
        unsafe {
            if self.root.is_null() {
                self.root = Node::new(Color::Black, value);
                path.clear();
                path.push(self.root);
                return;
            }

            let node = Node::new(Color::Red, value);
            path.clear();
            let mut rank = rank;
            let mut current = self.root;
            // Descend to the nil slot the new node replaces, wiring it in
            // as soon as the slot's parent is known.
            while !current.is_null() {
                path.push(current);
                let left = (*current).left;
                let left_weight = weight(left);
                if rank <= left_weight {
                    if left.is_null() {
                        (*current).left = node;
                    }
                    current = left;
                } else {
                    rank -= left_weight + 1;
                    let right = (*current).right;
                    if right.is_null() {
                        (*current).right = node;
                    }
                    current = right;
                }
            }
            path.push(node);
            self.after_insert(path);
        }
    }

    /// Weight bookkeeping and rebalancing after a new red leaf node has
    /// been spliced in. The last path entry must be the new node; every
    /// ancestor on the path gains one unit of weight.
    pub(crate) fn after_insert(&mut self, path: &Path<A>) {
        debug_assert!(path.len() > 1);
        unsafe {
            for i in 0..path.len() - 1 {
                let node = path.get(i);
                (*node).weight += 1;
            }
        }
        self.insert_fixup(path);
    }

    /// Restores the red-black invariants after an insertion. The path
    /// must lead from the root to the inserted (red) node.
    ///
    /// Rotations performed here may leave the tail of the path stale;
    /// callers that keep using the path re-derive it by rank afterwards.
    pub(crate) fn insert_fixup(&mut self, path: &Path<A>) {
        unsafe {
            let mut current_index = path.len() - 1;
            while current_index > 0 && is_red(path.get(current_index - 1)) {
                let mut parent = path.get(current_index - 1);
                // The grandparent exists because the root is black.
                let grandparent = path.get(current_index - 2);
                let current = path.get(current_index);
                if (*grandparent).left == parent {
                    let uncle = (*grandparent).right;
                    if is_red(uncle) {
                        (*parent).color = Color::Black;
                        (*uncle).color = Color::Black;
                        (*grandparent).color = Color::Red;
                        current_index -= 2;
                    } else {
                        if (*parent).right == current {
                            self.rotate_left(parent, grandparent);
                            parent = current;
                        }
                        (*parent).color = Color::Black;
                        (*grandparent).color = Color::Red;
                        self.rotate_right(grandparent, path.above(current_index - 2));
                        break;
                    }
                } else {
                    // Symmetric case.
                    let uncle = (*grandparent).left;
                    if is_red(uncle) {
                        (*parent).color = Color::Black;
                        (*uncle).color = Color::Black;
                        (*grandparent).color = Color::Red;
                        current_index -= 2;
                    } else {
                        if (*parent).left == current {
                            self.rotate_right(parent, grandparent);
                            parent = current;
                        }
                        (*parent).color = Color::Black;
                        (*grandparent).color = Color::Red;
                        self.rotate_left(grandparent, path.above(current_index - 2));
                        break;
                    }
                }
            }
            (*self.root).color = Color::Black;
        }
    }

    /// Removes the node at the end of `path` and returns its value.
    ///
    /// A node with two real children is not spliced out directly; its
    /// value is swapped with the in-order successor's and the successor
    /// is removed instead. On return the path ends at the child promoted
    /// into the removed slot (possibly nil), or holds just that child if
    /// the root was removed.
    pub(crate) fn remove(&mut self, path: &mut Path<A>) -> A {
        unsafe {
            let mut node = path.last();

            if !(*node).left.is_null() && !(*node).right.is_null() {
                // Swap with the in-order successor and remove that one.
                let mut current = (*node).right;
                path.push(current);
                while !(*current).left.is_null() {
                    current = (*current).left;
                    path.push(current);
                }
                ptr::swap(&mut (*node).value, &mut (*current).value);
                node = current;
            }

            for i in 0..path.len() {
                let current = path.get(i);
                (*current).weight -= 1;
            }

            let mut child = (*node).left;
            if child.is_null() {
                child = (*node).right;
            }

            if node == self.root {
                self.root = child;
                path.clear();
            } else {
                path.pop();
                let parent = path.last();
                if (*parent).left == node {
                    (*parent).left = child;
                } else {
                    (*parent).right = child;
                }
            }
            path.push(child);

            let removed_black = (*node).color == Color::Black;
            let boxed = Box::from_raw(node);
            let value = boxed.value;

            if !self.root.is_null() && removed_black {
                self.remove_fixup(path);
            }
            value
        }
    }

    /// Restores the red-black invariants after removing a black node.
    /// The path leads to the child promoted into the removed position
    /// (possibly nil). Entries below the working level may go stale;
    /// the fixup only ever ascends.
    fn remove_fixup(&mut self, path: &mut Path<A>) {
        unsafe {
            let mut index = path.len() - 1;
            while index != 0 && is_black(path.get(index)) {
                let current = path.get(index);
                let parent = path.get(index - 1);
                if (*parent).left == current {
                    let mut sibling = (*parent).right;
                    if is_red(sibling) {
                        (*sibling).color = Color::Black;
                        (*parent).color = Color::Red;
                        self.rotate_left(parent, path.above(index - 1));
                        // The former sibling is now the parent's parent;
                        // splice it into the path above the current node.
                        if index == path.len() - 1 {
                            path.push(current);
                        } else {
                            path.set(index + 1, current);
                        }
                        path.set(index, parent);
                        path.set(index - 1, sibling);
                        index += 1;
                        sibling = (*parent).right;
                    }
                    if is_black((*sibling).left) && is_black((*sibling).right) {
                        (*sibling).color = Color::Red;
                        index -= 1;
                    } else {
                        if is_black((*sibling).right) {
                            (*(*sibling).left).color = Color::Black;
                            (*sibling).color = Color::Red;
                            self.rotate_right(sibling, parent);
                            sibling = (*parent).right;
                        }
                        (*sibling).color = (*parent).color;
                        (*parent).color = Color::Black;
                        (*(*sibling).right).color = Color::Black;
                        self.rotate_left(parent, path.above(index - 1));
                        index = 0;
                    }
                } else {
                    // Symmetric case.
                    let mut sibling = (*parent).left;
                    if is_red(sibling) {
                        (*sibling).color = Color::Black;
                        (*parent).color = Color::Red;
                        self.rotate_right(parent, path.above(index - 1));
                        if index == path.len() - 1 {
                            path.push(current);
                        } else {
                            path.set(index + 1, current);
                        }
                        path.set(index, parent);
                        path.set(index - 1, sibling);
                        index += 1;
                        sibling = (*parent).left;
                    }
                    if is_black((*sibling).right) && is_black((*sibling).left) {
                        (*sibling).color = Color::Red;
                        index -= 1;
                    } else {
                        if is_black((*sibling).left) {
                            (*(*sibling).right).color = Color::Black;
                            (*sibling).color = Color::Red;
                            self.rotate_left(sibling, parent);
                            sibling = (*parent).left;
                        }
                        (*sibling).color = (*parent).color;
                        (*parent).color = Color::Black;
                        (*(*sibling).left).color = Color::Black;
                        self.rotate_right(parent, path.above(index - 1));
                        index = 0;
                    }
                }
            }
            let current = path.get(index);
            debug_assert!(!current.is_null());
            (*current).color = Color::Black;
        }
    }

    /// Rotates `node` left around its right child. `parent` is the
    /// node's parent, or null when `node` is the root. Only the two
    /// nodes whose subtrees changed get their weights recomputed.
    fn rotate_left(&mut self, node: Link<A>, parent: Link<A>) {
        unsafe {
            let pivot = (*node).right;
            (*node).right = (*pivot).left;
            (*pivot).left = node;
            if parent.is_null() {
                self.root = pivot;
            } else if (*parent).left == node {
                (*parent).left = pivot;
            } else {
                (*parent).right = pivot;
            }
            (*pivot).weight = (*node).weight;
            (*node).weight = 1 + weight((*node).left) + weight((*node).right);
        }
    }

    /// Mirror image of [`rotate_left`](Tree::rotate_left).
    fn rotate_right(&mut self, node: Link<A>, parent: Link<A>) {
        unsafe {
            let pivot = (*node).left;
            (*node).left = (*pivot).right;
            (*pivot).right = node;
            if parent.is_null() {
                self.root = pivot;
            } else if (*parent).left == node {
                (*parent).left = pivot;
            } else {
                (*parent).right = pivot;
            }
            (*pivot).weight = (*node).weight;
            (*node).weight = 1 + weight((*node).left) + weight((*node).right);
        }
    }

    /// Descends to the rightmost (or leftmost) node, recording the spine
    /// into `path` and counting the tree's black height along the way.
    /// The count includes the nil leaf ending the spine, so an empty
    /// tree measures 1 and a single node measures 2.
    fn black_height_spine(&self, path: &mut Path<A>, rightmost: bool) -> usize {
        path.clear();
        unsafe {
            let mut current = self.root;
            let mut black_height = 1;
            while !current.is_null() {
                path.push(current);
                current = if rightmost {
                    (*current).right
                } else {
                    (*current).left
                };
                if is_black(current) {
                    black_height += 1;
                }
            }
            black_height
        }
    }

    /// Concatenates two trees in O(log(n1 + n2)) time, consuming both.
    /// The sequence order of the result is `left`'s elements followed by
    /// `right`'s.
    ///
    /// One boundary element is extracted from the side with the smaller
    /// or equal black height and becomes the splice node: the new black
    /// root when the heights match, or a red node spliced into the
    /// taller tree's spine where the subtree black heights meet,
    /// followed by the ordinary insertion fixup.
    pub(crate) fn merge(mut left: Tree<A>, mut right: Tree<A>) -> Tree<A> {
        if right.is_empty() {
            return Tree {
                root: mem::replace(&mut left.root, ptr::null_mut()),
            };
        }
        if left.is_empty() {
            return Tree {
                root: mem::replace(&mut right.root, ptr::null_mut()),
            };
        }

        let total = left.len() + right.len();
        assert!(
            total <= MAX_LEN,
            "the resulting list size limit of {} would be exceeded",
            MAX_LEN
        );

        let mut left_path = Path::with_capacity(max_depth(left.len()) + 1);
        let mut right_path = Path::with_capacity(max_depth(right.len()) + 1);
        let left_height = left.black_height_spine(&mut left_path, true);
        let mut right_height = right.black_height_spine(&mut right_path, false);

        unsafe {
            if left_height >= right_height {
                // The right tree gets appended below the left tree's
                // right spine; its leftmost element becomes the splice
                // node.
                let removed_black = is_black(right_path.last());
                let value = right.remove(&mut right_path);
                if removed_black {
                    // Removing a black boundary node can lower the black
                    // height of the donor tree.
                    right_height = right.black_height_spine(&mut right_path, false);
                }
                let node = Node::new(Color::Red, value);

                if left_height == right_height {
                    (*node).color = Color::Black;
                    (*node).left = left.root;
                    (*node).right = right.root;
                    (*node).weight = total;
                    left.root = ptr::null_mut();
                    right.root = ptr::null_mut();
                    return Tree { root: node };
                }

                // Find the lowest right-spine node whose subtree has the
                // same black height as the remaining right tree. The
                // walk cannot reach the root because the left tree is
                // strictly taller.
                let mut cursor = left_path.len() - 1;
                let mut remaining = right_height;
                while remaining > 1 {
                    if is_black(left_path.get(cursor)) {
                        remaining -= 1;
                    }
                    cursor -= 1;
                }
                let cursor = cursor + 1;

                let child = if cursor < left_path.len() {
                    left_path.get(cursor)
                } else {
                    // The extraction emptied the right tree; the splice
                    // degenerates to appending one element below the
                    // rightmost node.
                    ptr::null_mut()
                };
                (*node).left = child;
                (*node).right = right.root;
                let parent = left_path.get(cursor - 1);
                (*parent).right = node;
                if cursor < left_path.len() {
                    left_path.set(cursor, node);
                    left_path.truncate(cursor + 1);
                } else {
                    left_path.push(node);
                }
                for i in (0..=cursor).rev() {
                    let current = left_path.get(i);
                    (*current).weight =
                        1 + weight((*current).left) + weight((*current).right);
                }
                // The only possible violation is the new red node having
                // a red parent, which the insertion fixup handles.
                left.insert_fixup(&left_path);
                right.root = ptr::null_mut();
                Tree {
                    root: mem::replace(&mut left.root, ptr::null_mut()),
                }
            } else {
                // Symmetric: the left tree gets prepended below the
                // right tree's left spine. Equal heights are impossible
                // here, even after the boundary extraction.
                let removed_black = is_black(left_path.last());
                let value = left.remove(&mut left_path);
                let left_height = if removed_black {
                    left.black_height_spine(&mut left_path, true)
                } else {
                    left_height
                };
                let node = Node::new(Color::Red, value);

                let mut cursor = right_path.len() - 1;
                let mut remaining = left_height;
                while remaining > 1 {
                    if is_black(right_path.get(cursor)) {
                        remaining -= 1;
                    }
                    cursor -= 1;
                }
                let cursor = cursor + 1;

                let child = if cursor < right_path.len() {
                    right_path.get(cursor)
                } else {
                    ptr::null_mut()
                };
                (*node).left = left.root;
                (*node).right = child;
                let parent = right_path.get(cursor - 1);
                (*parent).left = node;
                if cursor < right_path.len() {
                    right_path.set(cursor, node);
                    right_path.truncate(cursor + 1);
                } else {
                    right_path.push(node);
                }
                for i in (0..=cursor).rev() {
                    let current = right_path.get(i);
                    (*current).weight =
                        1 + weight((*current).left) + weight((*current).right);
                }
                right.insert_fixup(&right_path);
                left.root = ptr::null_mut();
                Tree {
                    root: mem::replace(&mut right.root, ptr::null_mut()),
                }
            }
        }
    }

    /// Builds a perfectly weight-balanced tree out of exactly `len`
    /// elements drawn from `values`, in O(len) time and without a single
    /// rotation. Nodes are black except where the deepest level needs
    /// red filler to keep all leaves within one level of each other.
    pub(crate) fn build<I>(len: usize, values: &mut I) -> Tree<A>
    where
        I: Iterator<Item = A>,
    {
        debug_assert!(len <= MAX_LEN);
        if len == 0 {
            return Tree::new();
        }
        let black_height = if len == 1 {
            1
        } else {
            (usize::BITS - 1 - len.leading_zeros()) as usize
        };
        Tree {
            root: unsafe { build_subtree(values, len, black_height) },
        }
    }
}

impl<A> Drop for Tree<A> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Recursive worker behind [`Tree::build`]. The recursion depth equals
/// the target black height, at most log2 of the capacity limit.
unsafe fn build_subtree<A, I>(values: &mut I, length: usize, black_height: usize) -> Link<A>
where
    I: Iterator<Item = A>,
{
    let produce = |values: &mut I| Node::new(Color::Black, values.next().unwrap());

    let root;
    if black_height == 1 {
        if length == 1 {
            root = produce(values);
        } else if length == 2 {
            let left = produce(values);
            (*left).color = Color::Red;
            root = produce(values);
            (*root).left = left;
        } else {
            let left = produce(values);
            (*left).color = Color::Red;
            root = produce(values);
            let right = produce(values);
            (*right).color = Color::Red;
            (*root).left = left;
            (*root).right = right;
        }
    } else {
        let left = build_subtree(values, length / 2, black_height - 1);
        root = produce(values);
        let right = build_subtree(values, length - 1 - length / 2, black_height - 1);
        (*root).left = left;
        (*root).right = right;
    }
    (*root).weight = length;
    root
}

/// Frees a whole subtree. The recursion depth is bounded by the tree
/// depth, at most `max_depth(MAX_LEN)`.
unsafe fn drop_subtree<A>(node: Link<A>) {
    if !node.is_null() {
        drop_subtree((*node).left);
        drop_subtree((*node).right);
        drop(Box::from_raw(node));
    }
}

#[cfg(any(test, feature = "debug"))]
impl<A> Tree<A> {
    /// Walks the whole tree verifying every red-black and weight
    /// invariant, panicking on the first violation.
    pub(crate) fn check_invariants(&self) {
        unsafe {
            if self.root.is_null() {
                return;
            }
            assert!(
                is_black(self.root),
                "red-black violation: the root is not black"
            );
            check_subtree(self.root);
        }
    }
}

#[cfg(any(test, feature = "debug"))]
unsafe fn check_subtree<A>(node: Link<A>) -> usize {
    let left = (*node).left;
    let right = (*node).right;
    let left_height = if left.is_null() { 0 } else { check_subtree(left) };
    let right_height = if right.is_null() {
        0
    } else {
        check_subtree(right)
    };
    assert_eq!(
        (*node).weight,
        1 + weight(left) + weight(right),
        "weight violation: node weight does not match its children"
    );
    assert_eq!(
        left_height, right_height,
        "red-black violation: unequal black heights"
    );
    if is_red(node) {
        assert!(
            is_black(left) && is_black(right),
            "red-black violation: a red node has a red child"
        );
    }
    left_height + if is_black(node) { 1 } else { 0 }
}

#[cfg(test)]
mod test {
    use super::*;

    fn collect_in_order<A: Clone>(tree: &Tree<A>) -> Vec<A> {
        fn walk<A: Clone>(node: Link<A>, out: &mut Vec<A>) {
            unsafe {
                if !node.is_null() {
                    walk((*node).left, out);
                    out.push((*node).value.clone());
                    walk((*node).right, out);
                }
            }
        }
        let mut out = Vec::with_capacity(tree.len());
        walk(tree.root, &mut out);
        out
    }

    fn tree_of(len: usize) -> Tree<usize> {
        Tree::build(len, &mut (0..len))
    }

    #[test]
    fn build_produces_valid_trees() {
        for len in 0..=200 {
            let tree = tree_of(len);
            tree.check_invariants();
            assert_eq!(tree.len(), len);
            assert_eq!(collect_in_order(&tree), (0..len).collect::<Vec<_>>());
        }
    }

    #[test]
    fn insert_at_every_rank() {
        let mut tree = Tree::new();
        let mut path = Path::with_capacity(max_depth(64) + 1);
        let mut model = Vec::new();
        for i in 0..64 {
            let rank = i / 2;
            tree.insert_at(rank, i, &mut path);
            model.insert(rank, i);
            tree.check_invariants();
        }
        assert_eq!(collect_in_order(&tree), model);
    }

    #[test]
    fn remove_every_rank_down_to_empty() {
        let mut tree = tree_of(33);
        let mut model: Vec<usize> = (0..33).collect();
        let mut path = Path::with_capacity(max_depth(33) + 1);
        let mut rank = 0;
        while !tree.is_empty() {
            let at = rank % tree.len();
            tree.find_path(at, &mut path);
            let value = tree.remove(&mut path);
            assert_eq!(value, model.remove(at));
            tree.check_invariants();
            rank += 7;
        }
        assert!(model.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn find_matches_in_order_rank() {
        let tree = tree_of(100);
        for rank in 0..100 {
            unsafe {
                assert_eq!((*tree.find(rank)).value, rank);
            }
        }
    }

    #[test]
    fn merge_plain() {
        let merged = Tree::merge(tree_of(3), Tree::build(2, &mut (3..5)));
        merged.check_invariants();
        assert_eq!(collect_in_order(&merged), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn merge_with_empty_sides() {
        let merged = Tree::merge(Tree::new(), tree_of(5));
        merged.check_invariants();
        assert_eq!(collect_in_order(&merged), (0..5).collect::<Vec<_>>());

        let merged = Tree::merge(tree_of(5), Tree::new());
        merged.check_invariants();
        assert_eq!(collect_in_order(&merged), (0..5).collect::<Vec<_>>());

        let merged = Tree::<usize>::merge(Tree::new(), Tree::new());
        assert!(merged.is_empty());
    }

    #[test]
    fn merge_single_element_sides() {
        // A single-node donor loses a whole black level when its only
        // node is extracted; the merge has to notice.
        let merged = Tree::merge(tree_of(1), Tree::build(1, &mut (1..2)));
        merged.check_invariants();
        assert_eq!(collect_in_order(&merged), vec![0, 1]);

        for left_len in [1, 2, 3, 7, 20, 64, 100] {
            let left = tree_of(left_len);
            let right = Tree::build(1, &mut (left_len..left_len + 1));
            let merged = Tree::merge(left, right);
            merged.check_invariants();
            assert_eq!(
                collect_in_order(&merged),
                (0..left_len + 1).collect::<Vec<_>>()
            );

            let left = Tree::build(1, &mut (0..1));
            let right = Tree::build(left_len, &mut (1..left_len + 1));
            let merged = Tree::merge(left, right);
            merged.check_invariants();
            assert_eq!(
                collect_in_order(&merged),
                (0..left_len + 1).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn merge_all_small_size_pairs() {
        for left_len in 0..=24 {
            for right_len in 0..=24 {
                let left = tree_of(left_len);
                let right = Tree::build(right_len, &mut (left_len..left_len + right_len));
                let merged = Tree::merge(left, right);
                merged.check_invariants();
                assert_eq!(merged.len(), left_len + right_len);
                assert_eq!(
                    collect_in_order(&merged),
                    (0..left_len + right_len).collect::<Vec<_>>()
                );
            }
        }
    }

    #[test]
    fn merge_consumes_inputs() {
        // Ownership makes this mostly a drop-safety test: both inputs
        // must end up empty so nothing is freed twice.
        let left = tree_of(10);
        let right = Tree::build(10, &mut (10..20));
        let merged = Tree::merge(left, right);
        assert_eq!(merged.len(), 20);
    }
}

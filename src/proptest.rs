// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Proptest strategies.
//!
//! These are only available when using the `proptest` feature flag.

use crate::TreeList;
use ::proptest::collection::vec;
use ::proptest::strategy::{BoxedStrategy, Strategy};
use std::ops::Range;

/// A strategy for generating a [`TreeList`] of a certain size.
///
/// # Examples
///
/// ```rust,ignore
/// proptest! {
///     #[test]
///     fn proptest_works(ref l in tree_list(".*", 10..100)) {
///         assert!(l.len() < 100);
///         assert!(l.len() >= 10);
///     }
/// }
/// ```
pub fn tree_list<A: Strategy + 'static>(
    element: A,
    size: Range<usize>,
) -> BoxedStrategy<TreeList<A::Value>> {
    vec(element, size).prop_map(TreeList::from).boxed()
}

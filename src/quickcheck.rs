// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::TreeList;
use ::quickcheck::{Arbitrary, Gen};
use std::iter::FromIterator;

impl<A: Arbitrary + Clone> Arbitrary for TreeList<A> {
    fn arbitrary(g: &mut Gen) -> Self {
        TreeList::from_iter(Vec::<A>::arbitrary(g))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let vec: Vec<A> = self.iter().cloned().collect();
        Box::new(vec.shrink().map(TreeList::from))
    }
}

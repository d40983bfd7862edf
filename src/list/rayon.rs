// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parallel iterators.
//!
//! These are only available when using the `rayon` feature flag.

use super::*;
use crate::nodes::cursor::NodeSplitter;
use ::rayon::iter::plumbing::{bridge, Consumer, Producer, ProducerCallback, UnindexedConsumer};
use ::rayon::iter::{
    IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator, ParallelIterator,
};

impl<'a, A> IntoParallelRefIterator<'a> for TreeList<A>
where
    A: Sync + 'a,
{
    type Item = &'a A;
    type Iter = ParIter<'a, A>;

    fn par_iter(&'a self) -> Self::Iter {
        ParIter {
            splitter: self.splitter(),
        }
    }
}

impl<'a, A> IntoParallelRefMutIterator<'a> for TreeList<A>
where
    A: Send + Sync + 'a,
{
    type Item = &'a mut A;
    type Iter = ParIterMut<'a, A>;

    fn par_iter_mut(&'a mut self) -> Self::Iter {
        ParIterMut {
            splitter: SplitterMut {
                inner: NodeSplitter::new(&self.tree),
                marker: PhantomData,
            },
        }
    }
}

/// A parallel iterator for [`TreeList`][TreeList].
///
/// [TreeList]: ../struct.TreeList.html
pub struct ParIter<'a, A> {
    splitter: Splitter<'a, A>,
}

impl<'a, A> ParallelIterator for ParIter<'a, A>
where
    A: Sync + 'a,
{
    type Item = &'a A;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge(self, consumer)
    }
}

impl<'a, A> IndexedParallelIterator for ParIter<'a, A>
where
    A: Sync + 'a,
{
    fn drive<C>(self, consumer: C) -> C::Result
    where
        C: Consumer<Self::Item>,
    {
        bridge(self, consumer)
    }

    fn len(&self) -> usize {
        self.splitter.len()
    }

    fn with_producer<CB>(self, callback: CB) -> CB::Output
    where
        CB: ProducerCallback<Self::Item>,
    {
        callback.callback(SplitterProducer {
            splitter: self.splitter,
        })
    }
}

/// A mutable parallel iterator for [`TreeList`][TreeList].
///
/// [TreeList]: ../struct.TreeList.html
pub struct ParIterMut<'a, A> {
    splitter: SplitterMut<'a, A>,
}

impl<'a, A> ParallelIterator for ParIterMut<'a, A>
where
    A: Send + Sync + 'a,
{
    type Item = &'a mut A;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge(self, consumer)
    }
}

impl<'a, A> IndexedParallelIterator for ParIterMut<'a, A>
where
    A: Send + Sync + 'a,
{
    fn drive<C>(self, consumer: C) -> C::Result
    where
        C: Consumer<Self::Item>,
    {
        bridge(self, consumer)
    }

    fn len(&self) -> usize {
        self.splitter.inner.remaining()
    }

    fn with_producer<CB>(self, callback: CB) -> CB::Output
    where
        CB: ProducerCallback<Self::Item>,
    {
        callback.callback(SplitterMutProducer {
            splitter: self.splitter,
        })
    }
}

struct SplitterProducer<'a, A> {
    splitter: Splitter<'a, A>,
}

impl<'a, A> Producer for SplitterProducer<'a, A>
where
    A: Sync + 'a,
{
    type Item = &'a A;
    type IntoIter = Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.splitter.into_range_iter()
    }

    fn split_at(mut self, index: usize) -> (Self, Self) {
        let head = self.splitter.split_at(index);
        (SplitterProducer { splitter: head }, self)
    }
}

/// The mutable counterpart of [`Splitter`], only needed to drive the
/// parallel iterator plumbing.
struct SplitterMut<'a, A> {
    inner: NodeSplitter<A>,
    marker: PhantomData<&'a mut TreeList<A>>,
}

unsafe impl<'a, A: Send + Sync> Send for SplitterMut<'a, A> {}

struct SplitterMutProducer<'a, A> {
    splitter: SplitterMut<'a, A>,
}

impl<'a, A> Producer for SplitterMutProducer<'a, A>
where
    A: Send + Sync + 'a,
{
    type Item = &'a mut A;
    type IntoIter = IterMut<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        IterMut {
            range: NodeRange::from_splitter(self.splitter.inner),
            marker: PhantomData,
        }
    }

    fn split_at(mut self, index: usize) -> (Self, Self) {
        let head = self.splitter.inner.split_at(index);
        (
            SplitterMutProducer {
                splitter: SplitterMut {
                    inner: head,
                    marker: PhantomData,
                },
            },
            self,
        )
    }
}

#[cfg(test)]
mod test {
    use super::super::*;
    use crate::proptest::tree_list;
    use ::proptest::num::i32;
    use ::proptest::proptest;
    use ::rayon::iter::{IntoParallelRefIterator, IntoParallelRefMutIterator, ParallelIterator};

    proptest! {
        #[test]
        fn par_iter(ref mut input in tree_list(i32::ANY, 0..10000)) {
            assert_eq!(input.iter().max(), input.par_iter().max())
        }

        #[test]
        fn par_mut_iter(ref mut input in tree_list(i32::ANY, 0..10000)) {
            let mut list = input.clone();
            list.par_iter_mut().for_each(|i| *i = i.overflowing_add(1).0);
            let expected: TreeList<i32> =
                input.iter().map(|i| i.overflowing_add(1).0).collect();
            assert_eq!(expected, list);
        }
    }
}

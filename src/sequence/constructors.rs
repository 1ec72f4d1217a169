//! Sequence sources: snapshots, iterators and generator functions

use super::bounded::BoundedArraySequence;
use super::core::{lookahead_pull, Lookahead, PullResult, PullSequence};

/// Pull sequence fed by an iterator.
///
/// End of sequence is latched, so a non-fused iterator that resumes after
/// returning `None` is never polled again.
pub struct IterSequence<I>
where
    I: Iterator,
{
    iter: I,
    lookahead: Lookahead<I::Item>,
}

impl<I: Iterator> IterSequence<I> {
    fn advance(&mut self) -> PullResult<I::Item> {
        self.iter.next().into()
    }
}

impl<I: Iterator> PullSequence for IterSequence<I> {
    type Item = I::Item;

    lookahead_pull!();
}

/// Sequence over an owned vector, without copying it
pub fn from_vec<T>(items: Vec<T>) -> BoundedArraySequence<T> {
    BoundedArraySequence::from_vec(items)
}

/// Sequence over a snapshot copy of `items`
pub fn from_slice<T: Clone>(items: &[T]) -> BoundedArraySequence<T> {
    BoundedArraySequence::from_slice(items)
}

/// Lazily pulls from any iterable
pub fn from_iter<I>(iterable: I) -> IterSequence<I::IntoIter>
where
    I: IntoIterator,
{
    IterSequence { iter: iterable.into_iter(), lookahead: Lookahead::new() }
}

/// Sequence driven by a generator; the first `None` ends it.
pub fn from_fn<T, F>(generator: F) -> IterSequence<std::iter::FromFn<F>>
where
    F: FnMut() -> Option<T>,
{
    from_iter(std::iter::from_fn(generator))
}

pub fn empty<T>() -> BoundedArraySequence<T> {
    BoundedArraySequence::empty()
}

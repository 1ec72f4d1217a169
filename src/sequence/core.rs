//! Core pull protocol: the tri-state pull outcome, the `PullSequence` trait
//! and the extension trait every combinator hangs off.

use std::mem;

use crate::error::{SequenceError, SequenceResult};

use super::bounded::{BoundedArraySequence, Chunk};
use super::bridge::SequenceStream;
use super::pair::{choose, Merge, PairingPolicy, ZipWith};
use super::rechunk::{
    AdjacentPairs, Between, BothMatch, Chunks, Collapse, EveryNth, Segment, StartsWhen,
};

/// Outcome of asking a sequence for its next element(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullResult<T> {
    /// An element was produced
    Value(T),
    /// The sequence is exhausted; every later pull reports this again
    EndOfSequence,
    /// Placeholder before anything has been produced. Never returned by a pull.
    NotYetStarted,
}

impl<T> PullResult<T> {
    pub fn is_value(&self) -> bool {
        matches!(self, PullResult::Value(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(self, PullResult::EndOfSequence)
    }

    pub fn is_not_started(&self) -> bool {
        matches!(self, PullResult::NotYetStarted)
    }

    pub fn as_ref(&self) -> PullResult<&T> {
        match self {
            PullResult::Value(v) => PullResult::Value(v),
            PullResult::EndOfSequence => PullResult::EndOfSequence,
            PullResult::NotYetStarted => PullResult::NotYetStarted,
        }
    }

    pub fn map<U, F>(self, f: F) -> PullResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            PullResult::Value(v) => PullResult::Value(f(v)),
            PullResult::EndOfSequence => PullResult::EndOfSequence,
            PullResult::NotYetStarted => PullResult::NotYetStarted,
        }
    }

    /// Borrows the value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            PullResult::Value(v) => Some(v),
            _ => None,
        }
    }

    /// `Some` for a value, `None` for both absent states
    pub fn into_option(self) -> Option<T> {
        match self {
            PullResult::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Converts an absent value into [`SequenceError::NoSuchElement`]
    pub fn into_result(self) -> SequenceResult<T> {
        self.into_option().ok_or(SequenceError::NoSuchElement)
    }
}

impl<T> From<Option<T>> for PullResult<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => PullResult::Value(v),
            None => PullResult::EndOfSequence,
        }
    }
}

/// A single-pass, demand-driven source of values.
///
/// Every successful pull advances the cursor; nothing rewinds it. Once a
/// sequence has reported [`PullResult::EndOfSequence`] it keeps doing so.
pub trait PullSequence {
    type Item;

    /// Whether another element is available. Repeated calls without an
    /// intervening `next` return the same answer and skip nothing.
    fn has_next(&mut self) -> bool;

    /// Consume the current element.
    ///
    /// Fails with [`SequenceError::NoSuchElement`] when `has_next` is false.
    fn next(&mut self) -> SequenceResult<Self::Item>;

    /// Pull the next element, reporting exhaustion as a value rather than an error.
    fn pull_next(&mut self) -> PullResult<Self::Item> {
        if self.has_next() {
            match self.next() {
                Ok(item) => PullResult::Value(item),
                Err(_) => PullResult::EndOfSequence,
            }
        } else {
            PullResult::EndOfSequence
        }
    }

    /// Consume up to `n` further elements as a chunk.
    ///
    /// `n == 0` returns an empty chunk without touching the cursor. Near the
    /// end the chunk may hold fewer than `n` elements; only a request that
    /// finds nothing at all reports `EndOfSequence`.
    fn pull_next_batch(&mut self, n: usize) -> PullResult<Chunk<Self::Item>> {
        if n == 0 {
            return PullResult::Value(BoundedArraySequence::empty());
        }

        let mut batch = Vec::with_capacity(n.min(BATCH_PREALLOCATION_LIMIT));
        while batch.len() < n {
            match self.pull_next() {
                PullResult::Value(item) => batch.push(item),
                _ => break,
            }
        }

        if batch.is_empty() {
            PullResult::EndOfSequence
        } else {
            PullResult::Value(BoundedArraySequence::from_vec(batch))
        }
    }

    /// Same consumption rule as [`pull_next_batch`](Self::pull_next_batch),
    /// folding the extracted chunk through `f`.
    fn map_next_batch<R, F>(&mut self, n: usize, f: F) -> PullResult<R>
    where
        Self: Sized,
        F: FnOnce(Chunk<Self::Item>) -> R,
    {
        self.pull_next_batch(n).map(f)
    }
}

// Upper bound on the up-front allocation for a batch request; large `n`
// grows the buffer as elements actually arrive.
const BATCH_PREALLOCATION_LIMIT: usize = 1024;

/// Boxed, type-erased sequence
pub type BoxSequence<'a, T> = Box<dyn PullSequence<Item = T> + Send + 'a>;

impl<S> PullSequence for Box<S>
where
    S: PullSequence + ?Sized,
{
    type Item = S::Item;

    fn has_next(&mut self) -> bool {
        (**self).has_next()
    }

    fn next(&mut self) -> SequenceResult<Self::Item> {
        (**self).next()
    }

    fn pull_next(&mut self) -> PullResult<Self::Item> {
        (**self).pull_next()
    }

    fn pull_next_batch(&mut self, n: usize) -> PullResult<Chunk<Self::Item>> {
        (**self).pull_next_batch(n)
    }
}

impl<S> PullSequence for &mut S
where
    S: PullSequence + ?Sized,
{
    type Item = S::Item;

    fn has_next(&mut self) -> bool {
        (**self).has_next()
    }

    fn next(&mut self) -> SequenceResult<Self::Item> {
        (**self).next()
    }

    fn pull_next(&mut self) -> PullResult<Self::Item> {
        (**self).pull_next()
    }

    fn pull_next_batch(&mut self, n: usize) -> PullResult<Chunk<Self::Item>> {
        (**self).pull_next_batch(n)
    }
}

/// One-slot buffer for combinators whose next element is only known after
/// pulling upstream. Holds the resolved outcome until `next` takes it.
#[derive(Debug)]
pub(crate) struct Lookahead<T> {
    slot: PullResult<T>,
}

impl<T> Lookahead<T> {
    pub(crate) fn new() -> Self {
        Self { slot: PullResult::NotYetStarted }
    }

    pub(crate) fn is_unresolved(&self) -> bool {
        self.slot.is_not_started()
    }

    pub(crate) fn resolve(&mut self, outcome: PullResult<T>) {
        self.slot = match outcome {
            PullResult::NotYetStarted => PullResult::EndOfSequence,
            other => other,
        };
    }

    pub(crate) fn has_value(&self) -> bool {
        self.slot.is_value()
    }

    /// Hand out the buffered value; end of sequence stays latched.
    pub(crate) fn take(&mut self) -> PullResult<T> {
        match self.slot {
            PullResult::EndOfSequence => PullResult::EndOfSequence,
            _ => mem::replace(&mut self.slot, PullResult::NotYetStarted),
        }
    }
}

/// Implements the pull protocol for a combinator with a `lookahead:
/// Lookahead<Item>` field and an `advance(&mut self) -> PullResult<Item>`
/// method that computes the next element.
macro_rules! lookahead_pull {
    () => {
        fn has_next(&mut self) -> bool {
            if self.lookahead.is_unresolved() {
                let outcome = self.advance();
                self.lookahead.resolve(outcome);
            }
            self.lookahead.has_value()
        }

        fn next(&mut self) -> $crate::error::SequenceResult<Self::Item> {
            self.pull_next().into_result()
        }

        fn pull_next(&mut self) -> $crate::sequence::PullResult<Self::Item> {
            if self.has_next() {
                self.lookahead.take()
            } else {
                $crate::sequence::PullResult::EndOfSequence
            }
        }
    };
}

pub(crate) use lookahead_pull;

// ================================
// Map / Filter
// ================================

/// Applies `f` to each element as it is pulled
pub struct Map<S, F> {
    pub(crate) source: S,
    pub(crate) f: F,
}

impl<S, U, F> PullSequence for Map<S, F>
where
    S: PullSequence,
    F: FnMut(S::Item) -> U,
{
    type Item = U;

    fn has_next(&mut self) -> bool {
        self.source.has_next()
    }

    fn next(&mut self) -> SequenceResult<U> {
        self.source.next().map(&mut self.f)
    }

    fn pull_next(&mut self) -> PullResult<U> {
        self.source.pull_next().map(&mut self.f)
    }
}

/// Keeps only the elements matching the predicate
pub struct Filter<S, F>
where
    S: PullSequence,
{
    pub(crate) source: S,
    pub(crate) predicate: F,
    pub(crate) lookahead: Lookahead<S::Item>,
}

impl<S, F> Filter<S, F>
where
    S: PullSequence,
    F: FnMut(&S::Item) -> bool,
{
    fn advance(&mut self) -> PullResult<S::Item> {
        loop {
            match self.source.pull_next() {
                PullResult::Value(item) if (self.predicate)(&item) => return PullResult::Value(item),
                PullResult::Value(_) => continue,
                _ => return PullResult::EndOfSequence,
            }
        }
    }
}

impl<S, F> PullSequence for Filter<S, F>
where
    S: PullSequence,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    lookahead_pull!();
}

// ================================
// Iterator interop
// ================================

/// `Iterator` view of a pull sequence
pub struct PullIter<S> {
    source: S,
}

impl<S> PullIter<S> {
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: PullSequence> Iterator for PullIter<S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.pull_next().into_option()
    }
}

// ================================
// Extension trait
// ================================

/// Combinators available on every pull sequence
pub trait PullSequenceExt: PullSequence + Sized {
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: FnMut(Self::Item) -> U,
    {
        Map { source: self, f }
    }

    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
    {
        Filter { source: self, predicate, lookahead: Lookahead::new() }
    }

    /// Split into chunks of `count` consecutive elements.
    fn segment_by_count(self, count: usize, include_tail: bool) -> SequenceResult<Segment<Self, EveryNth>> {
        Ok(Segment::new(self, EveryNth::new(count)?, include_tail))
    }

    /// Open a new chunk at every element matching `start`.
    fn segment_by<P>(self, start: P, include_tail: bool) -> Segment<Self, StartsWhen<P>>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        Segment::new(self, StartsWhen::new(start), include_tail)
    }

    /// Chunks open at `start` and close at `end`; elements outside are dropped.
    fn segment_between<P, Q>(self, start: P, end: Q, include_tail: bool) -> Segment<Self, Between<P, Q>>
    where
        P: FnMut(&Self::Item) -> bool,
        Q: FnMut(&Self::Item) -> bool,
    {
        Segment::new(self, Between::new(start, end), include_tail)
    }

    /// Consecutive batches of `size`, the last one possibly shorter.
    fn chunks(self, size: usize) -> SequenceResult<Chunks<Self>> {
        Chunks::new(self, size)
    }

    /// Fuse each run of adjacent elements matching `should_collapse`.
    fn collapse<P, F>(self, should_collapse: P, combine: F) -> Collapse<Self, BothMatch<P>, F>
    where
        P: FnMut(&Self::Item) -> bool,
        F: FnMut(Self::Item, Self::Item) -> Self::Item,
    {
        Collapse::new(self, BothMatch::new(should_collapse), combine)
    }

    /// Fuse `next` into the running element whenever `collapsible(previous, next)`
    /// holds for the two adjacent source elements.
    fn collapse_adjacent<P, F>(self, collapsible: P, combine: F) -> Collapse<Self, AdjacentPairs<Self::Item, P>, F>
    where
        Self::Item: Clone,
        P: FnMut(&Self::Item, &Self::Item) -> bool,
        F: FnMut(Self::Item, Self::Item) -> Self::Item,
    {
        Collapse::new(self, AdjacentPairs::new(collapsible), combine)
    }

    fn zip_with<B, O, F>(self, other: B, policy: PairingPolicy, combine: F) -> ZipWith<Self, B, F>
    where
        B: PullSequence,
        F: FnMut(Option<Self::Item>, Option<B::Item>) -> O,
    {
        ZipWith::new(self, other, policy, combine)
    }

    /// Pairs elements positionally, stopping at the shorter side.
    #[allow(clippy::type_complexity)]
    fn zip<B>(self, other: B) -> ZipWith<Self, B, fn(Option<Self::Item>, Option<B::Item>) -> (Self::Item, B::Item)>
    where
        B: PullSequence,
    {
        // RequireBoth never hands the combiner an unpaired side, so `both` cannot panic
        let combine: fn(Option<Self::Item>, Option<B::Item>) -> (Self::Item, B::Item) = both;
        ZipWith::new(self, other, PairingPolicy::RequireBoth, combine)
    }

    /// Pairs elements positionally until both sides are exhausted.
    #[allow(clippy::type_complexity)]
    fn zip_longest<B>(
        self,
        other: B,
    ) -> ZipWith<Self, B, fn(Option<Self::Item>, Option<B::Item>) -> (Option<Self::Item>, Option<B::Item>)>
    where
        B: PullSequence,
    {
        let combine: fn(Option<Self::Item>, Option<B::Item>) -> (Option<Self::Item>, Option<B::Item>) = |l, r| (l, r);
        ZipWith::new(self, other, PairingPolicy::AllowUnpaired, combine)
    }

    /// Positional pairing of two same-typed sequences that keeps whichever
    /// side is present, preferring the left.
    #[allow(clippy::type_complexity)]
    fn zip_choose<B>(self, other: B) -> ZipWith<Self, B, fn(Option<Self::Item>, Option<Self::Item>) -> Self::Item>
    where
        B: PullSequence<Item = Self::Item>,
    {
        let combine: fn(Option<Self::Item>, Option<Self::Item>) -> Self::Item = choose;
        ZipWith::new(self, other, PairingPolicy::AllowUnpaired, combine)
    }

    /// Alternates one element from each side until both are exhausted.
    fn merge<B>(self, other: B) -> Merge<Self, B>
    where
        B: PullSequence<Item = Self::Item>,
    {
        Merge::new(self, other, PairingPolicy::AllowUnpaired)
    }

    fn merge_with_policy<B>(self, other: B, policy: PairingPolicy) -> Merge<Self, B>
    where
        B: PullSequence<Item = Self::Item>,
    {
        Merge::new(self, other, policy)
    }

    fn iter(self) -> PullIter<Self> {
        PullIter { source: self }
    }

    /// Drain the remaining elements into a `Vec`
    fn collect_vec(self) -> Vec<Self::Item> {
        self.iter().collect()
    }

    fn into_stream(self) -> SequenceStream<Self>
    where
        Self: Unpin,
    {
        SequenceStream::new(self)
    }

    fn boxed<'a>(self) -> BoxSequence<'a, Self::Item>
    where
        Self: Send + 'a,
    {
        Box::new(self)
    }
}

impl<S> PullSequenceExt for S where S: PullSequence {}

fn both<L, R>(left: Option<L>, right: Option<R>) -> (L, R) {
    match (left, right) {
        (Some(l), Some(r)) => (l, r),
        _ => unreachable!("RequireBoth pairing never yields an unpaired side"),
    }
}

//! Re-chunking combinators: segment, chunks and collapse
//!
//! All of them are lazy. Upstream is pulled only until the next output
//! element is resolved, and caller callbacks run once per element in
//! element order. If a callback panics, the combinator's internal state is
//! left mid-update and it must not be pulled again.

use std::collections::VecDeque;
use std::mem;

use crate::error::{SequenceError, SequenceResult};

use super::bounded::{BoundedArraySequence, Chunk};
use super::core::{lookahead_pull, Lookahead, PullResult, PullSequence};

// ================================
// Segment boundaries
// ================================

/// Decides where chunks open and close while segmenting.
pub trait SegmentBoundary<T> {
    /// Whether `item` opens a new chunk
    fn starts(&mut self, item: &T) -> bool;

    /// Whether `item` closes the current chunk. Boundaries without an end
    /// condition run each chunk up to the next start.
    fn ends(&mut self, _item: &T) -> bool {
        false
    }
}

/// Opens a chunk every `count` elements, starting with the first, and
/// closes it on the element that fills it. Only an incomplete last chunk is
/// left to the tail policy.
#[derive(Debug, Clone)]
pub struct EveryNth {
    count: usize,
    position: usize,
}

impl EveryNth {
    pub fn new(count: usize) -> SequenceResult<Self> {
        if count == 0 {
            return Err(SequenceError::invalid("segment count must be positive"));
        }
        Ok(Self { count, position: 0 })
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl<T> SegmentBoundary<T> for EveryNth {
    fn starts(&mut self, _item: &T) -> bool {
        let opens = self.position == 0;
        self.position = (self.position + 1) % self.count;
        opens
    }

    // Called after `starts` for the same element, so a wrapped position
    // means this element filled the chunk.
    fn ends(&mut self, _item: &T) -> bool {
        self.position == 0
    }
}

/// Opens a chunk at every element matching the predicate.
pub struct StartsWhen<P> {
    start: P,
}

impl<P> StartsWhen<P> {
    pub fn new(start: P) -> Self {
        Self { start }
    }
}

impl<T, P> SegmentBoundary<T> for StartsWhen<P>
where
    P: FnMut(&T) -> bool,
{
    fn starts(&mut self, item: &T) -> bool {
        (self.start)(item)
    }
}

/// Independent start and end predicates.
pub struct Between<P, Q> {
    start: P,
    end: Q,
}

impl<P, Q> Between<P, Q> {
    pub fn new(start: P, end: Q) -> Self {
        Self { start, end }
    }
}

impl<T, P, Q> SegmentBoundary<T> for Between<P, Q>
where
    P: FnMut(&T) -> bool,
    Q: FnMut(&T) -> bool,
{
    fn starts(&mut self, item: &T) -> bool {
        (self.start)(item)
    }

    fn ends(&mut self, item: &T) -> bool {
        (self.end)(item)
    }
}

// ================================
// Segment
// ================================

/// Splits a sequence into chunks at the boundaries chosen by `B`.
///
/// Elements seen before the first opening boundary, or after a chunk was
/// closed by an end condition and before the next opening, belong to no
/// chunk. Empty chunks are never emitted.
pub struct Segment<S, B>
where
    S: PullSequence,
{
    source: S,
    boundary: B,
    include_tail: bool,
    accumulator: Vec<S::Item>,
    adding: bool,
    // An element can complete two chunks at once (start flush, then end flush).
    ready: VecDeque<Vec<S::Item>>,
    exhausted: bool,
    lookahead: Lookahead<Chunk<S::Item>>,
}

impl<S, B> Segment<S, B>
where
    S: PullSequence,
    B: SegmentBoundary<S::Item>,
{
    pub fn new(source: S, boundary: B, include_tail: bool) -> Self {
        Self {
            source,
            boundary,
            include_tail,
            accumulator: Vec::new(),
            adding: false,
            ready: VecDeque::new(),
            exhausted: false,
            lookahead: Lookahead::new(),
        }
    }

    fn flush(&mut self) {
        if !self.accumulator.is_empty() {
            self.ready.push_back(mem::take(&mut self.accumulator));
        }
    }

    fn accept(&mut self, item: S::Item) {
        let starts = self.boundary.starts(&item);
        if starts {
            self.flush();
            self.adding = true;
        }
        let ends = self.boundary.ends(&item);

        if self.adding {
            self.accumulator.push(item);
        }

        if ends {
            self.flush();
            self.adding = false;
        }
    }

    fn finish(&mut self) {
        self.exhausted = true;
        self.adding = false;
        if self.include_tail {
            self.flush();
        } else if !self.accumulator.is_empty() {
            log::trace!("segment dropping incomplete tail of {} elements", self.accumulator.len());
            self.accumulator.clear();
        }
    }

    fn advance(&mut self) -> PullResult<Chunk<S::Item>> {
        loop {
            if let Some(chunk) = self.ready.pop_front() {
                return PullResult::Value(BoundedArraySequence::from_vec(chunk));
            }
            if self.exhausted {
                return PullResult::EndOfSequence;
            }
            match self.source.pull_next() {
                PullResult::Value(item) => self.accept(item),
                _ => self.finish(),
            }
        }
    }
}

impl<S, B> PullSequence for Segment<S, B>
where
    S: PullSequence,
    B: SegmentBoundary<S::Item>,
{
    type Item = Chunk<S::Item>;

    lookahead_pull!();
}

// ================================
// Chunks
// ================================

/// Consecutive fixed-size batches; the last one may be shorter.
pub struct Chunks<S>
where
    S: PullSequence,
{
    source: S,
    size: usize,
    lookahead: Lookahead<Chunk<S::Item>>,
}

impl<S: PullSequence> Chunks<S> {
    pub fn new(source: S, size: usize) -> SequenceResult<Self> {
        if size == 0 {
            return Err(SequenceError::invalid("chunk size must be positive"));
        }
        Ok(Self { source, size, lookahead: Lookahead::new() })
    }

    fn advance(&mut self) -> PullResult<Chunk<S::Item>> {
        self.source.pull_next_batch(self.size)
    }
}

impl<S: PullSequence> PullSequence for Chunks<S> {
    type Item = Chunk<S::Item>;

    lookahead_pull!();
}

// ================================
// Collapse rules
// ================================

/// Decides whether the next source element fuses into the running one.
///
/// `joins` is called once per element after the first, in order, and must
/// remember that element as the new "previous" one.
pub trait CollapseRule<T> {
    fn seed(&mut self, first: &T);
    fn joins(&mut self, next: &T) -> bool;
}

/// Adjacent elements fuse when both match the predicate.
pub struct BothMatch<P> {
    predicate: P,
    previous_matched: bool,
}

impl<P> BothMatch<P> {
    pub fn new(predicate: P) -> Self {
        Self { predicate, previous_matched: false }
    }
}

impl<T, P> CollapseRule<T> for BothMatch<P>
where
    P: FnMut(&T) -> bool,
{
    fn seed(&mut self, first: &T) {
        self.previous_matched = (self.predicate)(first);
    }

    fn joins(&mut self, next: &T) -> bool {
        let matched = (self.predicate)(next);
        let joins = self.previous_matched && matched;
        self.previous_matched = matched;
        joins
    }
}

/// Adjacent elements fuse when the binary predicate holds for the pair.
pub struct AdjacentPairs<T, P> {
    collapsible: P,
    previous: Option<T>,
}

impl<T, P> AdjacentPairs<T, P> {
    pub fn new(collapsible: P) -> Self {
        Self { collapsible, previous: None }
    }
}

impl<T, P> CollapseRule<T> for AdjacentPairs<T, P>
where
    T: Clone,
    P: FnMut(&T, &T) -> bool,
{
    fn seed(&mut self, first: &T) {
        self.previous = Some(first.clone());
    }

    fn joins(&mut self, next: &T) -> bool {
        let joins = match &self.previous {
            Some(previous) => (self.collapsible)(previous, next),
            None => false,
        };
        self.previous = Some(next.clone());
        joins
    }
}

// ================================
// Collapse
// ================================

enum CollapseState<T> {
    Seeding,
    Accumulating(T),
    Done,
}

/// Fuses runs of adjacent elements into one element through `combine`.
pub struct Collapse<S, R, F>
where
    S: PullSequence,
{
    source: S,
    rule: R,
    combine: F,
    state: CollapseState<S::Item>,
    lookahead: Lookahead<S::Item>,
}

impl<S, R, F> Collapse<S, R, F>
where
    S: PullSequence,
    R: CollapseRule<S::Item>,
    F: FnMut(S::Item, S::Item) -> S::Item,
{
    pub fn new(source: S, rule: R, combine: F) -> Self {
        Self {
            source,
            rule,
            combine,
            state: CollapseState::Seeding,
            lookahead: Lookahead::new(),
        }
    }

    fn advance(&mut self) -> PullResult<S::Item> {
        loop {
            match mem::replace(&mut self.state, CollapseState::Done) {
                CollapseState::Seeding => match self.source.pull_next() {
                    PullResult::Value(first) => {
                        self.rule.seed(&first);
                        self.state = CollapseState::Accumulating(first);
                    }
                    _ => {
                        log::trace!("collapse source was empty");
                        return PullResult::EndOfSequence;
                    }
                },
                CollapseState::Accumulating(acc) => match self.source.pull_next() {
                    PullResult::Value(next) => {
                        if self.rule.joins(&next) {
                            self.state = CollapseState::Accumulating((self.combine)(acc, next));
                        } else {
                            self.state = CollapseState::Accumulating(next);
                            return PullResult::Value(acc);
                        }
                    }
                    // Final flush; the state stays Done from here on.
                    _ => return PullResult::Value(acc),
                },
                CollapseState::Done => return PullResult::EndOfSequence,
            }
        }
    }
}

impl<S, R, F> PullSequence for Collapse<S, R, F>
where
    S: PullSequence,
    R: CollapseRule<S::Item>,
    F: FnMut(S::Item, S::Item) -> S::Item,
{
    type Item = S::Item;

    lookahead_pull!();
}

//! Two-sequence combinators: positional zip and round-robin merge
use serde::{Deserialize, Serialize};

use crate::error::SequenceResult;

use super::core::{lookahead_pull, Lookahead, PullResult, PullSequence};

/// How two sequences of possibly different lengths are paired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingPolicy {
    /// Stop as soon as either side is exhausted
    RequireBoth,
    /// Keep going until both sides are exhausted
    #[default]
    AllowUnpaired,
}

/// Default combiner for same-typed sides: whichever side is present, the
/// left one when both are.
pub fn choose<T>(left: Option<T>, right: Option<T>) -> T {
    match (left, right) {
        (Some(l), _) => l,
        (None, Some(r)) => r,
        (None, None) => unreachable!("zip never pairs two exhausted sides"),
    }
}

// ================================
// ZipWith
// ================================

/// Positional pairing of two sequences under a [`PairingPolicy`].
///
/// One element is pulled per side per step. With `RequireBoth` the right
/// side is not pulled once the left side has ended; with `AllowUnpaired` an
/// exhausted side is passed to `combine` as `None` and never pulled again.
/// A panicking `combine` leaves both sides advanced past the lost pair.
pub struct ZipWith<A, B, F>
where
    A: PullSequence,
    B: PullSequence,
{
    left: A,
    right: B,
    policy: PairingPolicy,
    combine: F,
    left_done: bool,
    right_done: bool,
    // Pairs are combined when taken, so `has_next` never calls `combine`.
    lookahead: Lookahead<(Option<A::Item>, Option<B::Item>)>,
}

impl<A, B, F> ZipWith<A, B, F>
where
    A: PullSequence,
    B: PullSequence,
{
    pub fn new(left: A, right: B, policy: PairingPolicy, combine: F) -> Self {
        Self {
            left,
            right,
            policy,
            combine,
            left_done: false,
            right_done: false,
            lookahead: Lookahead::new(),
        }
    }

    pub fn policy(&self) -> PairingPolicy {
        self.policy
    }

    fn pull_left(&mut self) -> Option<A::Item> {
        if self.left_done {
            return None;
        }
        let item = self.left.pull_next().into_option();
        self.left_done = item.is_none();
        item
    }

    fn pull_right(&mut self) -> Option<B::Item> {
        if self.right_done {
            return None;
        }
        let item = self.right.pull_next().into_option();
        self.right_done = item.is_none();
        item
    }

    fn advance(&mut self) -> PullResult<(Option<A::Item>, Option<B::Item>)> {
        let left = self.pull_left();
        if left.is_none() && self.policy == PairingPolicy::RequireBoth {
            log::trace!("zip stopped: left side exhausted");
            return PullResult::EndOfSequence;
        }
        let right = self.pull_right();

        match (self.policy, left, right) {
            (_, None, None) => PullResult::EndOfSequence,
            (PairingPolicy::RequireBoth, _, None) => {
                log::trace!("zip stopped: right side exhausted");
                PullResult::EndOfSequence
            }
            (_, left, right) => PullResult::Value((left, right)),
        }
    }
}

impl<A, B, F, O> PullSequence for ZipWith<A, B, F>
where
    A: PullSequence,
    B: PullSequence,
    F: FnMut(Option<A::Item>, Option<B::Item>) -> O,
{
    type Item = O;

    fn has_next(&mut self) -> bool {
        if self.lookahead.is_unresolved() {
            let outcome = self.advance();
            self.lookahead.resolve(outcome);
        }
        self.lookahead.has_value()
    }

    fn next(&mut self) -> SequenceResult<O> {
        self.pull_next().into_result()
    }

    fn pull_next(&mut self) -> PullResult<O> {
        if !self.has_next() {
            return PullResult::EndOfSequence;
        }
        let combine = &mut self.combine;
        self.lookahead.take().map(|(left, right)| combine(left, right))
    }
}

// ================================
// Merge
// ================================

/// Strict one-at-a-time alternation between two sequences, left first.
///
/// Under `AllowUnpaired` an exhausted side is skipped and the other one
/// drains alone. Under `RequireBoth` the merge ends as soon as either side
/// reports end of sequence.
pub struct Merge<A, B>
where
    A: PullSequence,
{
    left: A,
    right: B,
    policy: PairingPolicy,
    left_done: bool,
    right_done: bool,
    left_turn: bool,
    lookahead: Lookahead<A::Item>,
}

impl<A, B> Merge<A, B>
where
    A: PullSequence,
    B: PullSequence<Item = A::Item>,
{
    pub fn new(left: A, right: B, policy: PairingPolicy) -> Self {
        Self {
            left,
            right,
            policy,
            left_done: false,
            right_done: false,
            left_turn: true,
            lookahead: Lookahead::new(),
        }
    }

    pub fn policy(&self) -> PairingPolicy {
        self.policy
    }

    fn advance(&mut self) -> PullResult<A::Item> {
        loop {
            let either_done = self.left_done || self.right_done;
            if (self.left_done && self.right_done)
                || (either_done && self.policy == PairingPolicy::RequireBoth)
            {
                log::trace!("merge finished (left_done={}, right_done={})", self.left_done, self.right_done);
                return PullResult::EndOfSequence;
            }

            if self.left_turn {
                self.left_turn = false;
                if !self.left_done {
                    match self.left.pull_next() {
                        PullResult::Value(item) => return PullResult::Value(item),
                        _ => self.left_done = true,
                    }
                }
            } else {
                self.left_turn = true;
                if !self.right_done {
                    match self.right.pull_next() {
                        PullResult::Value(item) => return PullResult::Value(item),
                        _ => self.right_done = true,
                    }
                }
            }
        }
    }
}

impl<A, B> PullSequence for Merge<A, B>
where
    A: PullSequence,
    B: PullSequence<Item = A::Item>,
{
    type Item = A::Item;

    lookahead_pull!();
}

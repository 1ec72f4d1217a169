//! Bridge from the synchronous pull protocol to `futures_core::Stream`
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use super::core::PullSequence;

/// A pull sequence exposed as an always-ready stream.
///
/// Every poll pulls once from the underlying sequence, so the stream never
/// returns `Poll::Pending`.
pub struct SequenceStream<S> {
    sequence: S,
}

impl<S> SequenceStream<S> {
    pub fn new(sequence: S) -> Self {
        Self { sequence }
    }

    pub fn into_inner(self) -> S {
        self.sequence
    }
}

impl<S> Stream for SequenceStream<S>
where
    S: PullSequence + Unpin,
{
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.sequence.pull_next().into_option())
    }
}

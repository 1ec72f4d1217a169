//! Bounded, slice-capable sequence over an immutable snapshot

use std::fmt;
use std::sync::Arc;

use crate::error::{SequenceError, SequenceResult};

use super::core::{PullResult, PullSequence};

/// An ordered, finite sub-sequence handed out by batching and segmenting.
pub type Chunk<T> = BoundedArraySequence<T>;

/// A pull sequence over the `[start, end)` window of a shared, read-only
/// snapshot.
///
/// Slices derived from a sequence share its snapshot but never its cursor.
pub struct BoundedArraySequence<T> {
    snapshot: Arc<[T]>,
    start: usize,
    end: usize,
    cursor: usize,
}

impl<T> BoundedArraySequence<T> {
    /// Window of `length` elements starting at `start`.
    ///
    /// `end` is clamped into `[0, snapshot.len()]` and `start` into `[0, end]`,
    /// so out-of-range arguments yield a shorter (possibly empty) window.
    pub fn new(snapshot: Arc<[T]>, start: usize, length: usize) -> Self {
        let end = start.saturating_add(length).min(snapshot.len());
        let start = start.min(end);
        Self { snapshot, start, end, cursor: start }
    }

    /// Takes ownership of `items`; the whole vector is the window.
    pub fn from_vec(items: Vec<T>) -> Self {
        let len = items.len();
        Self::new(Arc::from(items), 0, len)
    }

    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Fresh sequence over the same snapshot and window, cursor at the start.
    pub fn new_sequence(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            start: self.start,
            end: self.end,
            cursor: self.start,
        }
    }

    /// Fresh sequence over `length` elements from `offset` within this window.
    pub fn slice(&self, offset: usize, length: usize) -> Self {
        let start = self.start.saturating_add(offset).min(self.end);
        let end = start.saturating_add(length).min(self.end);
        Self {
            snapshot: Arc::clone(&self.snapshot),
            start,
            end,
            cursor: start,
        }
    }

    /// The whole window, regardless of the cursor
    pub fn as_slice(&self) -> &[T] {
        &self.snapshot[self.start..self.end]
    }

    /// Size of the window
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Elements not yet consumed
    pub fn remaining(&self) -> usize {
        self.end - self.cursor
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Next `n` unconsumed elements as a new sequence sharing the snapshot
    fn split_off_next(&mut self, n: usize) -> Self {
        let batch = self.slice(self.cursor - self.start, n);
        self.cursor = batch.end;
        batch
    }
}

impl<T: Clone> BoundedArraySequence<T> {
    /// Copies `items` once; later changes to the caller's data are not seen.
    pub fn from_slice(items: &[T]) -> Self {
        Self::new(Arc::from(items), 0, items.len())
    }

    /// Copy of exactly the `[start, end)` window
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }
}

impl<T: Clone> PullSequence for BoundedArraySequence<T> {
    type Item = T;

    fn has_next(&mut self) -> bool {
        self.cursor < self.end
    }

    fn next(&mut self) -> SequenceResult<T> {
        if self.cursor >= self.end {
            return Err(SequenceError::NoSuchElement);
        }
        let item = self.snapshot[self.cursor].clone();
        self.cursor += 1;
        Ok(item)
    }

    // Zero-copy: the batch is a sub-window of the same snapshot.
    fn pull_next_batch(&mut self, n: usize) -> PullResult<Chunk<T>> {
        if n != 0 && self.cursor >= self.end {
            return PullResult::EndOfSequence;
        }
        PullResult::Value(self.split_off_next(n))
    }
}

impl<T> Clone for BoundedArraySequence<T> {
    /// Clones keep the cursor position; use [`new_sequence`](Self::new_sequence)
    /// for a rewound copy.
    fn clone(&self) -> Self {
        Self {
            snapshot: Arc::clone(&self.snapshot),
            start: self.start,
            end: self.end,
            cursor: self.cursor,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BoundedArraySequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedArraySequence")
            .field("window", &self.as_slice())
            .field("start", &self.start)
            .field("end", &self.end)
            .field("cursor", &self.cursor)
            .finish()
    }
}

/// Window contents, ignoring cursor position
impl<T: PartialEq> PartialEq for BoundedArraySequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for BoundedArraySequence<T> {}

impl<T> From<Vec<T>> for BoundedArraySequence<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_window() {
        let snapshot: Arc<[i32]> = Arc::from(vec![1, 2, 3]);
        let seq = BoundedArraySequence::new(Arc::clone(&snapshot), 1, 10);
        assert_eq!(seq.start(), 1);
        assert_eq!(seq.end(), 3);

        let past_end = BoundedArraySequence::new(snapshot, 7, 2);
        assert!(past_end.is_empty());
        assert_eq!(past_end.start(), 3);
    }

    #[test]
    fn test_slice_stays_inside_parent_window() {
        let seq = BoundedArraySequence::from_vec(vec![0, 1, 2, 3, 4, 5]).slice(1, 4);
        let inner = seq.slice(2, 10);
        assert_eq!(inner.to_vec(), vec![3, 4]);
    }

    #[test]
    fn test_split_off_next_advances_cursor() {
        let mut seq = BoundedArraySequence::from_vec(vec![1, 2, 3, 4, 5]);
        seq.next().unwrap();
        let batch = seq.split_off_next(2);
        assert_eq!(batch.to_vec(), vec![2, 3]);
        assert_eq!(seq.remaining(), 2);
    }
}

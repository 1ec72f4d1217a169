//! Lazy, single-pass pull sequences
//!
//! A [`PullSequence`] hands out elements on demand. Combinators consume one
//! or two sequences and are sequences themselves, so they compose without
//! materializing intermediate results.

pub mod core;
pub mod bounded;
pub mod constructors;
pub mod rechunk;
pub mod pair;
pub mod bridge;

// Re-export core types
pub use self::core::{BoxSequence, Filter, Map, PullIter, PullResult, PullSequence, PullSequenceExt};

pub use bounded::{BoundedArraySequence, Chunk};

pub use constructors::{empty, from_fn, from_iter, from_slice, from_vec, IterSequence};

pub use rechunk::{
    AdjacentPairs, Between, BothMatch, Chunks, Collapse, CollapseRule, EveryNth, Segment,
    SegmentBoundary, StartsWhen,
};

pub use pair::{choose, Merge, PairingPolicy, ZipWith};

pub use bridge::SequenceStream;

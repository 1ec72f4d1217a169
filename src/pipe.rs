use std::sync::Arc;

use crate::error::SequenceResult;
use crate::sequence::{BoxSequence, Chunk, EveryNth, PullSequenceExt, Segment};

/// A Pipe represents a sequence transformation from one element type to another.
/// It's a function from Sequence[I] to Sequence[O].
pub struct Pipe<I, O> {
    f: Arc<dyn Fn(BoxSequence<'static, I>) -> BoxSequence<'static, O> + Send + Sync + 'static>,
}

impl<I, O> Clone for Pipe<I, O> {
    fn clone(&self) -> Self {
        Pipe {
            f: Arc::clone(&self.f),
        }
    }
}

impl<I, O> Pipe<I, O> {
    /// Create a new pipe from a function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(BoxSequence<'static, I>) -> BoxSequence<'static, O> + Send + Sync + 'static,
    {
        Pipe {
            f: Arc::new(f),
        }
    }

    /// Apply this pipe to a sequence
    pub fn apply(&self, input: BoxSequence<'static, I>) -> BoxSequence<'static, O> {
        (self.f)(input)
    }
}

impl<I, O> Pipe<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Run `next` on the output of this pipe
    pub fn then<P>(self, next: Pipe<O, P>) -> Pipe<I, P>
    where
        P: Send + 'static,
    {
        compose(self, next)
    }
}

/// Create a pipe that applies the given function to each element
pub fn map<I, O, F>(f: F) -> Pipe<I, O>
where
    F: Fn(I) -> O + Send + Sync + Clone + 'static,
    I: Send + 'static,
    O: Send + 'static,
{
    Pipe::new(move |input| input.map(f.clone()).boxed())
}

/// Create a pipe that filters elements based on the predicate
pub fn filter<I, F>(predicate: F) -> Pipe<I, I>
where
    F: Fn(&I) -> bool + Send + Sync + Clone + 'static,
    I: Send + 'static,
{
    Pipe::new(move |input| input.filter(predicate.clone()).boxed())
}

/// Create a pipe that groups elements into chunks of `size`.
///
/// The size is checked here, so applying the pipe cannot fail.
pub fn segment_by_count<I>(size: usize, include_tail: bool) -> SequenceResult<Pipe<I, Chunk<I>>>
where
    I: Send + Sync + 'static,
{
    let boundary = EveryNth::new(size)?;
    Ok(Pipe::new(move |input| {
        Segment::new(input, boundary.clone(), include_tail).boxed()
    }))
}

/// Create a pipe that fuses runs of adjacent elements matching `should_collapse`
pub fn collapse<I, P, F>(should_collapse: P, combine: F) -> Pipe<I, I>
where
    I: Send + 'static,
    P: Fn(&I) -> bool + Send + Sync + Clone + 'static,
    F: Fn(I, I) -> I + Send + Sync + Clone + 'static,
{
    Pipe::new(move |input| input.collapse(should_collapse.clone(), combine.clone()).boxed())
}

/// Compose two pipes together
pub fn compose<I, M, O>(p1: Pipe<I, M>, p2: Pipe<M, O>) -> Pipe<I, O>
where
    I: Send + 'static,
    M: Send + 'static,
    O: Send + 'static,
{
    Pipe::new(move |input| p2.apply(p1.apply(input)))
}

/// Identity pipe that doesn't transform the sequence
pub fn identity<I>() -> Pipe<I, I>
where
    I: Send + 'static,
{
    Pipe::new(|input| input)
}

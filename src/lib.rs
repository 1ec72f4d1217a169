pub mod error;
pub mod sequence;

pub mod pipe;

pub mod stream_configuration;

pub use error::{SequenceError, SequenceResult};
pub use stream_configuration::{BatchConfig, PairConfig, SegmentConfig, SequenceConfig};

// Re-export the sequence kernel at the crate root
pub use sequence::{
    choose, empty, from_fn, from_iter, from_slice, from_vec, BoundedArraySequence, BoxSequence,
    Chunk, Merge, PairingPolicy, PullResult, PullSequence, PullSequenceExt, ZipWith,
};

//! Configuration types for sequence combinators
//!
//! Everything here is serde-deserializable so combinator settings can be
//! loaded alongside the rest of an application's configuration. Sizes are
//! validated before a configuration is handed out.

use serde::{Deserialize, Serialize};

use crate::error::{SequenceError, SequenceResult};
use crate::sequence::{
    Chunks, EveryNth, PairingPolicy, PullSequence, PullSequenceExt, Segment, ZipWith,
};

/// Count-based segmenting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    pub size: usize,
    pub include_tail: bool,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            size: 16,
            include_tail: true,
        }
    }
}

impl SegmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of elements per chunk
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Keep or drop the incomplete final chunk
    pub fn include_tail(mut self, include_tail: bool) -> Self {
        self.include_tail = include_tail;
        self
    }

    pub fn validate(&self) -> SequenceResult<()> {
        if self.size == 0 {
            return Err(SequenceError::invalid("segment size must be positive"));
        }
        Ok(())
    }

    /// Segment `source` with these settings
    pub fn apply<S: PullSequence>(&self, source: S) -> SequenceResult<Segment<S, EveryNth>> {
        source.segment_by_count(self.size, self.include_tail)
    }
}

/// Pairing settings for zip and merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairConfig {
    pub policy: PairingPolicy,
}

impl PairConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(mut self, policy: PairingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Zip two sequences under the configured policy
    pub fn zip_with<A, B, O, F>(&self, left: A, right: B, combine: F) -> ZipWith<A, B, F>
    where
        A: PullSequence,
        B: PullSequence,
        F: FnMut(Option<A::Item>, Option<B::Item>) -> O,
    {
        left.zip_with(right, self.policy, combine)
    }
}

/// Batch extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { batch_size: 64 }
    }
}

impl BatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn validate(&self) -> SequenceResult<()> {
        if self.batch_size == 0 {
            return Err(SequenceError::invalid("batch size must be positive"));
        }
        Ok(())
    }

    /// Split `source` into batches of the configured size
    pub fn apply<S: PullSequence>(&self, source: S) -> SequenceResult<Chunks<S>> {
        source.chunks(self.batch_size)
    }
}

/// Aggregate configuration for the sequence kernel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub segment: SegmentConfig,
    pub pair: PairConfig,
    pub batch: BatchConfig,
}

impl SequenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment(mut self, segment: SegmentConfig) -> Self {
        self.segment = segment;
        self
    }

    pub fn pair(mut self, pair: PairConfig) -> Self {
        self.pair = pair;
        self
    }

    pub fn batch(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    pub fn validate(&self) -> SequenceResult<()> {
        self.segment.validate()?;
        self.batch.validate()
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SequenceResult<Self> {
        let config: SequenceConfig = serde_json::from_str(json)?;
        config.validate()?;
        log::debug!("loaded sequence configuration: {:?}", config);
        Ok(config)
    }
}

//! Error types for pull sequence operations
//!
//! End of sequence is not an error: it is reported through
//! [`PullResult::EndOfSequence`](crate::sequence::PullResult). The variants
//! here cover protocol violations and invalid construction parameters.

/// Main error type for sequence operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// `next` was called on a sequence with no remaining element
    #[error("No such element: sequence has no remaining element")]
    NoSuchElement,
    /// A combinator or configuration was built with an unusable parameter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SequenceError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SequenceError::InvalidArgument(msg.into())
    }
}

impl From<serde_json::Error> for SequenceError {
    fn from(err: serde_json::Error) -> Self {
        SequenceError::InvalidArgument(err.to_string())
    }
}

/// Result type for sequence operations
pub type SequenceResult<T> = Result<T, SequenceError>;

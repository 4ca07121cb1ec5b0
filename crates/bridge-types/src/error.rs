use thiserror::Error;

use crate::id::NodeId;
use crate::kind::ValueType;

/// Errors produced by container operations.
///
/// Every failing operation leaves the container unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A value of the wrong container kind was provided, e.g. a child built
    /// by a different engine or a non-map source for a merge.
    #[error("illegal type provided: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Malformed argument, such as an empty key under the strict policy.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The container was already moved into a parent or sealed.
    #[error("container {0} was already consumed")]
    UseAfterConsume(NodeId),

    /// The id was never allocated by this engine.
    #[error("unknown container: {0}")]
    UnknownNode(NodeId),

    #[error("no such key: {0}")]
    NoSuchKey(String),

    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A typed getter was used on a value of another type.
    #[error("expected {expected}, found {actual}")]
    UnexpectedType {
        expected: ValueType,
        actual: ValueType,
    },

    /// The engine's node table lock was poisoned by a panicking writer.
    #[error("engine lock poisoned: {0}")]
    Poisoned(String),
}

impl BridgeError {
    /// Shorthand for [`BridgeError::TypeMismatch`].
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Result alias for container operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

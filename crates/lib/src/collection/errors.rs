//! Error types for collection operations.
//!
//! This module defines structured error types for the failures a collection
//! operation can report: bad arguments, mismatched sequence lengths, operations
//! on an empty working set, key-coercion failures, and malformed serialized input.
//!
//! All errors are reported synchronously to the immediate caller; nothing is
//! retried or recovered internally.

use thiserror::Error;

/// Structured error types for collection operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CollectionError {
    /// An operation received an argument outside its accepted range
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Two sequences that must be the same length were not
    #[error("length mismatch: {left} elements vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// An operation that needs at least one element ran on an empty working set
    #[error("cannot {operation} an empty collection")]
    EmptyCollection { operation: String },

    /// A value could not be used where a different type was required
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Serialized input could not be reconstructed into a collection
    #[error("deserialization failed: {reason}")]
    DeserializationFailed { reason: String },
}

impl CollectionError {
    /// Check if this error reports a bad argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CollectionError::InvalidArgument { .. })
    }

    /// Check if this error reports mismatched sequence lengths.
    pub fn is_length_mismatch(&self) -> bool {
        matches!(self, CollectionError::LengthMismatch { .. })
    }

    /// Check if this error reports an operation on an empty working set.
    pub fn is_empty_collection(&self) -> bool {
        matches!(self, CollectionError::EmptyCollection { .. })
    }

    /// Check if this error reports a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, CollectionError::TypeMismatch { .. })
    }

    /// Check if this error came from deserializing malformed input.
    pub fn is_deserialization_error(&self) -> bool {
        matches!(self, CollectionError::DeserializationFailed { .. })
    }

    /// Get the operation name if this is an empty-collection error.
    pub fn operation(&self) -> Option<&str> {
        match self {
            CollectionError::EmptyCollection { operation } => Some(operation),
            _ => None,
        }
    }
}

// Conversion from CollectionError to the main Error type
impl From<CollectionError> for crate::Error {
    fn from(err: CollectionError) -> Self {
        crate::Error::Collection(err)
    }
}

//!
//! Tidepool: fluent, chainable transformations over an ordered keyed collection.
//! This library provides a builder-style [`Collection`] that owns one insertion-ordered
//! mapping and reworks it through chained operations.
//!
//! ## Core Concepts
//!
//! * **Collection (`collection::Collection`)**: The owning wrapper around the working set.
//!   Every transformation consumes the collection and returns the updated owned value,
//!   so chains read linearly and there is no hidden aliasing.
//! * **Map (`collection::Map`)**: The working set itself, an insertion-ordered mapping
//!   from [`Key`] to [`Value`] with unique keys.
//! * **Key (`collection::Key`)**: Integer or text. A single map freely mixes both;
//!   renumbering operations touch only the integer keys.
//! * **Value (`collection::Value`)**: The tagged value type, covering primitive leaves
//!   and the nested containers produced by shape-changing operations such as
//!   [`Collection::chunk`].
//! * **Scalar (`collection::Scalar`)**: The result of [`Collection::pop`], which
//!   replaces the entire working set with the single popped value.
//!
//! ## Concurrency
//!
//! `Collection` has no interior mutability and performs no locking. It follows plain
//! ownership rules: move it between threads freely, but clone it before mutating the
//! same data from more than one place.

pub mod collection;

pub use collection::{Collection, CollectionError, Key, KeyCase, Map, Scalar, Value};

/// Result type used throughout the tidepool library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the tidepool library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured collection errors from the collection module
    #[error(transparent)]
    Collection(collection::CollectionError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Serialize(_) => "serialize",
            Error::Collection(_) => "collection",
        }
    }

    /// Check if this error reports a bad argument to an operation.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::Collection(err) if err.is_invalid_argument())
    }

    /// Check if this error reports mismatched sequence lengths.
    pub fn is_length_mismatch(&self) -> bool {
        matches!(self, Error::Collection(err) if err.is_length_mismatch())
    }

    /// Check if this error reports an operation on an empty collection.
    pub fn is_empty_collection(&self) -> bool {
        matches!(self, Error::Collection(err) if err.is_empty_collection())
    }

    /// Check if this error came from deserializing malformed input.
    pub fn is_deserialization_error(&self) -> bool {
        matches!(self, Error::Collection(err) if err.is_deserialization_error())
    }
}

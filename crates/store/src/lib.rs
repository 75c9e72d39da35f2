//! Abstract interface for ordered-list key-value stores.
//!
//! A list store keeps, under each string key, an ordered list of opaque
//! entries. Entries are addressed by their 0-based index only; they can be
//! appended at either end, replaced in place and read back by contiguous
//! inclusive index range. Missing keys behave as empty lists.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

/// Result type for list store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in list store operations
#[derive(Clone, Debug, thiserror::Error)]
pub enum StoreError {
    /// Storage backend error
    #[error("Store backend error: {0}")]
    Backend(String),

    /// The entry at `index` does not exist
    #[error("Index {index} out of range for list {key}")]
    IndexOutOfRange {
        /// The list key
        key: String,
        /// The offending index
        index: u64,
    },

    /// Operation not supported
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// The store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A trait representing an ordered-list store with asynchronous operations.
///
/// Each method is a single round trip and is atomic on its own. Sequences of
/// calls are not: callers that read an entry and then write it back may lose
/// updates made by other writers in between.
#[async_trait]
pub trait ListStore: Clone + Send + Sync + 'static {
    /// Removes the entire list stored under `key`.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Returns the number of entries in the list (0 for missing keys).
    async fn len(&self, key: &str) -> StoreResult<u64>;

    /// Prepends `value` as the new first entry, returning the new length.
    async fn push_front(&self, key: &str, value: Bytes) -> StoreResult<u64>;

    /// Appends `value` as the new last entry, returning the new length.
    async fn push_back(&self, key: &str, value: Bytes) -> StoreResult<u64>;

    /// Reads the entries with index in `[start, end]` (both inclusive).
    ///
    /// Indices past the end of the list are ignored, so the result may hold
    /// fewer entries than requested, or none.
    async fn range(&self, key: &str, start: u64, end: u64) -> StoreResult<Vec<Bytes>>;

    /// Removes all but the last `keep` entries. Keeping zero removes the key.
    async fn retain_last(&self, key: &str, keep: u64) -> StoreResult<()>;

    /// Replaces the entry at `index`.
    ///
    /// Fails with [`StoreError::IndexOutOfRange`] when no such entry exists.
    async fn set(&self, key: &str, index: u64, value: Bytes) -> StoreResult<()>;
}

/// Implement `ListStore` for `Arc<T>` where `T: ListStore`
#[async_trait]
impl<T: ListStore> ListStore for Arc<T> {
    async fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key).await
    }

    async fn len(&self, key: &str) -> StoreResult<u64> {
        (**self).len(key).await
    }

    async fn push_front(&self, key: &str, value: Bytes) -> StoreResult<u64> {
        (**self).push_front(key, value).await
    }

    async fn push_back(&self, key: &str, value: Bytes) -> StoreResult<u64> {
        (**self).push_back(key, value).await
    }

    async fn range(&self, key: &str, start: u64, end: u64) -> StoreResult<Vec<Bytes>> {
        (**self).range(key, start, end).await
    }

    async fn retain_last(&self, key: &str, keep: u64) -> StoreResult<()> {
        (**self).retain_last(key, keep).await
    }

    async fn set(&self, key: &str, index: u64, value: Bytes) -> StoreResult<()> {
        (**self).set(key, index, value).await
    }
}

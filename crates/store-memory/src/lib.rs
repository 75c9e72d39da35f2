//! In-memory (single node) implementation of list storage for local
//! development.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use redisk_store::{ListStore, StoreError, StoreResult};
use tokio::sync::RwLock;
use tracing::trace;

/// In-memory list store.
///
/// Clones share the same underlying map, the way several clients share one
/// remote store.
#[derive(Clone, Debug, Default)]
pub struct MemoryListStore {
    lists: Arc<RwLock<HashMap<String, VecDeque<Bytes>>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryListStore {
    /// Creates a new `MemoryListStore`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates losing (or regaining) the connection to the store.
    ///
    /// While offline every operation fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "memory store is offline".to_string(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl ListStore for MemoryListStore {
    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.check_online()?;
        self.lists.write().await.remove(key);
        Ok(())
    }

    async fn len(&self, key: &str) -> StoreResult<u64> {
        self.check_online()?;
        let lists = self.lists.read().await;
        Ok(lists.get(key).map_or(0, |list| list.len() as u64))
    }

    async fn push_front(&self, key: &str, value: Bytes) -> StoreResult<u64> {
        self.check_online()?;
        let mut lists = self.lists.write().await;
        let list = lists.entry(key.to_string()).or_default();
        list.push_front(value);
        Ok(list.len() as u64)
    }

    async fn push_back(&self, key: &str, value: Bytes) -> StoreResult<u64> {
        self.check_online()?;
        let mut lists = self.lists.write().await;
        let list = lists.entry(key.to_string()).or_default();
        list.push_back(value);
        Ok(list.len() as u64)
    }

    async fn range(&self, key: &str, start: u64, end: u64) -> StoreResult<Vec<Bytes>> {
        self.check_online()?;
        let lists = self.lists.read().await;

        let Some(list) = lists.get(key) else {
            return Ok(Vec::new());
        };

        if start > end {
            return Ok(Vec::new());
        }

        let count = usize::try_from(end - start)
            .unwrap_or(usize::MAX)
            .saturating_add(1);
        let start = usize::try_from(start).unwrap_or(usize::MAX);

        trace!(key, start, count, "range read");

        Ok(list.iter().skip(start).take(count).cloned().collect())
    }

    async fn retain_last(&self, key: &str, keep: u64) -> StoreResult<()> {
        self.check_online()?;
        let mut lists = self.lists.write().await;

        if keep == 0 {
            lists.remove(key);
            return Ok(());
        }

        if let Some(list) = lists.get_mut(key) {
            let keep = usize::try_from(keep).unwrap_or(usize::MAX);
            let excess = list.len().saturating_sub(keep);
            list.drain(..excess);
        }

        Ok(())
    }

    async fn set(&self, key: &str, index: u64, value: Bytes) -> StoreResult<()> {
        self.check_online()?;
        let mut lists = self.lists.write().await;

        let entry = lists
            .get_mut(key)
            .and_then(|list| list.get_mut(usize::try_from(index).ok()?));

        match entry {
            Some(entry) => {
                *entry = value;
                Ok(())
            }
            None => Err(StoreError::IndexOutOfRange {
                key: key.to_string(),
                index,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;

    async fn seeded(store: &MemoryListStore, key: &str, count: usize) {
        for i in 0..count {
            store
                .push_back(key, Bytes::from(format!("line {i}")))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_push_and_range() {
        let store = MemoryListStore::new();
        seeded(&store, "list", 5).await;

        let result = store.range("list", 1, 3).await.unwrap();

        assert_eq!(
            result,
            vec![
                Bytes::from("line 1"),
                Bytes::from("line 2"),
                Bytes::from("line 3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_range_past_end() {
        let store = MemoryListStore::new();
        seeded(&store, "list", 3).await;

        assert_eq!(store.range("list", 2, 100).await.unwrap().len(), 1);
        assert!(store.range("list", 3, 100).await.unwrap().is_empty());
        assert!(store.range("list", 2, 1).await.unwrap().is_empty());
        assert!(store.range("missing", 0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_push_front() {
        let store = MemoryListStore::new();
        seeded(&store, "list", 2).await;

        let len = store.push_front("list", Bytes::from("head")).await.unwrap();

        assert_eq!(len, 3);
        assert_eq!(
            store.range("list", 0, 0).await.unwrap(),
            vec![Bytes::from("head")]
        );
    }

    #[tokio::test]
    async fn test_set() {
        let store = MemoryListStore::new();
        seeded(&store, "list", 2).await;

        store.set("list", 1, Bytes::from("replaced")).await.unwrap();

        assert_eq!(
            store.range("list", 0, 1).await.unwrap(),
            vec![Bytes::from("line 0"), Bytes::from("replaced")]
        );
    }

    #[tokio::test]
    async fn test_set_out_of_range() {
        let store = MemoryListStore::new();

        let result = store.set("list", 0, Bytes::from("nope")).await;

        assert_matches!(result, Err(StoreError::IndexOutOfRange { index: 0, .. }));
    }

    #[tokio::test]
    async fn test_retain_last() {
        let store = MemoryListStore::new();
        seeded(&store, "list", 10).await;

        store.retain_last("list", 3).await.unwrap();

        assert_eq!(store.len("list").await.unwrap(), 3);
        assert_eq!(
            store.range("list", 0, 0).await.unwrap(),
            vec![Bytes::from("line 7")]
        );

        store.retain_last("list", 0).await.unwrap();
        assert_eq!(store.len("list").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryListStore::new();
        seeded(&store, "list", 3).await;

        store.delete("list").await.unwrap();

        assert_eq!(store.len("list").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_offline() {
        let store = MemoryListStore::new();
        store.set_offline(true);

        assert_matches!(store.len("list").await, Err(StoreError::Unavailable(_)));

        store.set_offline(false);
        assert_eq!(store.len("list").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_lists() {
        let store = MemoryListStore::new();
        let clone = store.clone();

        clone
            .push_back("redisk:list:log", Bytes::from_static(b"entry"))
            .await
            .unwrap();

        assert_eq!(store.len("redisk:list:log").await.unwrap(), 1);
    }
}

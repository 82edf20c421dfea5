//! # Batch Enrichment Cache
//!
//! Attaches secondary records to a page of primary records with a single
//! batched fetch.
//!
//! ```text
//! records ──► queue(key) ──► distinct keys ──► load_batch ──► key → value
//!    │                                                           │
//!    └──────────────────────── get(key) ◄────────────────────────┘
//! ```
//!
//! A key with no match yields `None`; the record is still emitted. A cache
//! lives for one page assembly and is never shared.

use crate::domain::StorageError;
use crate::ports::BatchLoader;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::debug;

/// Single-use cache of secondary records keyed by `K`.
#[derive(Debug)]
pub struct BatchEnrichmentCache<K, V> {
    queued: Vec<K>,
    seen: HashSet<K>,
    loaded: HashMap<K, V>,
}

impl<K, V> Default for BatchEnrichmentCache<K, V> {
    fn default() -> Self {
        Self {
            queued: Vec::new(),
            seen: HashSet::new(),
            loaded: HashMap::new(),
        }
    }
}

impl<K, V> BatchEnrichmentCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a key. Duplicates are dropped; first-seen order is kept.
    pub fn queue(&mut self, key: K) {
        if self.seen.insert(key.clone()) {
            self.queued.push(key);
        }
    }

    /// Number of distinct keys waiting to be loaded.
    pub fn pending(&self) -> usize {
        self.queued.len()
    }

    /// Fetch every queued key in one call. No call is made when nothing is
    /// queued.
    pub async fn load<L>(&mut self, loader: &L) -> Result<(), StorageError>
    where
        L: BatchLoader<K, V> + ?Sized,
    {
        if self.queued.is_empty() {
            return Ok(());
        }

        let keys = std::mem::take(&mut self.queued);
        let found = loader.load_batch(&keys).await?;
        debug!(requested = keys.len(), found = found.len(), "Enrichment batch loaded");

        self.loaded.extend(found);
        Ok(())
    }

    /// Loaded value for `key`. `None` is a miss, not an error.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.loaded.get(key)
    }
}

/// Pair each record with its secondary value, preserving record order.
pub async fn enrich<R, K, V, L, F>(
    records: Vec<R>,
    key_of: F,
    loader: &L,
) -> Result<Vec<(R, Option<V>)>, StorageError>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone,
    L: BatchLoader<K, V> + ?Sized,
    F: Fn(&R) -> K,
{
    let mut cache = BatchEnrichmentCache::new();
    for record in &records {
        cache.queue(key_of(record));
    }
    cache.load(loader).await?;

    Ok(records
        .into_iter()
        .map(|record| {
            let value = cache.get(&key_of(&record)).cloned();
            (record, value)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingLoader {
        calls: Mutex<Vec<Vec<u32>>>,
    }

    #[async_trait]
    impl BatchLoader<u32, String> for RecordingLoader {
        async fn load_batch(&self, keys: &[u32]) -> Result<HashMap<u32, String>, StorageError> {
            self.calls.lock().push(keys.to_vec());
            Ok(keys
                .iter()
                .filter(|k| **k != 404)
                .map(|k| (*k, format!("ledger-{}", k)))
                .collect())
        }
    }

    struct FailingLoader;

    #[async_trait]
    impl BatchLoader<u32, String> for FailingLoader {
        async fn load_batch(&self, _: &[u32]) -> Result<HashMap<u32, String>, StorageError> {
            Err(StorageError::Timeout)
        }
    }

    #[test]
    fn test_queue_dedupes_in_order() {
        let mut cache: BatchEnrichmentCache<u32, String> = BatchEnrichmentCache::new();
        for key in [5, 3, 5, 1, 3] {
            cache.queue(key);
        }
        assert_eq!(cache.pending(), 3);
        assert_eq!(cache.queued, vec![5, 3, 1]);
    }

    #[tokio::test]
    async fn test_one_fetch_for_distinct_keys() {
        let loader = RecordingLoader::default();
        let records = vec![7u32, 7, 8, 7, 8, 9];

        let enriched = enrich(records, |r| *r, &loader).await.unwrap();

        let calls = loader.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], vec![7, 8, 9]);
        assert_eq!(enriched.len(), 6);
        assert_eq!(enriched[3], (7, Some("ledger-7".to_string())));
    }

    #[tokio::test]
    async fn test_miss_is_none() {
        let loader = RecordingLoader::default();
        let enriched = enrich(vec![1u32, 404], |r| *r, &loader).await.unwrap();
        assert_eq!(enriched[0].1.as_deref(), Some("ledger-1"));
        assert_eq!(enriched[1], (404, None));
    }

    #[tokio::test]
    async fn test_empty_page_skips_fetch() {
        let loader = RecordingLoader::default();
        let enriched = enrich(Vec::<u32>::new(), |r| *r, &loader).await.unwrap();
        assert!(enriched.is_empty());
        assert!(loader.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let err = enrich(vec![1u32], |r| *r, &FailingLoader).await.unwrap_err();
        assert_eq!(err, StorageError::Timeout);
    }
}

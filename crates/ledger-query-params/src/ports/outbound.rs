//! # Outbound Ports (Driven Ports)
//!
//! Storage and live ledger state, reached only through these traits.

use crate::domain::{OfferRecord, StorageError};
use crate::query::OffersQuery;
use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;

/// Executes structured offer queries.
///
/// Records come back already ordered and limited per the query's
/// [`PageDirective`](crate::domain::PageDirective). Callers never re-sort.
#[async_trait]
pub trait OfferStore: Send + Sync {
    async fn get_offers(&self, query: &OffersQuery) -> Result<Vec<OfferRecord>, StorageError>;
}

/// Fetches secondary records for a set of keys in one round-trip.
///
/// Keys with no matching record are simply missing from the returned map.
#[async_trait]
pub trait BatchLoader<K, V>: Send + Sync
where
    K: Eq + Hash + Send + Sync,
{
    async fn load_batch(&self, keys: &[K]) -> Result<HashMap<K, V>, StorageError>;
}

/// Live upper bound of the ingested ledger sequence.
pub trait LedgerStateSource: Send + Sync {
    /// Sequence of the latest ingested ledger.
    fn current_upper_bound(&self) -> Result<u32, StorageError>;
}

use crate::domain::{LedgerRecord, OfferRecord, Order, StorageError};
use crate::ports::{BatchLoader, LedgerStateSource, OfferStore};
use crate::query::OffersQuery;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;

/// In-memory offer and ledger store.
///
/// Implements every outbound port so the full page pipeline can run without
/// a database. Batch ledger requests are recorded for inspection.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    offers: RwLock<Vec<OfferRecord>>,
    ledgers: RwLock<HashMap<u32, LedgerRecord>>,
    latest_ledger: RwLock<Option<u32>>,
    ledger_failure: RwLock<Option<StorageError>>,
    batch_requests: Mutex<Vec<Vec<u32>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_offer(&self, offer: OfferRecord) {
        self.offers.write().push(offer);
    }

    /// Insert a closed ledger. The highest sequence seen becomes the latest.
    pub fn insert_ledger(&self, ledger: LedgerRecord) {
        let sequence = ledger.sequence;
        self.ledgers.write().insert(sequence, ledger);

        let mut latest = self.latest_ledger.write();
        if latest.map_or(true, |current| sequence > current) {
            *latest = Some(sequence);
        }
    }

    /// Make every following ledger batch load fail with `error`.
    pub fn fail_ledger_loads(&self, error: StorageError) {
        *self.ledger_failure.write() = Some(error);
    }

    /// Keys of every batch ledger request, in call order.
    pub fn ledger_batch_requests(&self) -> Vec<Vec<u32>> {
        self.batch_requests.lock().clone()
    }
}

#[async_trait]
impl OfferStore for InMemoryLedgerStore {
    async fn get_offers(&self, query: &OffersQuery) -> Result<Vec<OfferRecord>, StorageError> {
        let bound = query.page.cursor_bound().ok_or_else(|| {
            StorageError::Query(format!("invalid cursor {:?}", query.page.cursor()))
        })?;
        let order = query.page.order();

        let mut matched: Vec<OfferRecord> = self
            .offers
            .read()
            .iter()
            .filter(|offer| match order {
                Order::Asc => offer.offer_id > bound,
                Order::Desc => offer.offer_id < bound,
            })
            .filter(|offer| query.seller.as_ref().map_or(true, |s| &offer.seller_id == s))
            .filter(|offer| query.selling.as_ref().map_or(true, |a| &offer.selling == a))
            .filter(|offer| query.buying.as_ref().map_or(true, |a| &offer.buying == a))
            .cloned()
            .collect();

        match order {
            Order::Asc => matched.sort_by_key(|offer| offer.offer_id),
            Order::Desc => matched.sort_by_key(|offer| std::cmp::Reverse(offer.offer_id)),
        }
        matched.truncate(usize::try_from(query.page.limit()).unwrap_or(usize::MAX));

        Ok(matched)
    }
}

#[async_trait]
impl BatchLoader<u32, LedgerRecord> for InMemoryLedgerStore {
    async fn load_batch(&self, keys: &[u32]) -> Result<HashMap<u32, LedgerRecord>, StorageError> {
        self.batch_requests.lock().push(keys.to_vec());

        if let Some(error) = self.ledger_failure.read().clone() {
            return Err(error);
        }

        let ledgers = self.ledgers.read();
        Ok(keys
            .iter()
            .filter_map(|key| ledgers.get(key).map(|ledger| (*key, ledger.clone())))
            .collect())
    }
}

impl LedgerStateSource for InMemoryLedgerStore {
    fn current_upper_bound(&self) -> Result<u32, StorageError> {
        self.latest_ledger
            .read()
            .ok_or_else(|| StorageError::Unavailable("no ledger ingested yet".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, Asset, PageDirective};
    use chrono::{TimeZone, Utc};

    fn offer(id: i64, seller: u8) -> OfferRecord {
        OfferRecord {
            offer_id: id,
            seller_id: AccountId::from_bytes([seller; 32]),
            selling: Asset::Native,
            buying: Asset::Native,
            amount: 1,
            price_n: 1,
            price_d: 1,
            last_modified_ledger: 1,
        }
    }

    fn store() -> InMemoryLedgerStore {
        let store = InMemoryLedgerStore::new();
        for id in [3, 1, 5, 2, 4] {
            store.insert_offer(offer(id, if id % 2 == 0 { 2 } else { 1 }));
        }
        store
    }

    fn query(cursor: &str, order: Order, limit: u64) -> OffersQuery {
        OffersQuery::new(PageDirective::new(cursor, order, limit).unwrap())
    }

    fn ids(offers: &[OfferRecord]) -> Vec<i64> {
        offers.iter().map(|o| o.offer_id).collect()
    }

    #[tokio::test]
    async fn test_keyset_ascending() {
        let offers = store().get_offers(&query("2", Order::Asc, 2)).await.unwrap();
        assert_eq!(ids(&offers), vec![3, 4]);
    }

    #[tokio::test]
    async fn test_keyset_descending_from_start() {
        let offers = store().get_offers(&query("", Order::Desc, 10)).await.unwrap();
        assert_eq!(ids(&offers), vec![5, 4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_seller_filter() {
        let mut q = query("", Order::Asc, 10);
        q.seller = Some(AccountId::from_bytes([2; 32]));
        let offers = store().get_offers(&q).await.unwrap();
        assert_eq!(ids(&offers), vec![2, 4]);
    }

    #[tokio::test]
    async fn test_non_numeric_cursor_rejected() {
        let err = store()
            .get_offers(&query("string", Order::Asc, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Query(_)));
    }

    #[tokio::test]
    async fn test_batch_load_records_requests() {
        let store = InMemoryLedgerStore::new();
        store.insert_ledger(LedgerRecord {
            sequence: 7,
            closed_at: Utc.with_ymd_and_hms(2019, 3, 1, 0, 0, 0).unwrap(),
        });

        let found = store.load_batch(&[7, 8]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&7));
        assert_eq!(store.ledger_batch_requests(), vec![vec![7, 8]]);
    }

    #[test]
    fn test_upper_bound() {
        let store = InMemoryLedgerStore::new();
        assert!(store.current_upper_bound().is_err());

        for sequence in [4, 9, 6] {
            store.insert_ledger(LedgerRecord {
                sequence,
                closed_at: Utc::now(),
            });
        }
        assert_eq!(store.current_upper_bound().unwrap(), 9);
    }
}

use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::{Exposer, IneligibleReason, PurchaseOutcome, SaleError};
use crate::cache::{CacheAsideReader, ReaderConfig};
use crate::item::{now_millis, SaleItem};
use crate::kv::KvStore;
use crate::store::SaleStore;

/// The flash-sale kernel's caller-facing surface.
///
/// Construction is explicit: the primary store and the shared key-value
/// service arrive as constructor arguments, so tests can substitute
/// in-memory fakes for either. The salt keys the purchase token; anyone
/// who can observe the hash construction can forge tokens, so this is an
/// anti-tampering gate, not a security boundary.
pub struct SaleService<S, K>
where
    S: SaleStore,
    K: KvStore,
{
    store: Arc<S>,
    reader: CacheAsideReader<K, S>,
    salt: String,
}

impl<S: SaleStore, K: KvStore> SaleService<S, K> {
    /// Create a service with default read-path tuning.
    pub fn new(store: Arc<S>, kv: Arc<K>, salt: impl Into<String>) -> Self {
        Self::with_config(store, kv, salt, ReaderConfig::default())
    }

    /// Create a service with explicit read-path tuning.
    pub fn with_config(
        store: Arc<S>,
        kv: Arc<K>,
        salt: impl Into<String>,
        config: ReaderConfig,
    ) -> Self {
        let reader = CacheAsideReader::new(kv, Arc::clone(&store), config);
        Self {
            store,
            reader,
            salt: salt.into(),
        }
    }

    /// Get an item, serving from cache under contention.
    pub fn get_item(&self, id: u64) -> Result<Option<SaleItem>, SaleError> {
        Ok(self.reader.get_item(id)?)
    }

    /// Expose the purchase token for an item, or the window timing info
    /// when the sale is not currently open.
    pub fn expose_purchase_token(&self, id: u64) -> Result<Exposer, SaleError> {
        let item = self.get_item(id)?.ok_or(SaleError::NotFound(id))?;
        let now = now_millis();
        if !item.window_contains(now) {
            return Ok(Exposer::closed(id, now, item.start_ms, item.end_ms));
        }
        Ok(Exposer::open(
            id,
            self.purchase_token(id),
            now,
            item.start_ms,
            item.end_ms,
        ))
    }

    /// Execute a purchase attempt as one transactional unit of work.
    ///
    /// Ineligible attempts (bad token, closed window) return before any
    /// store mutation. The insert-then-decrement ordering inside a single
    /// transaction is what keeps the outcome atomic: a failed decrement
    /// rolls the insert back, and a successful decrement always has a
    /// matching unique record.
    pub fn execute_purchase(
        &self,
        item_id: u64,
        buyer_id: u64,
        token: &str,
    ) -> Result<PurchaseOutcome, SaleError> {
        if token != self.purchase_token(item_id) {
            return Ok(PurchaseOutcome::Ineligible(IneligibleReason::TokenMismatch));
        }

        let item = self.get_item(item_id)?.ok_or(SaleError::NotFound(item_id))?;
        let now = now_millis();
        if !item.window_contains(now) {
            return Ok(PurchaseOutcome::Ineligible(IneligibleReason::OutsideWindow));
        }

        let result = self.purchase_txn(item_id, buyer_id, now);
        if let Err(e) = &result {
            log::error!(
                "purchase of item {} by buyer {} failed: {}",
                item_id,
                buyer_id,
                e
            );
        }
        result
    }

    fn purchase_txn(
        &self,
        item_id: u64,
        buyer_id: u64,
        now: i64,
    ) -> Result<PurchaseOutcome, SaleError> {
        let mut txn = self.store.begin()?;

        if txn.insert_purchase_if_absent(item_id, buyer_id, now)? == 0 {
            return Ok(PurchaseOutcome::Repeated);
        }

        if txn.decrement_if_available(item_id, now)? == 0 {
            // dropping the txn rolls the insert back
            return Ok(PurchaseOutcome::SoldOut);
        }

        let record = txn.load_purchase(item_id, buyer_id)?.ok_or_else(|| {
            SaleError::Internal(format!(
                "committed purchase for item {} buyer {} not readable",
                item_id, buyer_id
            ))
        })?;
        txn.commit()?;
        Ok(PurchaseOutcome::Success(record))
    }

    /// Keyed hash of the item identifier: SHA-256 hex of `"{id}/{salt}"`.
    pub fn purchase_token(&self, item_id: u64) -> String {
        let digest = Sha256::digest(format!("{}/{}", item_id, self.salt).as_bytes());
        hex::encode(digest)
    }
}

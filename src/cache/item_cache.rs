use std::sync::Arc;
use std::time::Duration;

use crate::codec;
use crate::item::SaleItem;
use crate::kv::KvStore;

/// Best-effort item cache over a [`KvStore`].
///
/// The cache holds a time-bounded, disposable copy of the item; it is
/// always safe to evict and reload. Accordingly every failure here
/// degrades: a get that cannot be served (kv error, corrupt payload)
/// reports a miss, and a put that fails is skipped. Failures are logged
/// at `warn!` and never surfaced.
pub struct ItemCache<S> {
    kv: Arc<S>,
    ttl: Duration,
}

impl<S: KvStore> ItemCache<S> {
    /// Create a cache with the given entry TTL.
    pub fn new(kv: Arc<S>, ttl: Duration) -> Self {
        Self { kv, ttl }
    }

    /// Cache key for an item id.
    pub fn key(id: u64) -> String {
        format!("sale:item:{}", id)
    }

    /// Look up an item. Any failure is a miss.
    pub fn get(&self, id: u64) -> Option<SaleItem> {
        let key = Self::key(id);
        let bytes = match self.kv.get(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("cache get for {} failed, treating as miss: {}", key, e);
                return None;
            }
        };
        match codec::decode(&bytes) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("cache entry {} undecodable, treating as miss: {}", key, e);
                None
            }
        }
    }

    /// Store an item with this cache's TTL. Best-effort.
    pub fn put(&self, item: &SaleItem) {
        let key = Self::key(item.id);
        let bytes = match codec::encode(item) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("skipping cache population for {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.kv.set_with_expiry(&key, &bytes, self.ttl) {
            log::warn!("cache set for {} failed, skipping population: {}", key, e);
        }
    }
}

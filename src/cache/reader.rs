use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use super::ItemCache;
use crate::item::SaleItem;
use crate::kv::KvStore;
use crate::lock::{owner_token, LeaseLock};
use crate::store::{ItemSource, StoreError};

/// Tunables for the stampede-guarded read path.
#[derive(Clone, Debug)]
pub struct ReaderConfig {
    /// Lock lease; must exceed the worst-case primary-store load time.
    pub lock_lease: Duration,
    /// Sleep between lock attempts while another caller is loading.
    pub backoff: Duration,
    /// Add uniform jitter in `[0, backoff / 2]` to each sleep, so a herd
    /// of waiters does not retry in lockstep.
    pub backoff_jitter: bool,
    /// Total time a caller may wait on another loader before giving up.
    pub max_wait: Duration,
    /// TTL for populated cache entries.
    pub cache_ttl: Duration,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            lock_lease: Duration::from_secs(1),
            backoff: Duration::from_millis(100),
            backoff_jitter: true,
            max_wait: Duration::from_secs(5),
            cache_ttl: Duration::from_secs(60 * 60),
        }
    }
}

/// Error type for the cache-aside read path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Gave up waiting for another caller to populate the cache.
    TimedOut(u64),
    /// The primary store failed.
    Store(StoreError),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::TimedOut(id) => {
                write!(f, "timed out waiting for cache population of item {}", id)
            }
            ReadError::Store(e) => write!(f, "read-through load failed: {}", e),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Store(e) => Some(e),
            ReadError::TimedOut(_) => None,
        }
    }
}

impl From<StoreError> for ReadError {
    fn from(err: StoreError) -> Self {
        ReadError::Store(err)
    }
}

/// Cache-aside reader with a per-item stampede guard.
///
/// On a miss, callers race for a leased lock scoped to the item id. The
/// winner loads from the injected [`ItemSource`] and populates the cache;
/// everyone else backs off and re-checks the cache, so at most one load
/// per item is in flight at a time (per lease window — an abnormally slow
/// loader can be passed by lease expiry).
pub struct CacheAsideReader<K, L> {
    cache: ItemCache<K>,
    locks: LeaseLock<K>,
    source: Arc<L>,
    config: ReaderConfig,
}

impl<K: KvStore, L: ItemSource> CacheAsideReader<K, L> {
    /// Create a reader over the shared key-value service and the given
    /// primary-store load capability.
    pub fn new(kv: Arc<K>, source: Arc<L>, config: ReaderConfig) -> Self {
        Self {
            cache: ItemCache::new(Arc::clone(&kv), config.cache_ttl),
            locks: LeaseLock::new(kv),
            source,
            config,
        }
    }

    /// Lock key scoping the load of one item.
    fn lock_key(id: u64) -> String {
        format!("sale:lock:item:{}", id)
    }

    /// Get an item, serving from cache when possible.
    ///
    /// Returns `Ok(None)` when the primary store has no such item, and
    /// `Err(ReadError::TimedOut)` when `max_wait` elapsed while another
    /// caller held the load lock.
    pub fn get_item(&self, id: u64) -> Result<Option<SaleItem>, ReadError> {
        let deadline = Instant::now() + self.config.max_wait;
        let lock_key = Self::lock_key(id);
        let token = owner_token();

        loop {
            // hit, or another caller just populated it
            if let Some(item) = self.cache.get(id) {
                return Ok(Some(item));
            }

            match self
                .locks
                .try_acquire_scoped(&lock_key, &token, self.config.lock_lease)
            {
                Ok(Some(_guard)) => {
                    let loaded = self.source.load_item(id)?;
                    if let Some(ref item) = loaded {
                        self.cache.put(item);
                    }
                    return Ok(loaded);
                }
                Ok(None) => {}
                Err(e) => {
                    // Losing the lock store costs only stampede
                    // protection; the read itself must still work.
                    log::warn!(
                        "lock store unavailable for {}, loading directly: {}",
                        lock_key,
                        e
                    );
                    return Ok(self.source.load_item(id)?);
                }
            }

            if Instant::now() >= deadline {
                return Err(ReadError::TimedOut(id));
            }
            thread::sleep(self.sleep_interval());
        }
    }

    fn sleep_interval(&self) -> Duration {
        if !self.config.backoff_jitter {
            return self.config.backoff;
        }
        let half = self.config.backoff.as_millis() as u64 / 2;
        let jitter = rand::rng().random_range(0..=half);
        self.config.backoff + Duration::from_millis(jitter)
    }
}

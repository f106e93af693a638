//! InMemoryKvStore - HashMap-backed key-value store for testing and
//! development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use super::{KvError, KvStore};

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl Entry {
    fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory key-value store with per-entry expiry.
///
/// Expiry is lazy: expired entries are treated as absent on access and
/// physically removed by the next write touching their key. Clone-friendly
/// via Arc — clones share storage.
#[derive(Clone)]
pub struct InMemoryKvStore {
    storage: Arc<RwLock<HashMap<String, Entry>>>,
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryKvStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| KvError::Unavailable("storage lock poisoned".into()))?;

        let now = Instant::now();
        Ok(storage
            .get(key)
            .filter(|e| !e.expired(now))
            .map(|e| e.value.clone()))
    }

    fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), KvError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| KvError::Unavailable("storage lock poisoned".into()))?;

        storage.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn set_if_absent(&self, key: &str, value: &[u8], ttl: Duration) -> Result<bool, KvError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| KvError::Unavailable("storage lock poisoned".into()))?;

        let now = Instant::now();
        if let Some(existing) = storage.get(key) {
            if !existing.expired(now) {
                return Ok(false);
            }
            storage.remove(key);
        }

        storage.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at: now + ttl,
            },
        );
        Ok(true)
    }

    fn compare_and_delete(&self, key: &str, expected: &[u8]) -> Result<bool, KvError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| KvError::Unavailable("storage lock poisoned".into()))?;

        let now = Instant::now();
        match storage.get(key) {
            Some(entry) if !entry.expired(now) && entry.value == expected => {
                storage.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn delete(&self, key: &str) -> Result<bool, KvError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| KvError::Unavailable("storage lock poisoned".into()))?;

        Ok(storage.remove(key).is_some())
    }
}

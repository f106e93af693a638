use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::LockError;
use crate::kv::KvStore;

/// Generate a fresh opaque ownership token.
pub fn owner_token() -> String {
    Uuid::new_v4().to_string()
}

/// Named, token-owned, time-bounded mutual exclusion over a [`KvStore`].
///
/// Acquisition never blocks; the caller decides retry policy. The lease
/// length should exceed the worst-case critical-section duration with
/// margin — a holder that outlives its lease trades a bounded window of
/// duplicate work for availability.
#[derive(Clone)]
pub struct LeaseLock<S> {
    kv: Arc<S>,
}

impl<S: KvStore> LeaseLock<S> {
    /// Create a lock handle over the given key-value store.
    pub fn new(kv: Arc<S>) -> Self {
        Self { kv }
    }

    /// Try to acquire `key` for `token` with the given lease.
    ///
    /// Returns `Ok(true)` iff this call created the lock entry.
    pub fn try_acquire(
        &self,
        key: &str,
        token: &str,
        lease: Duration,
    ) -> Result<bool, LockError> {
        Ok(self.kv.set_if_absent(key, token.as_bytes(), lease)?)
    }

    /// Release `key` if it is still owned by `token`.
    ///
    /// Silent no-op when the key is absent or owned by someone else: a
    /// release from a holder whose lease expired and was reacquired must
    /// never revoke the new owner's lock.
    pub fn release(&self, key: &str, token: &str) -> Result<(), LockError> {
        self.kv.compare_and_delete(key, token.as_bytes())?;
        Ok(())
    }

    /// Try to acquire `key`, returning a guard that releases on drop.
    ///
    /// `Ok(None)` means the lock is currently held by someone else.
    pub fn try_acquire_scoped(
        &self,
        key: &str,
        token: &str,
        lease: Duration,
    ) -> Result<Option<LockGuard<'_, S>>, LockError> {
        if self.try_acquire(key, token, lease)? {
            Ok(Some(LockGuard {
                lock: self,
                key: key.to_string(),
                token: token.to_string(),
            }))
        } else {
            Ok(None)
        }
    }
}

/// Scoped lock ownership: releases the lock on drop, on every exit path
/// including panics. Release failures are logged, not propagated — by
/// then the lease expiry will reclaim the entry anyway.
pub struct LockGuard<'a, S: KvStore> {
    lock: &'a LeaseLock<S>,
    key: String,
    token: String,
}

impl<S: KvStore> Drop for LockGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.release(&self.key, &self.token) {
            log::warn!("failed to release lock {}: {}", self.key, e);
        }
    }
}

//! Key-value service abstraction backing both the item cache and the
//! lock store.
//!
//! The two atomic primitives beyond plain get/set are
//! `set_if_absent` (create-if-missing with expiry, the lock acquire) and
//! `compare_and_delete` (check-then-delete, the owner-checked lock
//! release). A Redis-backed implementation would map these to
//! `SET NX PX` and a scripted compare-and-delete; [`InMemoryKvStore`] is
//! the default backend for tests and development.

mod in_memory;

use std::fmt;
use std::time::Duration;

/// Error type for key-value store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvError {
    /// The store is unreachable or its internal state is unusable.
    Unavailable(String),
}

impl fmt::Display for KvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KvError::Unavailable(msg) => write!(f, "kv store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for KvError {}

/// Binary key-value store with per-entry expiry.
///
/// All values carry a TTL; an expired entry behaves exactly like an
/// absent one for every operation.
pub trait KvStore: Send + Sync {
    /// Get the value under `key`. Returns None if absent or expired.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// Set `key` to `value`, expiring after `ttl`. Overwrites.
    fn set_with_expiry(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), KvError>;

    /// Atomically create `key` with `value` and `ttl` only if it does not
    /// already exist. Returns true iff this call created it.
    fn set_if_absent(&self, key: &str, value: &[u8], ttl: Duration) -> Result<bool, KvError>;

    /// Atomically delete `key` only if its current value equals
    /// `expected`. Returns true iff the entry was deleted.
    fn compare_and_delete(&self, key: &str, expected: &[u8]) -> Result<bool, KvError>;

    /// Unconditionally delete `key`. Returns true if it existed.
    fn delete(&self, key: &str) -> Result<bool, KvError>;
}

pub use in_memory::InMemoryKvStore;

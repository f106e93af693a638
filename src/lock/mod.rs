//! Distributed mutual exclusion with leases.
//!
//! A lock is a key in the shared [`KvStore`](crate::kv::KvStore) whose
//! value is an opaque ownership token and whose TTL bounds the lease. The
//! lease protects against a holder crashing mid-critical-section; the
//! token check on release prevents a late release from a timed-out holder
//! from revoking another holder's active lock.

mod error;
mod lease;

pub use error::LockError;
pub use lease::{owner_token, LeaseLock, LockGuard};

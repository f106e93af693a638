//! Primary store abstraction: the ACID-transactional home of items and
//! purchase records.
//!
//! [`SaleStore`] exposes the read path plus [`SaleStore::begin`], which
//! opens one transactional unit of work ([`SaleTxn`]) for the purchase
//! path. Dropping an uncommitted transaction rolls back its writes, so a
//! failed conditional decrement never leaves an orphaned purchase record.
//!
//! [`ItemSource`] is the single-method load capability the cache-aside
//! reader takes; every `SaleStore` is one.

mod in_memory;
mod store;

use std::fmt;

/// Error type for primary store operations.
///
/// `Unavailable` marks transient connectivity-style failures where a
/// retry may help; `Internal` marks unexpected failures where it won't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store is unreachable or its internal state is unusable.
    Unavailable(String),
    /// Unexpected store-side failure.
    Internal(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StoreError::Internal(msg) => write!(f, "store internal error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub use in_memory::InMemorySaleStore;
pub use store::{ItemSource, SaleStore, SaleTxn};

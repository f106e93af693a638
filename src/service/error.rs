use std::fmt;

use crate::cache::ReadError;
use crate::store::StoreError;

/// Error type for sale operations.
///
/// Terminal purchase states (`Repeated`, `SoldOut`, `Ineligible`) are not
/// errors — they live in
/// [`PurchaseOutcome`](crate::service::PurchaseOutcome). Variants here
/// mark failures where the caller may retry (`Store` with a transient
/// cause, `TimedOut`) or must investigate (`Internal`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleError {
    /// The item does not exist in the primary store.
    NotFound(u64),
    /// Gave up waiting for another caller to populate the cache.
    TimedOut(u64),
    /// Primary store failure.
    Store(StoreError),
    /// Invariant violation inside the purchase transaction.
    Internal(String),
}

impl fmt::Display for SaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleError::NotFound(id) => write!(f, "sale item {} not found", id),
            SaleError::TimedOut(id) => {
                write!(f, "timed out waiting for cache population of item {}", id)
            }
            SaleError::Store(e) => write!(f, "store error: {}", e),
            SaleError::Internal(msg) => write!(f, "internal sale error: {}", msg),
        }
    }
}

impl std::error::Error for SaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaleError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for SaleError {
    fn from(err: StoreError) -> Self {
        SaleError::Store(err)
    }
}

impl From<ReadError> for SaleError {
    fn from(err: ReadError) -> Self {
        match err {
            ReadError::TimedOut(id) => SaleError::TimedOut(id),
            ReadError::Store(e) => SaleError::Store(e),
        }
    }
}

//! Domain entities for a flash sale: the inventory item under contention
//! and the per-buyer purchase record.
//!
//! Timestamps are unix epoch milliseconds throughout. The sale window is
//! inclusive on both ends.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// A strictly limited, time-windowed inventory item.
///
/// `remaining` is never negative in the primary store and only ever
/// decreases during the sale, exclusively through the purchase
/// transaction's conditional decrement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: u64,
    pub name: String,
    pub price_cents: u64,
    pub remaining: u64,
    pub start_ms: i64,
    pub end_ms: i64,
    pub created_ms: i64,
}

impl SaleItem {
    /// Whether `now_ms` falls inside the sale window (inclusive bounds).
    pub fn window_contains(&self, now_ms: i64) -> bool {
        self.start_ms <= now_ms && now_ms <= self.end_ms
    }
}

/// The record of one buyer's successful purchase of one item.
///
/// At most one exists per `(item_id, buyer_id)` pair; the primary store's
/// uniqueness semantics enforce this, not application logic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub item_id: u64,
    pub buyer_id: u64,
    pub purchased_at_ms: i64,
    /// Snapshot of the item as read back inside the purchase transaction.
    pub item: SaleItem,
}

/// Current wall-clock time as unix epoch milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

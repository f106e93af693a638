use serde::{Deserialize, Serialize};

use crate::item::PurchaseRecord;

/// Why a purchase attempt was rejected before touching the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IneligibleReason {
    /// The presented token does not match the keyed hash for the item.
    TokenMismatch,
    /// The sale window is not currently open.
    OutsideWindow,
}

/// Terminal state of one purchase attempt.
///
/// Every variant is a final answer: retrying a `Repeated`, `SoldOut`, or
/// `Ineligible` outcome cannot change it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOutcome {
    /// The decrement succeeded and the record is committed.
    Success(PurchaseRecord),
    /// This buyer already purchased this item.
    Repeated,
    /// The conditional decrement affected zero rows.
    SoldOut,
    /// Rejected before any store mutation.
    Ineligible(IneligibleReason),
}

/// What a client gets when asking to purchase: either the keyed token, or
/// the timing information explaining why the sale is closed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exposer {
    pub item_id: u64,
    pub eligible: bool,
    /// Present iff `eligible`.
    pub token: Option<String>,
    pub now_ms: i64,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl Exposer {
    /// Sale window open: hand out the purchase token.
    pub fn open(item_id: u64, token: String, now_ms: i64, start_ms: i64, end_ms: i64) -> Self {
        Self {
            item_id,
            eligible: true,
            token: Some(token),
            now_ms,
            start_ms,
            end_ms,
        }
    }

    /// Sale window closed: return timing info so the client can tell
    /// "not yet" from "over".
    pub fn closed(item_id: u64, now_ms: i64, start_ms: i64, end_ms: i64) -> Self {
        Self {
            item_id,
            eligible: false,
            token: None,
            now_ms,
            start_ms,
            end_ms,
        }
    }
}

//! Caller-facing sale operations.
//!
//! [`SaleService`] exposes the three operations of the kernel:
//! `get_item` (stampede-guarded cache-aside read),
//! `expose_purchase_token` (the keyed anti-tampering token, only while
//! the sale window is open), and `execute_purchase` (duplicate-checked,
//! conditionally decremented, transactional purchase). Terminal purchase
//! states are data — [`PurchaseOutcome`] — not errors; [`SaleError`] is
//! reserved for genuinely unexpected failures.

mod error;
mod outcome;
mod sale_service;

pub use error::SaleError;
pub use outcome::{Exposer, IneligibleReason, PurchaseOutcome};
pub use sale_service::SaleService;

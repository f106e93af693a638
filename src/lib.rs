//! Flash-sale concurrency kernel.
//!
//! Many concurrent buyers race to decrement a finite, time-windowed
//! inventory count. This crate is the part of that system with real
//! concurrency hazards:
//!
//! - a **cache-aside read path** ([`CacheAsideReader`]) that guards cache
//!   misses with a per-item leased lock, so a cold entry triggers at most
//!   one primary-store load no matter how many callers miss at once;
//! - a **distributed lock** ([`LeaseLock`]) built on a key-value store's
//!   set-if-absent and compare-and-delete primitives, with token-checked
//!   release and scoped guards;
//! - a **purchase path** ([`SaleService::execute_purchase`]) that performs
//!   duplicate detection and a conditional inventory decrement as one
//!   transactional unit, so the count never goes negative and each buyer
//!   succeeds at most once.
//!
//! Stores are pluggable: [`KvStore`] abstracts the cache/lock service and
//! [`SaleStore`] the transactional primary store, with in-memory
//! implementations of both for tests and development.
//!
//! ```
//! use std::sync::Arc;
//! use flashsale::{now_millis, InMemoryKvStore, InMemorySaleStore, PurchaseOutcome, SaleItem, SaleService};
//!
//! let store = Arc::new(InMemorySaleStore::new());
//! let now = now_millis();
//! store.put_item(SaleItem {
//!     id: 1001,
//!     name: "limited widget".into(),
//!     price_cents: 999,
//!     remaining: 100,
//!     start_ms: now - 1_000,
//!     end_ms: now + 60_000,
//!     created_ms: now,
//! }).unwrap();
//!
//! let service = SaleService::new(store, Arc::new(InMemoryKvStore::new()), "a salt");
//! let exposer = service.expose_purchase_token(1001).unwrap();
//! let token = exposer.token.unwrap();
//! let outcome = service.execute_purchase(1001, 42, &token).unwrap();
//! assert!(matches!(outcome, PurchaseOutcome::Success(_)));
//! ```

mod cache;
mod codec;
mod item;
mod kv;
mod lock;
mod service;
mod store;

pub use cache::{CacheAsideReader, ItemCache, ReadError, ReaderConfig};
pub use codec::{decode, encode, CodecError};
pub use item::{now_millis, PurchaseRecord, SaleItem};
pub use kv::{InMemoryKvStore, KvError, KvStore};
pub use lock::{owner_token, LeaseLock, LockError, LockGuard};
pub use service::{Exposer, IneligibleReason, PurchaseOutcome, SaleError, SaleService};
pub use store::{InMemorySaleStore, ItemSource, SaleStore, SaleTxn, StoreError};

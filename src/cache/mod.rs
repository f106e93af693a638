//! Cache-aside read path.
//!
//! [`ItemCache`] is the best-effort cache layer: every failure — store
//! unreachable, corrupt payload — degrades to a miss, never to a
//! user-visible error. [`CacheAsideReader`] sits on top and guards the
//! miss path with a per-item leased lock so that a cold or expired entry
//! triggers at most one primary-store load per lease window, no matter
//! how many callers miss at once.

mod item_cache;
mod reader;

pub use item_cache::ItemCache;
pub use reader::{CacheAsideReader, ReadError, ReaderConfig};

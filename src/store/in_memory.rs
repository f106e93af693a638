//! InMemorySaleStore - mutex-guarded primary store for testing and
//! development.
//!
//! A transaction holds the store mutex for its whole extent, which
//! serializes units of work the way a SQL store's row-level locking
//! serializes conditional decrements against the same row. Rollback is an
//! undo journal applied when the transaction drops uncommitted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{SaleStore, SaleTxn, StoreError};
use crate::item::{PurchaseRecord, SaleItem};

#[derive(Default)]
struct Inner {
    items: HashMap<u64, SaleItem>,
    /// (item_id, buyer_id) -> purchased_at_ms
    purchases: HashMap<(u64, u64), i64>,
}

/// In-memory primary store. Clone-friendly via Arc — clones share state.
#[derive(Clone, Default)]
pub struct InMemorySaleStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemorySaleStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an item. Item creation is outside the sale kernel, so this
    /// is a plain upsert with no window or quantity checks.
    pub fn put_item(&self, item: SaleItem) -> Result<(), StoreError> {
        let mut inner = self.lock_inner()?;
        inner.items.insert(item.id, item);
        Ok(())
    }

    /// Number of purchase records currently stored (for assertions).
    pub fn purchase_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock_inner()?.purchases.len())
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".into()))
    }
}

impl SaleStore for InMemorySaleStore {
    fn load_item(&self, id: u64) -> Result<Option<SaleItem>, StoreError> {
        Ok(self.lock_inner()?.items.get(&id).cloned())
    }

    fn begin(&self) -> Result<Box<dyn SaleTxn + '_>, StoreError> {
        Ok(Box::new(InMemoryTxn {
            guard: self.lock_inner()?,
            undo: Vec::new(),
            committed: false,
        }))
    }
}

enum Undo {
    RemovePurchase(u64, u64),
    RestoreStock(u64),
}

struct InMemoryTxn<'a> {
    guard: MutexGuard<'a, Inner>,
    undo: Vec<Undo>,
    committed: bool,
}

impl SaleTxn for InMemoryTxn<'_> {
    fn insert_purchase_if_absent(
        &mut self,
        item_id: u64,
        buyer_id: u64,
        now_ms: i64,
    ) -> Result<u64, StoreError> {
        let key = (item_id, buyer_id);
        if self.guard.purchases.contains_key(&key) {
            return Ok(0);
        }
        self.guard.purchases.insert(key, now_ms);
        self.undo.push(Undo::RemovePurchase(item_id, buyer_id));
        Ok(1)
    }

    fn decrement_if_available(&mut self, item_id: u64, now_ms: i64) -> Result<u64, StoreError> {
        match self.guard.items.get_mut(&item_id) {
            Some(item) if item.remaining > 0 && item.window_contains(now_ms) => {
                item.remaining -= 1;
                self.undo.push(Undo::RestoreStock(item_id));
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    fn load_purchase(
        &self,
        item_id: u64,
        buyer_id: u64,
    ) -> Result<Option<PurchaseRecord>, StoreError> {
        let purchased_at_ms = match self.guard.purchases.get(&(item_id, buyer_id)) {
            Some(ts) => *ts,
            None => return Ok(None),
        };
        let item = self.guard.items.get(&item_id).cloned().ok_or_else(|| {
            StoreError::Internal(format!("purchase exists for missing item {}", item_id))
        })?;
        Ok(Some(PurchaseRecord {
            item_id,
            buyer_id,
            purchased_at_ms,
            item,
        }))
    }

    fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        self.committed = true;
        Ok(())
    }
}

impl Drop for InMemoryTxn<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        while let Some(op) = self.undo.pop() {
            match op {
                Undo::RemovePurchase(item_id, buyer_id) => {
                    self.guard.purchases.remove(&(item_id, buyer_id));
                }
                Undo::RestoreStock(item_id) => {
                    if let Some(item) = self.guard.items.get_mut(&item_id) {
                        item.remaining += 1;
                    }
                }
            }
        }
    }
}

use super::StoreError;
use crate::item::{PurchaseRecord, SaleItem};

/// Single-method load capability for the cache-aside read path.
///
/// Keeping the reader behind this seam decouples it from any particular
/// store implementation and lets tests substitute a counting fake.
pub trait ItemSource: Send + Sync {
    /// Load an item by id. Returns None if absent.
    fn load_item(&self, id: u64) -> Result<Option<SaleItem>, StoreError>;
}

/// The primary store: item reads plus transactional purchase writes.
pub trait SaleStore: Send + Sync {
    /// Load an item by id. Returns None if absent.
    fn load_item(&self, id: u64) -> Result<Option<SaleItem>, StoreError>;

    /// Open one transactional unit of work for a purchase attempt.
    fn begin(&self) -> Result<Box<dyn SaleTxn + '_>, StoreError>;
}

// Blanket implementation: every SaleStore can serve the read path.
impl<S: SaleStore> ItemSource for S {
    fn load_item(&self, id: u64) -> Result<Option<SaleItem>, StoreError> {
        SaleStore::load_item(self, id)
    }
}

/// One transactional unit of work against the primary store.
///
/// Writes are atomic as a group: `commit` makes them durable, and
/// dropping the transaction without committing rolls them all back.
pub trait SaleTxn {
    /// Insert a purchase record for `(item_id, buyer_id)` unless one
    /// already exists. Returns the number of rows affected — 0 on a
    /// duplicate, never an error. Implementations over SQL must map a
    /// uniqueness-constraint conflict to this same zero-rows contract
    /// (insert-ignore style), not to a fault.
    fn insert_purchase_if_absent(
        &mut self,
        item_id: u64,
        buyer_id: u64,
        now_ms: i64,
    ) -> Result<u64, StoreError>;

    /// Decrement the item's remaining quantity by one, only where
    /// `remaining > 0` and `now_ms` is inside the sale window, as a
    /// single atomic read-modify-write. Returns rows affected. This
    /// predicate is the sole oversell guard.
    fn decrement_if_available(&mut self, item_id: u64, now_ms: i64) -> Result<u64, StoreError>;

    /// Read back the purchase record for `(item_id, buyer_id)` with its
    /// item snapshot, as seen inside this transaction.
    fn load_purchase(
        &self,
        item_id: u64,
        buyer_id: u64,
    ) -> Result<Option<PurchaseRecord>, StoreError>;

    /// Commit the unit of work.
    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

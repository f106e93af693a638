//! Concurrent purchase properties: success counts, duplicate handling,
//! oversell protection, and zero-mutation ineligible paths.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use flashsale::{
    now_millis, InMemoryKvStore, InMemorySaleStore, IneligibleReason, PurchaseOutcome,
    PurchaseRecord, SaleItem, SaleService, SaleStore, SaleTxn, StoreError,
};

const SALT: &str = "integration salt";

fn active_item(id: u64, remaining: u64) -> SaleItem {
    let now = now_millis();
    SaleItem {
        id,
        name: format!("item-{}", id),
        price_cents: 2_500,
        remaining,
        start_ms: now - 1_000,
        end_ms: now + 60_000,
        created_ms: now - 2_000,
    }
}

fn service(store: Arc<InMemorySaleStore>) -> SaleService<InMemorySaleStore, InMemoryKvStore> {
    SaleService::new(store, Arc::new(InMemoryKvStore::new()), SALT)
}

fn run_concurrent_purchases(
    svc: Arc<SaleService<InMemorySaleStore, InMemoryKvStore>>,
    item_id: u64,
    buyers: Vec<u64>,
) -> Vec<PurchaseOutcome> {
    let token = svc.purchase_token(item_id);
    let handles: Vec<_> = buyers
        .into_iter()
        .map(|buyer| {
            let svc = Arc::clone(&svc);
            let token = token.clone();
            thread::spawn(move || svc.execute_purchase(item_id, buyer, &token).unwrap())
        })
        .collect();
    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn two_buyers_one_unit() {
    let store = Arc::new(InMemorySaleStore::new());
    store.put_item(active_item(1001, 1)).unwrap();
    let svc = Arc::new(service(Arc::clone(&store)));

    let outcomes = run_concurrent_purchases(Arc::clone(&svc), 1001, vec![7, 8]);

    let successes: Vec<&PurchaseRecord> = outcomes
        .iter()
        .filter_map(|o| match o {
            PurchaseOutcome::Success(r) => Some(r),
            _ => None,
        })
        .collect();
    assert_eq!(successes.len(), 1);
    assert!([7, 8].contains(&successes[0].buyer_id));
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| **o == PurchaseOutcome::SoldOut)
            .count(),
        1
    );
    assert_eq!(store.load_item(1001).unwrap().unwrap().remaining, 0);
}

#[test]
fn success_count_is_min_of_stock_and_buyers() {
    let store = Arc::new(InMemorySaleStore::new());
    store.put_item(active_item(1, 5)).unwrap();
    let svc = Arc::new(service(Arc::clone(&store)));

    let outcomes = run_concurrent_purchases(Arc::clone(&svc), 1, (0..20).collect());

    let successes = outcomes
        .iter()
        .filter(|o| matches!(o, PurchaseOutcome::Success(_)))
        .count();
    let sold_out = outcomes
        .iter()
        .filter(|o| **o == PurchaseOutcome::SoldOut)
        .count();
    assert_eq!(successes, 5);
    assert_eq!(sold_out, 15);
    assert_eq!(store.load_item(1).unwrap().unwrap().remaining, 0);
    assert_eq!(store.purchase_count().unwrap(), 5);
}

#[test]
fn more_stock_than_buyers_leaves_remainder() {
    let store = Arc::new(InMemorySaleStore::new());
    store.put_item(active_item(1, 50)).unwrap();
    let svc = Arc::new(service(Arc::clone(&store)));

    let outcomes = run_concurrent_purchases(Arc::clone(&svc), 1, (0..8).collect());

    assert!(outcomes
        .iter()
        .all(|o| matches!(o, PurchaseOutcome::Success(_))));
    assert_eq!(store.load_item(1).unwrap().unwrap().remaining, 42);
}

#[test]
fn repeated_buyer_succeeds_exactly_once() {
    let store = Arc::new(InMemorySaleStore::new());
    store.put_item(active_item(1, 10)).unwrap();
    let svc = Arc::new(service(Arc::clone(&store)));

    // the same buyer hammers the endpoint from ten threads
    let outcomes = run_concurrent_purchases(Arc::clone(&svc), 1, vec![7; 10]);

    let successes = outcomes
        .iter()
        .filter(|o| matches!(o, PurchaseOutcome::Success(_)))
        .count();
    let repeats = outcomes
        .iter()
        .filter(|o| **o == PurchaseOutcome::Repeated)
        .count();
    assert_eq!(successes, 1);
    assert_eq!(repeats, 9);
    assert_eq!(store.load_item(1).unwrap().unwrap().remaining, 9);
    assert_eq!(store.purchase_count().unwrap(), 1);
}

/// Store wrapper that counts mutation attempts, for asserting that
/// ineligible purchases never touch the primary store.
struct CountingStore {
    inner: InMemorySaleStore,
    inserts: AtomicUsize,
    decrements: AtomicUsize,
}

impl CountingStore {
    fn new(inner: InMemorySaleStore) -> Self {
        Self {
            inner,
            inserts: AtomicUsize::new(0),
            decrements: AtomicUsize::new(0),
        }
    }
}

impl SaleStore for CountingStore {
    fn load_item(&self, id: u64) -> Result<Option<SaleItem>, StoreError> {
        SaleStore::load_item(&self.inner, id)
    }

    fn begin(&self) -> Result<Box<dyn SaleTxn + '_>, StoreError> {
        Ok(Box::new(CountingTxn {
            inner: self.inner.begin()?,
            inserts: &self.inserts,
            decrements: &self.decrements,
        }))
    }
}

struct CountingTxn<'a> {
    inner: Box<dyn SaleTxn + 'a>,
    inserts: &'a AtomicUsize,
    decrements: &'a AtomicUsize,
}

impl SaleTxn for CountingTxn<'_> {
    fn insert_purchase_if_absent(
        &mut self,
        item_id: u64,
        buyer_id: u64,
        now_ms: i64,
    ) -> Result<u64, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_purchase_if_absent(item_id, buyer_id, now_ms)
    }

    fn decrement_if_available(&mut self, item_id: u64, now_ms: i64) -> Result<u64, StoreError> {
        self.decrements.fetch_add(1, Ordering::SeqCst);
        self.inner.decrement_if_available(item_id, now_ms)
    }

    fn load_purchase(
        &self,
        item_id: u64,
        buyer_id: u64,
    ) -> Result<Option<PurchaseRecord>, StoreError> {
        self.inner.load_purchase(item_id, buyer_id)
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        this.inner.commit()
    }
}

#[test]
fn bad_token_performs_zero_mutations() {
    let inner = InMemorySaleStore::new();
    inner.put_item(active_item(1, 5)).unwrap();
    let store = Arc::new(CountingStore::new(inner));
    let svc = SaleService::new(Arc::clone(&store), Arc::new(InMemoryKvStore::new()), SALT);

    let outcome = svc.execute_purchase(1, 7, "not the token").unwrap();
    assert_eq!(
        outcome,
        PurchaseOutcome::Ineligible(IneligibleReason::TokenMismatch)
    );
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    assert_eq!(store.decrements.load(Ordering::SeqCst), 0);
}

#[test]
fn closed_window_performs_zero_mutations() {
    let inner = InMemorySaleStore::new();
    let mut item = active_item(1, 5);
    item.start_ms = 0;
    item.end_ms = 1;
    inner.put_item(item).unwrap();
    let store = Arc::new(CountingStore::new(inner));
    let svc = SaleService::new(Arc::clone(&store), Arc::new(InMemoryKvStore::new()), SALT);

    let token = svc.purchase_token(1);
    let outcome = svc.execute_purchase(1, 7, &token).unwrap();
    assert_eq!(
        outcome,
        PurchaseOutcome::Ineligible(IneligibleReason::OutsideWindow)
    );
    assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    assert_eq!(store.decrements.load(Ordering::SeqCst), 0);
}

#[test]
fn quantity_never_observed_negative() {
    let store = Arc::new(InMemorySaleStore::new());
    store.put_item(active_item(1, 3)).unwrap();
    let svc = Arc::new(service(Arc::clone(&store)));

    // several waves of contention against a small stock
    for wave in 0u64..4 {
        let buyers = (wave * 10..wave * 10 + 10).collect();
        run_concurrent_purchases(Arc::clone(&svc), 1, buyers);
        let remaining = store.load_item(1).unwrap().unwrap().remaining;
        assert!(remaining <= 3);
    }
    assert_eq!(store.load_item(1).unwrap().unwrap().remaining, 0);
    assert_eq!(store.purchase_count().unwrap(), 3);
}

//! The portfolio ledger: one account, linearized mutations.

use papertrade_core::error::StorageError;
use papertrade_core::traits::{LedgerObserver, SnapshotStore, SubscriptionId};
use papertrade_core::types::{
    AccountSnapshot, LedgerCommand, OrderOutcome, OrderRequest, OrderStamp, Outcome, Transition,
    DEFAULT_CASH,
};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::store::MemoryStore;

struct LedgerState {
    snapshot: AccountSnapshot,
    version: u64,
}

/// Single-account portfolio ledger.
///
/// Each mutation takes the state lock, applies the reducer, persists the
/// result, bumps the version and queues the snapshot for publication before
/// the lock is released. Observers are called afterwards, outside the state
/// lock, strictly in version order. A mutation returns only once its own
/// snapshot has been delivered.
///
/// Observers may read the ledger but must not mutate it.
pub struct PortfolioLedger {
    account_id: String,
    default_cash: Decimal,
    state: Mutex<LedgerState>,
    store: Arc<dyn SnapshotStore>,
    observers: Mutex<Vec<(SubscriptionId, Arc<dyn LedgerObserver>)>>,
    next_subscription: AtomicU64,
    last_persist_error: Mutex<Option<String>>,
    pending: Mutex<VecDeque<(AccountSnapshot, u64)>>,
    publishing: Mutex<()>,
}

impl PortfolioLedger {
    /// Open an account, loading its snapshot from `store` if one exists.
    ///
    /// A missing snapshot starts a fresh account with `default_cash`; nothing
    /// is written until the first mutation. A corrupt snapshot is an error.
    pub fn open(
        account_id: impl Into<String>,
        default_cash: Decimal,
        store: Arc<dyn SnapshotStore>,
    ) -> Result<Self, StorageError> {
        let account_id = account_id.into();
        let default_cash = default_cash.max(Decimal::ZERO);

        let snapshot = match store.load(&account_id)? {
            Some(snapshot) => {
                tracing::info!(
                    account = %account_id,
                    store = store.name(),
                    cash = %snapshot.cash(),
                    positions = snapshot.position_count(),
                    "Restored account"
                );
                snapshot
            }
            None => {
                tracing::info!(
                    account = %account_id,
                    store = store.name(),
                    cash = %default_cash,
                    "Starting new account"
                );
                AccountSnapshot::new(default_cash)
            }
        };

        Ok(Self {
            account_id,
            default_cash,
            state: Mutex::new(LedgerState {
                snapshot,
                version: 0,
            }),
            store,
            observers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            last_persist_error: Mutex::new(None),
            pending: Mutex::new(VecDeque::new()),
            publishing: Mutex::new(()),
        })
    }

    /// Fresh ledger backed by a [`MemoryStore`], with the standard cash.
    pub fn in_memory() -> Self {
        Self {
            account_id: "portfolio".to_string(),
            default_cash: DEFAULT_CASH,
            state: Mutex::new(LedgerState {
                snapshot: AccountSnapshot::default(),
                version: 0,
            }),
            store: Arc::new(MemoryStore::new()),
            observers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
            last_persist_error: Mutex::new(None),
            pending: Mutex::new(VecDeque::new()),
            publishing: Mutex::new(()),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn default_cash(&self) -> Decimal {
        self.default_cash
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> AccountSnapshot {
        self.lock_state().snapshot.clone()
    }

    /// Number of accepted mutations since the ledger was opened.
    pub fn version(&self) -> u64 {
        self.lock_state().version
    }

    /// Start over with the default cash. Always succeeds.
    pub fn reset(&self) -> AccountSnapshot {
        self.dispatch(LedgerCommand::Reset {
            cash: self.default_cash,
        })
        .snapshot
    }

    /// Start over with `max(size, 0)` cash, clearing positions and orders.
    pub fn set_account_size(&self, size: Decimal) -> AccountSnapshot {
        self.dispatch(LedgerCommand::SetAccountSize(size)).snapshot
    }

    /// Execute a buy or sell. Rejections leave the account untouched.
    pub fn submit_order(&self, request: OrderRequest) -> OrderOutcome {
        to_order_outcome(self.dispatch(LedgerCommand::Submit(request)))
    }

    /// Sell the whole position in `symbol` at its average cost.
    pub fn close_position(&self, symbol: &str) -> OrderOutcome {
        to_order_outcome(self.dispatch(LedgerCommand::ClosePosition(symbol.to_string())))
    }

    /// Register an observer for every future published snapshot.
    pub fn subscribe(&self, observer: Arc<dyn LedgerObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        lock(&self.observers).push((id, observer));
        tracing::debug!(subscription = %id, "Observer subscribed");
        id
    }

    /// Remove an observer. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = lock(&self.observers);
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        before != observers.len()
    }

    /// Message of the most recent failed save, cleared by the next success.
    pub fn last_persist_error(&self) -> Option<String> {
        lock(&self.last_persist_error).clone()
    }

    fn dispatch(&self, command: LedgerCommand) -> Transition {
        let stamp = OrderStamp::now();

        let transition = {
            let mut state = self.lock_state();
            let transition = state.snapshot.apply(&command, stamp);

            if let Outcome::Rejected(reason) = &transition.outcome {
                tracing::warn!(
                    account = %self.account_id,
                    command = ?command,
                    %reason,
                    "Ledger command rejected"
                );
                return transition;
            }

            state.snapshot = transition.snapshot.clone();
            state.version += 1;
            tracing::debug!(
                account = %self.account_id,
                version = state.version,
                cash = %state.snapshot.cash(),
                equity = %state.snapshot.equity(),
                "Ledger transition applied"
            );
            self.persist(&state.snapshot);
            lock(&self.pending).push_back((state.snapshot.clone(), state.version));
            transition
        };

        match &transition.outcome {
            Outcome::Executed(order) => tracing::info!(
                account = %self.account_id,
                order_id = %order.id,
                symbol = %order.symbol,
                side = %order.side,
                quantity = order.quantity,
                price = %order.price,
                "Order executed"
            ),
            _ => tracing::info!(
                account = %self.account_id,
                cash = %transition.snapshot.cash(),
                "Account reset"
            ),
        }

        self.publish_pending();
        transition
    }

    fn persist(&self, snapshot: &AccountSnapshot) {
        let result = self.store.save(&self.account_id, snapshot);
        let mut last_error = lock(&self.last_persist_error);
        match result {
            Ok(()) => *last_error = None,
            Err(e) => {
                tracing::error!(
                    account = %self.account_id,
                    store = self.store.name(),
                    error = %e,
                    "Failed to persist account snapshot"
                );
                *last_error = Some(e.to_string());
            }
        }
    }

    /// Deliver queued snapshots in version order.
    ///
    /// Whoever holds `publishing` drains the queue, including entries pushed
    /// by other writers meanwhile. The state lock is never held here.
    fn publish_pending(&self) {
        let _publishing = lock(&self.publishing);
        loop {
            let next = lock(&self.pending).pop_front();
            let Some((snapshot, version)) = next else {
                break;
            };
            self.notify(&snapshot, version);
        }
    }

    fn notify(&self, snapshot: &AccountSnapshot, version: u64) {
        let observers: Vec<Arc<dyn LedgerObserver>> = lock(&self.observers)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        for observer in observers {
            observer.on_snapshot(snapshot, version);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, LedgerState> {
        lock(&self.state)
    }
}

impl std::fmt::Debug for PortfolioLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioLedger")
            .field("account_id", &self.account_id)
            .field("store", &self.store.name())
            .field("version", &self.version())
            .finish_non_exhaustive()
    }
}

/// The guarded values are replaced wholesale, so a poisoned lock still holds
/// a consistent value.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn to_order_outcome(transition: Transition) -> OrderOutcome {
    match transition.outcome {
        Outcome::Executed(order) => OrderOutcome::Accepted(order),
        Outcome::Rejected(reason) => OrderOutcome::Rejected(reason),
        Outcome::Replaced => unreachable!("order commands never replace the snapshot"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonFileStore;
    use papertrade_core::error::RejectReason;
    use papertrade_core::types::Side;
    use rust_decimal_macros::dec;
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        fn load(&self, _: &str) -> Result<Option<AccountSnapshot>, StorageError> {
            Ok(None)
        }

        fn save(&self, _: &str, _: &AccountSnapshot) -> Result<(), StorageError> {
            Err(StorageError::Corrupt("disk full".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_ledger_buy() {
        let ledger = PortfolioLedger::in_memory();

        let outcome = ledger.submit_order(OrderRequest::buy("aapl", 100, dec!(150)));
        let OrderOutcome::Accepted(order) = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(order.symbol, "AAPL");
        assert_eq!(order.side, Side::Buy);

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.cash(), dec!(85000));
        assert!(snapshot.position("AAPL").is_some());
        assert_eq!(ledger.version(), 1);
    }

    #[test]
    fn test_ledger_close_position() {
        let ledger = PortfolioLedger::in_memory();
        ledger.submit_order(OrderRequest::buy("AAPL", 10, dec!(50)));
        let cash_before = ledger.snapshot().cash();

        let outcome = ledger.close_position("AAPL");
        assert!(outcome.is_accepted());

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.cash(), cash_before + dec!(500));
        assert!(snapshot.position("AAPL").is_none());
        let last = snapshot.orders().last().unwrap();
        assert_eq!((last.side, last.price), (Side::Sell, dec!(50)));
    }

    #[test]
    fn test_rejection_does_not_bump_version() {
        let ledger = PortfolioLedger::in_memory();
        ledger.set_account_size(dec!(1000));
        let version = ledger.version();

        let outcome = ledger.submit_order(OrderRequest::buy("AAPL", 20, dec!(100)));
        assert!(matches!(
            outcome,
            OrderOutcome::Rejected(RejectReason::InsufficientFunds { .. })
        ));
        assert_eq!(ledger.version(), version);
        assert_eq!(ledger.snapshot(), AccountSnapshot::new(dec!(1000)));
    }

    #[test]
    fn test_reset_and_set_account_size() {
        let ledger = PortfolioLedger::in_memory();
        ledger.submit_order(OrderRequest::buy("AAPL", 1, dec!(10)));

        let snapshot = ledger.set_account_size(dec!(5000));
        assert_eq!(snapshot.cash(), dec!(5000));
        assert_eq!(snapshot.equity(), dec!(5000));
        assert!(snapshot.positions().is_empty());
        assert!(snapshot.orders().is_empty());

        let snapshot = ledger.reset();
        assert_eq!(snapshot, AccountSnapshot::default());
    }

    #[test]
    fn test_observers_receive_increasing_versions() {
        let ledger = PortfolioLedger::in_memory();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = ledger.subscribe(Arc::new(move |snapshot: &AccountSnapshot, version: u64| {
            sink.lock().unwrap().push((version, snapshot.cash()));
        }));

        ledger.submit_order(OrderRequest::buy("AAPL", 1, dec!(100)));
        ledger.submit_order(OrderRequest::sell("AAPL", 5, dec!(100))); // rejected
        ledger.reset();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(1, dec!(99900)), (2, dec!(100000))]
        );

        assert!(ledger.unsubscribe(id));
        assert!(!ledger.unsubscribe(id));
        ledger.reset();
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_observer_can_read_ledger() {
        let ledger = Arc::new(PortfolioLedger::in_memory());
        let calls = Arc::new(AtomicUsize::new(0));

        let weak = Arc::downgrade(&ledger);
        let counter = Arc::clone(&calls);
        ledger.subscribe(Arc::new(move |snapshot: &AccountSnapshot, _: u64| {
            // The state lock is released before notifying.
            if let Some(ledger) = weak.upgrade() {
                assert_eq!(&ledger.snapshot(), snapshot);
            }
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        ledger.submit_order(OrderRequest::buy("MSFT", 2, dec!(300)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_notifications_follow_version_order() {
        let ledger = Arc::new(PortfolioLedger::in_memory());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let started_tx = Mutex::new(started_tx);

        let sink = Arc::clone(&seen);
        ledger.subscribe(Arc::new(move |snapshot: &AccountSnapshot, version: u64| {
            if version == 1 {
                // Hold up delivery of v1 while the second writer commits v2.
                started_tx.lock().unwrap().send(()).unwrap();
                std::thread::sleep(std::time::Duration::from_millis(50));
            }
            sink.lock().unwrap().push((version, snapshot.position_count()));
        }));

        let buyer = {
            let ledger = Arc::clone(&ledger);
            std::thread::spawn(move || ledger.submit_order(OrderRequest::buy("AAPL", 1, dec!(100))))
        };
        started_rx.recv().unwrap();
        let sell = ledger.submit_order(OrderRequest::sell("AAPL", 1, dec!(100)));

        assert!(buyer.join().unwrap().is_accepted());
        assert!(sell.is_accepted());
        // The sell returned only after its own snapshot was delivered.
        assert_eq!(*seen.lock().unwrap(), vec![(1, 1), (2, 0)]);
        assert_eq!(ledger.snapshot().position_count(), 0);
    }

    #[test]
    fn test_persist_failure_keeps_state() {
        let ledger = PortfolioLedger::open("portfolio", dec!(1000), Arc::new(FailingStore)).unwrap();

        let outcome = ledger.submit_order(OrderRequest::buy("AAPL", 1, dec!(100)));
        assert!(outcome.is_accepted());
        assert_eq!(ledger.snapshot().cash(), dec!(900));
        assert_eq!(
            ledger.last_persist_error().as_deref(),
            Some("Corrupt snapshot: disk full")
        );
    }

    #[test]
    fn test_open_restores_from_json_store() {
        let dir = TempDir::new().unwrap();
        let store: Arc<dyn SnapshotStore> = Arc::new(JsonFileStore::new(dir.path()));

        {
            let ledger = PortfolioLedger::open("portfolio", dec!(100000), Arc::clone(&store)).unwrap();
            ledger.submit_order(OrderRequest::buy("AAPL", 5, dec!(100)));
            ledger.submit_order(OrderRequest::buy("AAPL", 5, dec!(120)));
            assert!(ledger.last_persist_error().is_none());
        }

        let ledger = PortfolioLedger::open("portfolio", dec!(1), store).unwrap();
        let snapshot = ledger.snapshot();
        let position = snapshot.position("AAPL").unwrap();
        assert_eq!(position.quantity, 10);
        assert_eq!(position.avg_price, dec!(110));
        assert_eq!(snapshot.orders().len(), 2);
        assert_eq!(ledger.version(), 0);
    }

    #[test]
    fn test_open_rejects_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("portfolio.json"),
            r#"{"cash":"5","positions":[{"symbol":"AAPL","quantity":0,"avg_price":"1"}]}"#,
        )
        .unwrap();

        let result = PortfolioLedger::open(
            "portfolio",
            dec!(100000),
            Arc::new(JsonFileStore::new(dir.path())),
        );
        assert!(matches!(result, Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn test_concurrent_orders_are_linearized() {
        let ledger = Arc::new(PortfolioLedger::in_memory());
        ledger.set_account_size(dec!(1000));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    (0..50)
                        .filter(|_| {
                            ledger
                                .submit_order(OrderRequest::buy("AAPL", 1, dec!(3)))
                                .is_accepted()
                        })
                        .count()
                })
            })
            .collect();

        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        let snapshot = ledger.snapshot();

        // 1000 / 3 = 333 shares fit
        assert_eq!(accepted, 333);
        assert_eq!(snapshot.cash(), dec!(1));
        assert_eq!(snapshot.position("AAPL").unwrap().quantity, 333);
        assert_eq!(ledger.version(), 1 + 333);
    }
}

//! Ledger observer trait.

use crate::types::AccountSnapshot;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Receives every snapshot the ledger publishes.
///
/// Called synchronously after the ledger's state lock is released, once per
/// successful mutation, with strictly increasing versions even under
/// concurrent writers. Calls are serialized. An observer may read the ledger
/// but must not mutate it from inside the callback.
pub trait LedgerObserver: Send + Sync {
    fn on_snapshot(&self, snapshot: &AccountSnapshot, version: u64);
}

impl<F> LedgerObserver for F
where
    F: Fn(&AccountSnapshot, u64) + Send + Sync,
{
    fn on_snapshot(&self, snapshot: &AccountSnapshot, version: u64) {
        self(snapshot, version)
    }
}

//! Snapshot persistence trait.

use crate::error::StorageError;
use crate::types::AccountSnapshot;

/// Durable home for account snapshots, keyed by account id.
///
/// Implementations must validate what they load; an invalid payload is
/// [`StorageError::Corrupt`], never a partially trusted snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot for an account, or `None` if none was saved.
    fn load(&self, account_id: &str) -> Result<Option<AccountSnapshot>, StorageError>;

    /// Replace the stored snapshot for an account.
    fn save(&self, account_id: &str, snapshot: &AccountSnapshot) -> Result<(), StorageError>;

    /// Get the store name.
    fn name(&self) -> &str;
}

//! Snapshot stores.

use papertrade_core::error::StorageError;
use papertrade_core::traits::SnapshotStore;
use papertrade_core::types::{AccountSnapshot, SnapshotRecord};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Stores each account as pretty JSON at `<dir>/<account_id>.json`.
///
/// Saves go to a sibling temp file that is then renamed over the target, so
/// a reader never sees a half-written payload.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the payload for an account.
    pub fn path_for(&self, account_id: &str) -> Result<PathBuf, StorageError> {
        validate_account_id(account_id)?;
        Ok(self.dir.join(format!("{account_id}.json")))
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self, account_id: &str) -> Result<Option<AccountSnapshot>, StorageError> {
        let path = self.path_for(account_id)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: SnapshotRecord = serde_json::from_str(&content)?;
        let snapshot = AccountSnapshot::try_from(record)?;

        tracing::debug!(
            path = %path.display(),
            positions = snapshot.position_count(),
            orders = snapshot.orders().len(),
            "Loaded account snapshot"
        );
        Ok(Some(snapshot))
    }

    fn save(&self, account_id: &str, snapshot: &AccountSnapshot) -> Result<(), StorageError> {
        let path = self.path_for(account_id)?;
        fs::create_dir_all(&self.dir)?;

        let payload = serde_json::to_vec_pretty(snapshot)?;
        let tmp_path = self.dir.join(format!(".{account_id}.json.tmp"));
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&payload)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;

        tracing::trace!(path = %path.display(), bytes = payload.len(), "Saved account snapshot");
        Ok(())
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

/// Account ids become file names; keep them to a safe character set.
fn validate_account_id(account_id: &str) -> Result<(), StorageError> {
    let valid = !account_id.is_empty()
        && account_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid account id {account_id:?}"),
        )))
    }
}

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: Mutex<HashMap<String, AccountSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an account.
    pub fn with_snapshot(self, account_id: impl Into<String>, snapshot: AccountSnapshot) -> Self {
        self.snapshots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(account_id.into(), snapshot);
        self
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, account_id: &str) -> Result<Option<AccountSnapshot>, StorageError> {
        let snapshots = self.snapshots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(snapshots.get(account_id).cloned())
    }

    fn save(&self, account_id: &str, snapshot: &AccountSnapshot) -> Result<(), StorageError> {
        let mut snapshots = self.snapshots.lock().unwrap_or_else(PoisonError::into_inner);
        snapshots.insert(account_id.to_string(), snapshot.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

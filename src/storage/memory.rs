use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use super::{Result, StorageBackend};
use crate::errors::LedgerError;

/// In-process blob store. Writes can be made to fail to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blobs: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a raw blob, bypassing serialization.
    pub fn with_blob(key: &str, blob: impl Into<String>) -> Self {
        let storage = Self::new();
        if let Ok(mut blobs) = storage.blobs.lock() {
            blobs.insert(key.to_string(), blob.into());
        }
        storage
    }

    /// When enabled, every `set` fails and leaves the stored blob untouched.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs
            .lock()
            .map(|blobs| blobs.contains_key(key))
            .unwrap_or(false)
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| LedgerError::Persistence("memory storage lock poisoned".into()))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, blob: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::Persistence(format!(
                "write to `{key}` rejected"
            )));
        }
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| LedgerError::Persistence("memory storage lock poisoned".into()))?;
        blobs.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_writes_keep_previous_blob() {
        let storage = MemoryStorage::with_blob("k", "{}");
        storage.fail_writes(true);
        assert!(storage.set("k", "changed").is_err());
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("{}"));

        storage.fail_writes(false);
        storage.set("k", "changed").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("changed"));
    }
}

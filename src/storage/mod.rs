pub mod json_backend;
pub mod memory;

use crate::{errors::LedgerError, ledger::Ledger};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Key/blob store holding serialized ledger documents.
pub trait StorageBackend: Send + Sync {
    /// Returns the blob stored under `key`, or `None` when nothing was ever saved.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Replaces the blob stored under `key`.
    fn set(&self, key: &str, blob: &str) -> Result<()>;
}

/// Loads and validates the ledger stored under `key`.
///
/// Unparseable documents and documents that break ledger invariants are reported as
/// [`LedgerError::CorruptData`]; nothing is partially loaded.
pub fn load_ledger(backend: &dyn StorageBackend, key: &str) -> Result<Option<Ledger>> {
    let Some(blob) = backend.get(key)? else {
        return Ok(None);
    };
    let ledger = parse_ledger(&blob)?;
    Ok(Some(ledger))
}

pub fn save_ledger(backend: &dyn StorageBackend, key: &str, ledger: &Ledger) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    backend.set(key, &json)
}

pub(crate) fn parse_ledger(blob: &str) -> Result<Ledger> {
    let ledger: Ledger =
        serde_json::from_str(blob).map_err(|err| LedgerError::CorruptData(err.to_string()))?;
    ledger.validate()?;
    Ok(ledger)
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;

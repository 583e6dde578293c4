use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Corrupt data: {0}")]
    CorruptData(String),
    #[error("Unsupported schema version {0}")]
    UnsupportedSchema(u8),
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),
    #[error("Invalid month key: {0}")]
    InvalidMonthKey(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

use thiserror::Error;

/// Failures reading or rewriting the on-disk document.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

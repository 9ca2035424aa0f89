use thiserror::Error;

/// Errors from conversation store serialization.
#[derive(Debug, Error)]
pub enum ConversationError {
    /// Persisted bytes could not be decoded into a valid turn sequence.
    ///
    /// Fatal to the restore attempt; callers fall back to a fresh store.
    #[error("malformed conversation snapshot: {0}")]
    Deserialization(String),

    #[error("failed to encode conversation snapshot: {0}")]
    Serialization(String),
}

/// Errors from the durable session blob store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

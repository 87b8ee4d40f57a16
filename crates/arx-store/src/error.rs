/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be used as a blob name.
    #[error("invalid blob key: {0:?}")]
    InvalidKey(String),
}

/// Result alias for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;

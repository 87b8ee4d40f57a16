//! Error types for the index crate.

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table and its secondary indexes disagree.
    #[error("index inconsistent: {0}")]
    Inconsistent(String),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;

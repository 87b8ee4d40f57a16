use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid digest: {0:?}")]
    InvalidDigest(String),

    #[error("digest too long: at most {max} hex characters, got {actual}")]
    DigestTooLong { max: usize, actual: usize },
}

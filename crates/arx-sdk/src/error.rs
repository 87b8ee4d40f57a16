use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("index error: {0}")]
    Index(#[from] arx_index::IndexError),

    #[error("blob store error: {0}")]
    Blob(#[from] arx_store::BlobError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

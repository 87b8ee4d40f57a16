//! High-level API for the arx article catalog.
//!
//! [`Catalog`] is the entry point for applications: it owns the article
//! table, the payload blob store and the database location, and runs each
//! caller-facing operation end to end (hash, dedup check, payload copy,
//! index update, snapshot write).
//!
//! Every operation separates "nothing there" (`Ok(None)`, empty lists,
//! [`Registration::Duplicate`]) from failure (`Err`), leaving messaging and
//! prompts to the presentation layer.

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{Catalog, FsckReport, NewArticle, Registration, SortKey};
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};

// Re-export key types
pub use arx_crypto::ContentHasher;
pub use arx_index::ArticleIndex;
pub use arx_store::{BlobStore, FsBlobStore, InMemoryBlobStore, PayloadNaming};
pub use arx_types::{Article, ArticleEdit, ArticleId};

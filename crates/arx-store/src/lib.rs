//! Payload blob storage for the arx article catalog.
//!
//! Article payloads (the original documents) live outside the catalog
//! database, one blob per article, under a key derived from the article id.
//! The catalog only needs "store under key, fetch, delete"; how keys map to
//! storage is up to the backend.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- one file per key in a directory
//!
//! # Design Rules
//!
//! 1. Removing a missing key is not an error.
//! 2. Writes to disk go through a temporary file and a rename
//!    ([`write_atomic`]), keeping the replaced file's permissions.
//! 3. The store never interprets blob contents.

pub mod atomic;
pub mod error;
pub mod fs;
pub mod memory;
pub mod naming;
pub mod traits;

pub use atomic::write_atomic;
pub use error::{BlobError, BlobResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use naming::PayloadNaming;
pub use traits::BlobStore;

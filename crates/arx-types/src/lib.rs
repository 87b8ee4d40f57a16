//! Foundation types for the arx article catalog.
//!
//! Every other arx crate depends on `arx-types`.
//!
//! # Key Types
//!
//! - [`ArticleId`]: Content digest identifying an article (FNV-1a, hex)
//! - [`Article`]: The catalog record: id, title, contributors, year, payload key
//! - [`ArticleEdit`]: Partial update of an article's mutable fields

pub mod article;
pub mod error;
pub mod identity;

pub use article::{contributor_names, normalize_token, Article, ArticleEdit, FIELD_DELIMITER};
pub use error::TypeError;
pub use identity::ArticleId;

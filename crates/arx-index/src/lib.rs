//! Indexed article table for the arx catalog.
//!
//! Holds every [`Article`](arx_types::Article) in a primary table keyed by
//! id, with two secondary indexes (contributor name, publication year), and
//! reads/writes the table as a flat file of `|`-delimited lines.
//!
//! # Key Types
//!
//! - [`ArticleIndex`] -- The in-memory table and its secondary indexes
//! - [`codec`] -- One article per line: `id|title|contributors|year|payload_key`
//! - [`persist`] -- Load a table from lines or a file; dump it back as a snapshot
//!
//! The table is consistent after every operation: each article sits in the
//! bucket of every one of its contributors and in the bucket of its year,
//! buckets hold no duplicates, no bucket references a missing article, and
//! empty buckets are dropped.

pub mod codec;
pub mod error;
pub mod index;
pub mod persist;

pub use codec::{decode, encode};
pub use error::{IndexError, IndexResult};
pub use index::ArticleIndex;
pub use persist::{dump_lines, load_file, load_lines, read_from, save_file, write_to};

//! Content hashing for the arx article catalog.
//!
//! Articles are identified by the 64-bit FNV-1a digest of their payload.
//! FNV-1a is not a cryptographic hash; it is used here as a fast,
//! deterministic identity and deduplication key. Collisions are possible in
//! principle and are not detected.

pub mod hasher;

pub use hasher::{ContentHasher, Fnv1a64, FNV_OFFSET_BASIS, FNV_PRIME};

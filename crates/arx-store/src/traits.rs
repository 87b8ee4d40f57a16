use crate::error::BlobResult;

/// Keyed payload storage.
///
/// Implementations must satisfy these invariants:
/// - `put` replaces any existing blob under the same key.
/// - `remove` on a missing key returns `Ok(false)`.
/// - All I/O errors are propagated, never silently ignored.
pub trait BlobStore: Send + Sync {
    /// Store `content` under `key`.
    fn put(&self, key: &str, content: &[u8]) -> BlobResult<()>;

    /// Fetch the blob under `key`.
    ///
    /// Returns `Ok(None)` if the blob does not exist.
    fn get(&self, key: &str) -> BlobResult<Option<Vec<u8>>>;

    /// Check whether a blob exists.
    fn exists(&self, key: &str) -> BlobResult<bool>;

    /// Delete a blob. Returns `true` if it existed.
    fn remove(&self, key: &str) -> BlobResult<bool>;
}

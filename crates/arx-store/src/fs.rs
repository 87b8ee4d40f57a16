use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::atomic::write_atomic;
use crate::error::{BlobError, BlobResult};
use crate::traits::BlobStore;

/// Filesystem blob store: one file per key inside `root`.
///
/// The directory is created on the first write. Keys are used verbatim as
/// file names, so they must be plain names without path separators.
#[derive(Clone, Debug)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`. Nothing is touched on disk yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory holding the blobs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the blob stored under `key`.
    pub fn path_for(&self, key: &str) -> BlobResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

fn validate_key(key: &str) -> BlobResult<()> {
    let bad = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\', '\0']);
    if bad {
        return Err(BlobError::InvalidKey(key.to_string()));
    }
    Ok(())
}

impl BlobStore for FsBlobStore {
    fn put(&self, key: &str, content: &[u8]) -> BlobResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;

        write_atomic(&path, |file: &mut fs::File| file.write_all(content))?;

        debug!(key, len = content.len(), "blob written");
        Ok(())
    }

    fn get(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> BlobResult<bool> {
        let path = self.path_for(key)?;
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn remove(&self, key: &str) -> BlobResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(key, "blob removed");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

//! Atomic file replacement.

use std::fs::{self, File, OpenOptions, Permissions};
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;

/// Replace `path` with the content produced by `write`.
///
/// The content goes to a temporary file in the same directory, which is
/// synced and then renamed over `path`, so readers see either the old or the
/// new file. The new file keeps the permissions of the file it replaces; a
/// file that did not exist yet gets the permissions a plain create would give
/// it under the current umask. The parent directory must exist.
pub fn write_atomic<E, F>(path: &Path, write: F) -> Result<(), E>
where
    E: From<io::Error>,
    F: FnOnce(&mut File) -> Result<(), E>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let (permissions, created) = target_permissions(path)?;
    let result = (|| -> Result<(), E> {
        let mut tmp = NamedTempFile::new_in(dir)?;
        write(tmp.as_file_mut())?;
        tmp.as_file().set_permissions(permissions)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    })();

    if result.is_err() && created {
        let _ = fs::remove_file(path);
    }
    result
}

/// Permissions for the replacement file, and whether an empty placeholder had
/// to be created to learn them.
fn target_permissions(path: &Path) -> io::Result<(Permissions, bool)> {
    match fs::metadata(path) {
        Ok(meta) => Ok((meta.permissions(), false)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let file = OpenOptions::new().write(true).create_new(true).open(path)?;
            Ok((file.metadata()?.permissions(), true))
        }
        Err(e) => Err(e),
    }
}

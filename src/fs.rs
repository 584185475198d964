//! Filesystem helpers: type probing, creation with optional owner-only
//! permissions, and backup cleanup

use crate::error::{Error, Result};
use std::path::Path;

/// What a path currently points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// A directory
    Directory,
    /// A regular file
    File,
    /// Anything else (socket, device, fifo...)
    Other,
}

/// Stat `path` and report what kind of entry it is
///
/// Symlinks are followed. Any stat failure, including a missing path, is
/// returned as-is.
///
/// # Example
///
/// ```
/// use rcini::{probe, FileKind};
///
/// let dir = std::env::temp_dir();
/// assert_eq!(probe(&dir).unwrap(), FileKind::Directory);
/// ```
pub fn probe(path: impl AsRef<Path>) -> std::io::Result<FileKind> {
    let metadata = std::fs::metadata(path.as_ref())?;
    let kind = if metadata.is_dir() {
        FileKind::Directory
    } else if metadata.is_file() {
        FileKind::File
    } else {
        FileKind::Other
    };
    Ok(kind)
}

/// Create `path` and all of its parents
///
/// With `secure`, the leaf directory is restricted to its owner (Unix: 0o700).
pub(crate) fn ensure_dir(path: &Path, secure: bool) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::DirectoryCreate {
        path: path.to_path_buf(),
        source: e,
    })?;

    if secure {
        restrict(path, 0o700).map_err(|e| Error::DirectoryCreate {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Create an empty file at `path`; an existing file is left as it is
///
/// With `secure`, the file is restricted to its owner (Unix: 0o600).
pub(crate) fn create_empty_file(path: &Path, secure: bool) -> Result<()> {
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| Error::FileCreate {
            path: path.to_path_buf(),
            source: e,
        })?;

    if secure {
        restrict(path, 0o600).map_err(|e| Error::FileCreate {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Delete a leftover backup file; a missing file is not an error
pub(crate) fn remove_stale_backup(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => log::debug!("Removed stale backup {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove stale backup {}: {e}", path.display()),
    }
}

/// Restrict `path` to `mode` (Unix only)
#[cfg(unix)]
pub(crate) fn restrict(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(mode);
    std::fs::set_permissions(path, perms)
}

// Windows permissions are ACL based
#[cfg(not(unix))]
pub(crate) fn restrict(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

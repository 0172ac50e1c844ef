use std::{
    fs::{self, File},
    io,
    path::Path,
    time::SystemTime,
};

use crate::error::{FileSystemError, FileSystemResult};

/// Opens a file that is allowed to be absent.
///
/// Returns `Ok(None)` when the file does not exist, so callers can treat a
/// missing input as "no records" instead of a failure. Any other error is
/// reported.
///
/// # Example
///
/// ```
/// use zrpm_utils::fs::open_optional;
///
/// let file = open_optional("/nonexistent/synthesis.hdlist.cz").unwrap();
/// assert!(file.is_none());
/// ```
pub fn open_optional<P: AsRef<Path>>(path: P) -> FileSystemResult<Option<File>> {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => {
            Err(FileSystemError::File {
                path: path.to_path_buf(),
                action: "open",
                source: err,
            })
        }
    }
}

/// Returns the modification time of `path`, or `None` if it cannot be read.
pub fn modified_time<P: AsRef<Path>>(path: P) -> Option<SystemTime> {
    fs::symlink_metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
}

/// Creates a directory structure if it doesn't exist.
///
/// # Errors
///
/// * [`FileSystemError::Directory`] if the directory could not be created.
/// * [`FileSystemError::NotADirectory`] if the path exists but is not a directory.
pub fn ensure_dir_exists<P: AsRef<Path>>(path: P) -> FileSystemResult<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).map_err(|err| FileSystemError::Directory {
            path: path.to_path_buf(),
            action: "create",
            source: err,
        })?;
    } else if !path.is_dir() {
        return Err(FileSystemError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

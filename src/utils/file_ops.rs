use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{LibraryError, Result};

pub struct FileManager;

impl FileManager {
    pub fn new() -> Self {
        Self
    }

    /// Renames `file_path` to `new_name` inside its own directory.
    ///
    /// Never overwrites: an existing different file at the destination is
    /// an error. Renaming a file to its current name is a no-op.
    pub fn rename_in_place(&self, file_path: impl AsRef<Path>, new_name: &str) -> Result<PathBuf> {
        let file_path = file_path.as_ref();
        let rename_error = |reason: String| LibraryError::Rename {
            path: file_path.to_path_buf(),
            reason,
        };

        let directory = file_path
            .parent()
            .ok_or_else(|| rename_error("Invalid file path".to_string()))?;
        if new_name.is_empty() || Path::new(new_name).file_name() != Some(OsStr::new(new_name)) {
            return Err(rename_error(format!("'{}' is not a valid file name", new_name)));
        }

        let destination = directory.join(new_name);
        if destination == file_path {
            return Ok(destination);
        }

        // A destination that resolves to the source is the same file under
        // another spelling, e.g. a case-only change on a case-insensitive disk
        if destination.exists() && !Self::resolves_to(&destination, file_path) {
            return Err(rename_error(format!("{} already exists", destination.display())));
        }

        fs::rename(file_path, &destination).map_err(|e| rename_error(e.to_string()))?;
        Ok(destination)
    }

    fn resolves_to(path: &Path, other: &Path) -> bool {
        match (fs::canonicalize(path), fs::canonicalize(other)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new()
    }
}

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::library::entry::Entry;
use crate::library::scanner::ScanResult;

/// Caller-side choice of which scanned entries a batch operation acts on.
///
/// Files and whole directories can be selected; a selected directory
/// covers every entry grouped under it.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    everything: bool,
    files: HashSet<PathBuf>,
    directories: HashSet<PathBuf>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            everything: true,
            ..Self::default()
        }
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.files.insert(path.into());
    }

    pub fn select_directory(&mut self, path: impl Into<PathBuf>) {
        self.directories.insert(path.into());
    }

    /// Selects `path`, resolved against `root` when relative, as a
    /// directory or a file depending on what it names on disk.
    pub fn select_path(&mut self, root: &Path, path: &Path) {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        };
        let path = std::fs::canonicalize(&path).unwrap_or(path);
        if path.is_dir() {
            self.select_directory(path);
        } else {
            self.select_file(path);
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.everything && self.files.is_empty() && self.directories.is_empty()
    }

    pub fn contains(&self, entry: &Entry) -> bool {
        self.everything
            || self.files.contains(entry.file_path())
            || self.directories.contains(entry.directory())
    }

    pub fn apply<'a>(&self, scan: &'a ScanResult) -> Vec<&'a Entry> {
        scan.entries().filter(|e| self.contains(e)).collect()
    }

    pub fn apply_mut<'a>(&self, scan: &'a mut ScanResult) -> Vec<&'a mut Entry> {
        scan.entries_mut().filter(|e| self.contains(e)).collect()
    }
}

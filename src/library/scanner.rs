use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::audio::metadata::MetadataReader;
use crate::library::entry::Entry;
use crate::{LibraryError, Result};

#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Extensions (without the dot) read as audio, compared case-insensitively.
    pub extensions: Vec<String>,
    pub follow_links: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".to_string()],
            follow_links: true,
        }
    }
}

/// Entries living in one directory, in track order.
#[derive(Debug, Clone)]
pub struct DirectoryGroup {
    pub directory: PathBuf,
    pub entries: Vec<Entry>,
}

/// Output of one scan pass, grouped by directory in order of first
/// appearance.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub root: PathBuf,
    pub groups: Vec<DirectoryGroup>,
}

impl ScanResult {
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.groups.iter().flat_map(|g| g.entries.iter())
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.groups.iter_mut().flat_map(|g| g.entries.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn warning_count(&self) -> usize {
        self.entries().filter(|e| !e.state().is_empty()).count()
    }

    pub fn find(&self, file_path: &Path) -> Option<&Entry> {
        self.entries().find(|e| e.file_path() == file_path)
    }
}

/// Groups entries by containing directory. Directories keep the order in
/// which they first appear, entries keep their relative order.
pub fn group_by_directory(entries: Vec<Entry>) -> Vec<DirectoryGroup> {
    let mut groups: Vec<DirectoryGroup> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();
    for entry in entries {
        match index.get(entry.directory()) {
            Some(&i) => groups[i].entries.push(entry),
            None => {
                index.insert(entry.directory().to_path_buf(), groups.len());
                groups.push(DirectoryGroup {
                    directory: entry.directory().to_path_buf(),
                    entries: vec![entry],
                });
            }
        }
    }
    groups
}

pub struct LibraryScanner<'a, R> {
    reader: &'a R,
    settings: ScanSettings,
}

impl<'a, R: MetadataReader> LibraryScanner<'a, R> {
    pub fn new(reader: &'a R, settings: ScanSettings) -> Self {
        Self { reader, settings }
    }

    fn collect_files(&self, root: &Path) -> Vec<walkdir::DirEntry> {
        walkdir::WalkDir::new(root)
            .follow_links(self.settings.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("Error accessing entry: {}", err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .collect()
    }

    /// Scans `root` recursively and validates every file found.
    ///
    /// With `only_warnings`, entries without any warning are dropped. The
    /// rest are ordered by track number; entries without one sort first.
    pub fn scan(&self, root: impl AsRef<Path>, only_warnings: bool) -> Result<ScanResult> {
        let root_ref = root.as_ref();
        if !root_ref.is_dir() {
            return Err(LibraryError::NotFound(root_ref.to_path_buf()));
        }

        // Try to get canonical path
        let root = std::fs::canonicalize(root_ref).unwrap_or_else(|_| root_ref.to_path_buf());

        log::info!("Scanning directory structure: {}", root.display());
        let files = self.collect_files(&root);
        log::debug!("Found {} files", files.len());

        let mut entries: Vec<Entry> = files
            .iter()
            .map(|file| {
                let entry =
                    Entry::from_file(file.path(), &root, self.reader, &self.settings.extensions);
                log::debug!("{}: {}", entry.file_path().display(), entry.state());
                entry
            })
            .filter(|entry| !only_warnings || !entry.state().is_empty())
            .collect();

        // Stable, so files sharing a track number keep walk order
        entries.sort_by_key(|e| e.track);

        let result = ScanResult {
            root,
            groups: group_by_directory(entries),
        };
        log::info!(
            "Scan found {} entries in {} directories, {} with warnings",
            result.len(),
            result.groups.len(),
            result.warning_count()
        );
        Ok(result)
    }
}

use std::path::{Path, PathBuf};

use crate::audio::metadata::MetadataWriter;
use crate::library::entry::Entry;
use crate::operations::template::RenameTemplate;
use crate::utils::file_ops::FileManager;
use crate::{LibraryError, Result};

/// Result of one batch operation on one entry. On success `result` holds
/// the file's path after the operation.
#[derive(Debug)]
pub struct EntryOutcome {
    pub path: PathBuf,
    pub result: Result<PathBuf>,
}

/// Per-entry results of a batch operation.
///
/// Entries are processed independently, so some may have succeeded while
/// others failed. Entries shown before the batch are stale afterwards:
/// `rescan_required` is always set and the library must be scanned again.
#[derive(Debug)]
#[must_use]
pub struct BatchReport {
    pub operation: String,
    pub outcomes: Vec<EntryOutcome>,
    pub rescan_required: bool,
}

impl BatchReport {
    fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            outcomes: Vec::new(),
            rescan_required: true,
        }
    }

    fn record(&mut self, path: &Path, result: Result<PathBuf>) {
        if let Err(e) = &result {
            log::warn!("{}: {}", self.operation, e);
        }
        self.outcomes.push(EntryOutcome {
            path: path.to_path_buf(),
            result,
        });
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

pub struct BatchOperations<'a, W> {
    writer: &'a W,
    file_manager: FileManager,
}

impl<'a, W: MetadataWriter> BatchOperations<'a, W> {
    pub fn new(writer: &'a W) -> Self {
        Self {
            writer,
            file_manager: FileManager::new(),
        }
    }

    /// Writes the entry's current in-memory fields to its file.
    pub fn save_entry(&self, entry: &Entry) -> Result<()> {
        if !entry.has_tags() {
            return Err(LibraryError::Write {
                path: entry.file_path().to_path_buf(),
                reason: "file has no tag storage".to_string(),
            });
        }
        self.writer.write(entry.file_path(), &entry.to_tag_data())
    }

    /// Sets album artists to the performers on every entry and saves it.
    pub fn copy_performers_to_album_artists<'e>(
        &self,
        entries: impl IntoIterator<Item = &'e mut Entry>,
    ) -> BatchReport {
        let mut report = BatchReport::new("copy performers to album artists");
        for entry in entries {
            entry.album_artists = entry.performers.clone();
            let result = self
                .save_entry(entry)
                .map(|()| entry.file_path().to_path_buf());
            report.record(entry.file_path(), result);
        }
        log::info!(
            "{}: {}/{} entries saved",
            report.operation,
            report.succeeded(),
            report.outcomes.len()
        );
        report
    }

    /// Renames every entry inside its directory according to `template`.
    pub fn rename<'e>(
        &self,
        entries: impl IntoIterator<Item = &'e Entry>,
        template: RenameTemplate,
    ) -> BatchReport {
        let mut report = BatchReport::new(format!("rename to {}", template));
        for entry in entries {
            let result = if entry.has_tags() {
                self.file_manager
                    .rename_in_place(entry.file_path(), &template.file_name(entry))
            } else {
                Err(LibraryError::Rename {
                    path: entry.file_path().to_path_buf(),
                    reason: "not an audio file".to_string(),
                })
            };
            if let Ok(new_path) = &result {
                log::debug!("{} -> {}", entry.file_path().display(), new_path.display());
            }
            report.record(entry.file_path(), result);
        }
        log::info!(
            "{}: {}/{} entries renamed",
            report.operation,
            report.succeeded(),
            report.outcomes.len()
        );
        report
    }

    pub fn rename_to_title<'e>(&self, entries: impl IntoIterator<Item = &'e Entry>) -> BatchReport {
        self.rename(entries, RenameTemplate::Title)
    }

    pub fn rename_to_track_and_title<'e>(
        &self,
        entries: impl IntoIterator<Item = &'e Entry>,
    ) -> BatchReport {
        self.rename(entries, RenameTemplate::TrackAndTitle)
    }

    pub fn rename_to_artist_and_title<'e>(
        &self,
        entries: impl IntoIterator<Item = &'e Entry>,
    ) -> BatchReport {
        self.rename(entries, RenameTemplate::ArtistAndTitle)
    }

    pub fn rename_to_track_artist_and_title<'e>(
        &self,
        entries: impl IntoIterator<Item = &'e Entry>,
    ) -> BatchReport {
        self.rename(entries, RenameTemplate::TrackArtistAndTitle)
    }
}

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::time::Duration;

use crate::audio::metadata::{MetadataReader, TagData};
use crate::operations::template::RenameTemplate;

/// Characters that may not appear in a file name on the target platform.
#[cfg(windows)]
const INVALID_FILE_NAME_CHARS: &[char] = &['"', '<', '>', '|', ':', '*', '?', '\\', '/'];
#[cfg(not(windows))]
const INVALID_FILE_NAME_CHARS: &[char] = &['/'];

/// Separator used when a list of names is shown as a single string.
pub const NAME_SEPARATOR: &str = ", ";

pub fn is_invalid_file_name_char(c: char) -> bool {
    c == '\0' || (cfg!(windows) && c.is_ascii_control()) || INVALID_FILE_NAME_CHARS.contains(&c)
}

/// Removes every character that cannot be part of a file name.
pub fn path_safe(value: &str) -> String {
    value.chars().filter(|c| !is_invalid_file_name_char(*c)).collect()
}

/// Splits a comma separated name list, trimming each name.
pub fn split_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Set of naming-convention warnings raised for an entry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryState(u8);

impl EntryState {
    pub const NONE: EntryState = EntryState(0);
    pub const PATH_WARNING: EntryState = EntryState(1);
    pub const FILE_NAME_WARNING: EntryState = EntryState(2);
    pub const METADATA_WARNING: EntryState = EntryState(4);

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: EntryState) -> bool {
        self.0 & other.0 == other.0
    }

    /// Short labels for every warning set, in a fixed order.
    pub fn labels(self) -> Vec<&'static str> {
        [
            (Self::METADATA_WARNING, "metadata"),
            (Self::PATH_WARNING, "path"),
            (Self::FILE_NAME_WARNING, "filename"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, label)| label)
        .collect()
    }
}

impl BitOr for EntryState {
    type Output = EntryState;

    fn bitor(self, rhs: EntryState) -> EntryState {
        EntryState(self.0 | rhs.0)
    }
}

impl BitOrAssign for EntryState {
    fn bitor_assign(&mut self, rhs: EntryState) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "ok")
        } else {
            write!(f, "{}", self.labels().join("+"))
        }
    }
}

/// Path-safe copies of the name fields, fixed when the entry is built.
#[derive(Debug, Clone, Default, PartialEq)]
struct PathSafe {
    performers: String,
    album_artists: String,
    album: String,
    title: String,
}

/// One file found under the scan root.
///
/// Identity, path-safe projections and `state` are a snapshot taken at
/// construction. Editing the public tag fields does not re-validate the
/// entry; only a new scan does.
#[derive(Debug, Clone)]
pub struct Entry {
    file_path: PathBuf,
    root_folder: PathBuf,
    relative_path: PathBuf,
    size_bytes: u64,
    has_tags: bool,
    pub performers: Option<String>,
    pub album_artists: Option<String>,
    pub album: Option<String>,
    pub year: Option<u32>,
    pub track: Option<u32>,
    pub disc: Option<u32>,
    pub title: Option<String>,
    duration: Option<Duration>,
    path_safe: PathSafe,
    state: EntryState,
}

impl Entry {
    /// Builds an entry for a file on disk, reading its tags when the
    /// extension is one of `extensions`.
    ///
    /// A recognised file whose tags cannot be parsed is still listed, with
    /// every field unset.
    pub fn from_file(
        file_path: impl AsRef<Path>,
        root_folder: impl AsRef<Path>,
        reader: &impl MetadataReader,
        extensions: &[String],
    ) -> Entry {
        let file_path = file_path.as_ref();
        let tags = if has_extension(file_path, extensions) {
            match reader.read(file_path) {
                Ok(tags) => Some(tags),
                Err(e) => {
                    log::warn!("{}", e);
                    Some(TagData::default())
                }
            }
        } else {
            None
        };

        let mut entry = Entry::from_tags(file_path, root_folder, tags);
        entry.size_bytes = match std::fs::metadata(file_path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                log::warn!("Cannot read size of {}: {}", file_path.display(), e);
                0
            }
        };
        entry
    }

    /// Builds and validates an entry from already extracted tags. `None`
    /// marks a file without tag storage, which is never flagged.
    pub fn from_tags(
        file_path: impl AsRef<Path>,
        root_folder: impl AsRef<Path>,
        tags: Option<TagData>,
    ) -> Entry {
        let file_path = file_path.as_ref().to_path_buf();
        let root_folder = root_folder.as_ref().to_path_buf();
        let relative_path = file_path
            .parent()
            .and_then(|dir| dir.strip_prefix(&root_folder).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut entry = Entry {
            file_path,
            root_folder,
            relative_path,
            size_bytes: 0,
            has_tags: tags.is_some(),
            performers: None,
            album_artists: None,
            album: None,
            year: None,
            track: None,
            disc: None,
            title: None,
            duration: None,
            path_safe: PathSafe::default(),
            state: EntryState::NONE,
        };

        if let Some(tags) = tags {
            entry.performers = Some(tags.performers.join(NAME_SEPARATOR));
            entry.album_artists = Some(tags.album_artists.join(NAME_SEPARATOR));
            entry.album = tags.album;
            entry.year = tags.year;
            entry.track = tags.track;
            entry.disc = tags.disc;
            entry.title = tags.title;
            entry.duration = tags.duration;
            entry.path_safe = PathSafe {
                performers: path_safe(entry.performers.as_deref().unwrap_or_default()),
                album_artists: path_safe(entry.album_artists.as_deref().unwrap_or_default()),
                album: path_safe(entry.album.as_deref().unwrap_or_default()),
                title: path_safe(entry.title.as_deref().unwrap_or_default()),
            };
            entry.state = entry.validate();
        }

        entry
    }

    fn validate(&self) -> EntryState {
        let mut state = EntryState::NONE;

        let performers = self.performers.as_deref().unwrap_or_default();
        let album_artists = self.album_artists.as_deref().unwrap_or_default();
        if performers != album_artists
            || performers.is_empty()
            || album_artists.is_empty()
            || self.year.unwrap_or(0) == 0
            || self.title.as_deref().unwrap_or_default().trim().is_empty()
        {
            state |= EntryState::METADATA_WARNING;
        }

        if *self.relative_path.to_string_lossy() != *self.canonical_relative_path() {
            state |= EntryState::PATH_WARNING;
        }

        if self.file_name() != RenameTemplate::TrackAndTitle.file_name(self) {
            state |= EntryState::FILE_NAME_WARNING;
        }

        state
    }

    /// Directory the file is expected in, relative to the scan root.
    pub fn canonical_relative_path(&self) -> String {
        format!(
            "{}{}{} - {}",
            self.path_safe.album_artists,
            MAIN_SEPARATOR,
            self.year.unwrap_or(0),
            self.path_safe.album
        )
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub fn directory(&self) -> &Path {
        self.file_path.parent().unwrap_or(&self.root_folder)
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Lower-cased extension used when building canonical file names.
    pub fn extension(&self) -> String {
        self.file_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Whether the file has tag storage the organizer can read and write.
    pub fn has_tags(&self) -> bool {
        self.has_tags
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    pub fn path_safe_performers(&self) -> &str {
        &self.path_safe.performers
    }

    pub fn path_safe_album_artists(&self) -> &str {
        &self.path_safe.album_artists
    }

    pub fn path_safe_album(&self) -> &str {
        &self.path_safe.album
    }

    pub fn path_safe_title(&self) -> &str {
        &self.path_safe.title
    }

    /// Current in-memory fields in the shape the tag writer expects.
    /// Unset numbers become zero.
    pub fn to_tag_data(&self) -> TagData {
        TagData {
            performers: self.performers.as_deref().map(split_names).unwrap_or_default(),
            album_artists: self.album_artists.as_deref().map(split_names).unwrap_or_default(),
            album: self.album.clone(),
            year: Some(self.year.unwrap_or(0)),
            track: Some(self.track.unwrap_or(0)),
            disc: Some(self.disc.unwrap_or(0)),
            title: self.title.clone(),
            duration: None,
        }
    }
}

pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions
                .iter()
                .any(|e| e.trim().trim_start_matches('.').eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

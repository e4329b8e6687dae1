use std::path::Path;
use std::time::Duration;

use lofty::config::WriteOptions;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemValue, Tag, TagItem, TagType};

use crate::{LibraryError, Result};

/// The fixed set of tag fields the organizer reads and writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagData {
    pub performers: Vec<String>,
    pub album_artists: Vec<String>,
    pub album: Option<String>,
    pub year: Option<u32>,
    pub track: Option<u32>,
    pub disc: Option<u32>,
    pub title: Option<String>,
    /// Informational only, never written back.
    pub duration: Option<Duration>,
}

pub trait MetadataReader {
    fn read(&self, path: &Path) -> Result<TagData>;
}

pub trait MetadataWriter {
    fn write(&self, path: &Path, tags: &TagData) -> Result<()>;
}

/// Tag codec backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTags;

/// ID3v2.4 keeps several values of one text frame in a single frame,
/// separated by NUL.
const ID3V2_VALUE_SEPARATOR: &str = "\0";

fn names(tag: &Tag, key: &ItemKey) -> Vec<String> {
    tag.get_strings(key)
        .flat_map(|value| value.split(ID3V2_VALUE_SEPARATOR))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

impl LoftyTags {
    pub fn new() -> Self {
        Self
    }

    fn parse_error(path: &Path, e: impl ToString) -> LibraryError {
        LibraryError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    }

    fn write_error(path: &Path, e: impl ToString) -> LibraryError {
        LibraryError::Write {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    }

    fn extract_from_tag(tag: &Tag, tags: &mut TagData) {
        tags.performers = names(tag, &ItemKey::TrackArtist);
        tags.album_artists = names(tag, &ItemKey::AlbumArtist);
        tags.album = tag.album().map(|v| v.to_string());
        tags.title = tag.title().map(|v| v.to_string());
        tags.year = tag.year();
        tags.track = tag.track();
        tags.disc = tag.disk();
    }

    fn replace_names(tag: &mut Tag, key: ItemKey, names: &[String]) {
        tag.retain(|item| item.key() != &key);
        if names.is_empty() {
            return;
        }
        // ID3v2 keeps one frame per key, so repeated items would overwrite each other
        if tag.tag_type() == TagType::Id3v2 {
            let joined = names.join(ID3V2_VALUE_SEPARATOR);
            tag.push(TagItem::new(key, ItemValue::Text(joined)));
            return;
        }
        for name in names {
            tag.push(TagItem::new(key.clone(), ItemValue::Text(name.clone())));
        }
    }

    fn apply_to_tag(tag: &mut Tag, tags: &TagData) {
        match &tags.title {
            Some(title) => tag.set_title(title.clone()),
            None => tag.remove_title(),
        }
        match &tags.album {
            Some(album) => tag.set_album(album.clone()),
            None => tag.remove_album(),
        }
        // Zero means unset and clears the field
        match tags.year {
            Some(year) if year > 0 => tag.set_year(year),
            _ => tag.remove_year(),
        }
        match tags.track {
            Some(track) if track > 0 => tag.set_track(track),
            _ => tag.remove_track(),
        }
        match tags.disc {
            Some(disc) if disc > 0 => tag.set_disk(disc),
            _ => tag.remove_disk(),
        }
        Self::replace_names(tag, ItemKey::AlbumArtist, &tags.album_artists);
        Self::replace_names(tag, ItemKey::TrackArtist, &tags.performers);
    }
}

impl MetadataReader for LoftyTags {
    fn read(&self, path: &Path) -> Result<TagData> {
        let tagged = Probe::open(path)
            .map_err(|e| Self::parse_error(path, e))?
            .read()
            .map_err(|e| Self::parse_error(path, e))?;

        let mut tags = TagData {
            duration: Some(tagged.properties().duration()),
            ..TagData::default()
        };

        // A file without any tag is valid, it just has nothing to report
        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            Self::extract_from_tag(tag, &mut tags);
        }

        Ok(tags)
    }
}

impl MetadataWriter for LoftyTags {
    fn write(&self, path: &Path, tags: &TagData) -> Result<()> {
        let mut tagged = Probe::open(path)
            .map_err(|e| Self::write_error(path, e))?
            .read()
            .map_err(|e| Self::write_error(path, e))?;

        let tag_type = tagged.primary_tag_type();
        if tagged.tag(tag_type).is_none() {
            tagged.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged
            .tag_mut(tag_type)
            .ok_or_else(|| Self::write_error(path, format!("{tag_type:?} tags are not supported")))?;

        Self::apply_to_tag(tag, tags);

        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| Self::write_error(path, e))?;
        log::debug!("Saved tags to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Writes a tagless MPEG-1 Layer III stream of silent 128 kbps frames.
    fn silent_mp3(dir: &Path) -> PathBuf {
        let mut frame = vec![0xFF, 0xFB, 0x90, 0x64];
        frame.resize(417, 0);
        let path = dir.join("silence.mp3");
        fs::write(&path, frame.repeat(20)).unwrap();
        path
    }

    #[test]
    fn read_reports_parse_error_for_garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.mp3");
        fs::write(&path, b"definitely not an mp3").unwrap();

        let err = LoftyTags::new().read(&path).unwrap_err();
        assert!(matches!(err, LibraryError::Parse { .. }));
    }

    #[test]
    fn read_reports_parse_error_for_missing_file() {
        let dir = tempdir().unwrap();
        let err = LoftyTags::new().read(&dir.path().join("gone.mp3")).unwrap_err();
        assert!(matches!(err, LibraryError::Parse { .. }));
    }

    #[test]
    fn write_reports_write_error_for_garbage_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.mp3");
        fs::write(&path, b"definitely not an mp3").unwrap();

        let err = LoftyTags::new()
            .write(&path, &TagData::default())
            .unwrap_err();
        assert!(matches!(err, LibraryError::Write { .. }));
        // A failed write leaves the file as it was
        assert_eq!(fs::read(&path).unwrap(), b"definitely not an mp3");
    }

    #[test]
    fn write_then_read_keeps_every_field() {
        let dir = tempdir().unwrap();
        let path = silent_mp3(dir.path());
        let data = TagData {
            performers: vec!["Alice".into(), "Bob".into()],
            album_artists: vec!["Alice".into(), "Bob".into()],
            album: Some("First".into()),
            year: Some(1999),
            track: Some(4),
            disc: Some(1),
            title: Some("Opening".into()),
            duration: None,
        };

        LoftyTags::new().write(&path, &data).unwrap();
        let read_back = LoftyTags::new().read(&path).unwrap();

        assert_eq!(
            TagData {
                duration: None,
                ..read_back
            },
            data
        );
    }

    #[test]
    fn zero_numbers_clear_fields_and_file_stays_writable() {
        let dir = tempdir().unwrap();
        let path = silent_mp3(dir.path());
        let zeroed = TagData {
            performers: vec!["Alice".into()],
            album_artists: vec!["Alice".into()],
            year: Some(0),
            track: Some(0),
            disc: Some(0),
            title: Some("Untitled".into()),
            ..TagData::default()
        };

        LoftyTags::new().write(&path, &zeroed).unwrap();
        let read_back = LoftyTags::new().read(&path).unwrap();
        assert_eq!(read_back.year, None);
        assert_eq!(read_back.track, None);
        assert_eq!(read_back.disc, None);
        assert_eq!(read_back.title.as_deref(), Some("Untitled"));

        let fixed = TagData {
            year: Some(2001),
            track: Some(2),
            ..zeroed
        };
        LoftyTags::new().write(&path, &fixed).unwrap();
        let read_back = LoftyTags::new().read(&path).unwrap();
        assert_eq!(read_back.year, Some(2001));
        assert_eq!(read_back.track, Some(2));
    }

    #[test]
    fn emptied_name_lists_are_removed_from_file() {
        let dir = tempdir().unwrap();
        let path = silent_mp3(dir.path());
        let named = TagData {
            performers: vec!["Alice".into(), "Bob".into()],
            album_artists: vec!["Alice".into()],
            ..TagData::default()
        };
        LoftyTags::new().write(&path, &named).unwrap();

        LoftyTags::new().write(&path, &TagData::default()).unwrap();
        let read_back = LoftyTags::new().read(&path).unwrap();
        assert!(read_back.performers.is_empty());
        assert!(read_back.album_artists.is_empty());
    }

    #[test]
    fn unset_fields_are_removed_from_tag() {
        let mut tag = Tag::new(TagType::Id3v2);
        tag.set_title("Old".to_string());
        tag.set_album("Old Album".to_string());

        LoftyTags::apply_to_tag(&mut tag, &TagData::default());

        assert!(tag.title().is_none());
        assert!(tag.album().is_none());
        assert_eq!(tag.get_strings(&ItemKey::TrackArtist).count(), 0);
    }
}

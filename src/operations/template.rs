use std::fmt;

use crate::library::entry::Entry;

/// Produces one " - " separated part of a file name.
type NamePart = fn(&Entry) -> String;

fn track(entry: &Entry) -> String {
    format!("{:02}", entry.track.unwrap_or(0))
}

fn performers(entry: &Entry) -> String {
    entry.path_safe_performers().to_string()
}

fn title(entry: &Entry) -> String {
    entry.path_safe_title().to_string()
}

/// File name layouts the organizer can rename to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameTemplate {
    /// `{title}.{ext}`
    Title,
    /// `{track:00} - {title}.{ext}`, the canonical layout
    TrackAndTitle,
    /// `{performers} - {title}.{ext}`
    ArtistAndTitle,
    /// `{track:00} - {performers} - {title}.{ext}`
    TrackArtistAndTitle,
}

impl RenameTemplate {
    fn parts(self) -> &'static [NamePart] {
        const TITLE: &[NamePart] = &[title];
        const TRACK_TITLE: &[NamePart] = &[track, title];
        const ARTIST_TITLE: &[NamePart] = &[performers, title];
        const TRACK_ARTIST_TITLE: &[NamePart] = &[track, performers, title];

        match self {
            RenameTemplate::Title => TITLE,
            RenameTemplate::TrackAndTitle => TRACK_TITLE,
            RenameTemplate::ArtistAndTitle => ARTIST_TITLE,
            RenameTemplate::TrackArtistAndTitle => TRACK_ARTIST_TITLE,
        }
    }

    /// Target file name for `entry`, built from its path-safe fields.
    pub fn file_name(self, entry: &Entry) -> String {
        let stem = self
            .parts()
            .iter()
            .map(|part| part(entry))
            .collect::<Vec<_>>()
            .join(" - ");
        format!("{}.{}", stem, entry.extension())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenameTemplate::Title => "title",
            RenameTemplate::TrackAndTitle => "track-title",
            RenameTemplate::ArtistAndTitle => "artist-title",
            RenameTemplate::TrackArtistAndTitle => "track-artist-title",
        }
    }
}

impl fmt::Display for RenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::metadata::TagData;

    fn entry(track: Option<u32>) -> Entry {
        let tags = TagData {
            performers: vec!["AC/DC".into()],
            album_artists: vec!["AC/DC".into()],
            title: Some("Intro".into()),
            track,
            ..TagData::default()
        };
        Entry::from_tags("/music/somewhere/file.MP3", "/music", Some(tags))
    }

    #[test]
    fn every_template_uses_path_safe_fields() {
        let e = entry(Some(3));
        assert_eq!(RenameTemplate::Title.file_name(&e), "Intro.mp3");
        assert_eq!(RenameTemplate::TrackAndTitle.file_name(&e), "03 - Intro.mp3");
        assert_eq!(RenameTemplate::ArtistAndTitle.file_name(&e), "ACDC - Intro.mp3");
        assert_eq!(
            RenameTemplate::TrackArtistAndTitle.file_name(&e),
            "03 - ACDC - Intro.mp3"
        );
    }

    #[test]
    fn missing_track_renders_as_zero() {
        assert_eq!(RenameTemplate::TrackAndTitle.file_name(&entry(None)), "00 - Intro.mp3");
    }

    #[test]
    fn large_track_numbers_are_not_truncated() {
        assert_eq!(RenameTemplate::TrackAndTitle.file_name(&entry(Some(123))), "123 - Intro.mp3");
    }
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::library::scanner::ScanSettings;
use crate::operations::template::RenameTemplate;

#[derive(Parser)]
#[command(name = "tag-organizer")]
#[command(version = "1.0")]
#[command(about = "Checks audio file tags and names against the library convention and fixes them in bulk", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Library root to scan
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Include entries without warnings
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Audio file extension to read tags from (repeatable)
    #[arg(short = 'e', long = "ext", default_value = "mp3")]
    pub extensions: Vec<String>,

    /// Do not follow symbolic links while scanning
    #[arg(long)]
    pub no_follow_links: bool,
}

impl ScanArgs {
    pub fn settings(&self) -> ScanSettings {
        ScanSettings {
            extensions: self.extensions.clone(),
            follow_links: !self.no_follow_links,
        }
    }

    pub fn only_warnings(&self) -> bool {
        !self.all
    }
}

#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    /// File or directory to act on, relative to the root or absolute
    /// (repeatable). Defaults to every scanned entry.
    #[arg(short = 's', long = "select")]
    pub select: Vec<PathBuf>,

    /// Only show what would change
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum TemplateArg {
    /// {title}.{ext}
    Title,
    /// {track:00} - {title}.{ext}
    TrackTitle,
    /// {performers} - {title}.{ext}
    ArtistTitle,
    /// {track:00} - {performers} - {title}.{ext}
    TrackArtistTitle,
}

impl From<TemplateArg> for RenameTemplate {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Title => RenameTemplate::Title,
            TemplateArg::TrackTitle => RenameTemplate::TrackAndTitle,
            TemplateArg::ArtistTitle => RenameTemplate::ArtistAndTitle,
            TemplateArg::TrackArtistTitle => RenameTemplate::TrackArtistAndTitle,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List files and the naming warnings raised for them
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Also write the listing to a CSV file
        #[arg(short = 'o', long = "csv")]
        csv: Option<PathBuf>,
    },

    /// Copy the performers tag into the album artists tag
    CopyPerformers {
        #[command(flatten)]
        scan: ScanArgs,

        #[command(flatten)]
        select: SelectArgs,
    },

    /// Rename files in place from their tags
    Rename {
        #[command(flatten)]
        scan: ScanArgs,

        #[command(flatten)]
        select: SelectArgs,

        /// File name layout to rename to
        #[arg(short = 't', long, value_enum, default_value_t = TemplateArg::TrackTitle)]
        template: TemplateArg,
    },

    /// Edit the tags of a single file
    Edit {
        /// Library root the file lives under
        #[arg(short = 'i', long = "input")]
        input: PathBuf,

        /// Audio file extension to read tags from (repeatable)
        #[arg(short = 'e', long = "ext", default_value = "mp3")]
        extensions: Vec<String>,

        /// File to edit, relative to the root or absolute
        file: PathBuf,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        album: Option<String>,

        #[arg(long)]
        year: Option<u32>,

        #[arg(long)]
        track: Option<u32>,

        #[arg(long)]
        disc: Option<u32>,

        /// Comma separated album artists
        #[arg(long)]
        album_artists: Option<String>,

        /// Comma separated performers
        #[arg(long)]
        performers: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scan_defaults_to_only_warnings_and_mp3() {
        let cli = Cli::parse_from(["tag-organizer", "scan", "-i", "/music"]);
        let Commands::Scan { scan, csv } = cli.command else {
            panic!("expected scan");
        };
        assert!(scan.only_warnings());
        assert_eq!(scan.settings().extensions, vec!["mp3"]);
        assert!(scan.settings().follow_links);
        assert!(csv.is_none());
    }

    #[test]
    fn rename_parses_template_and_selection() {
        let cli = Cli::parse_from([
            "tag-organizer",
            "rename",
            "-i",
            "/music",
            "--template",
            "artist-title",
            "-s",
            "a",
            "-s",
            "b/c.mp3",
            "--dry-run",
        ]);
        let Commands::Rename { select, template, .. } = cli.command else {
            panic!("expected rename");
        };
        assert_eq!(RenameTemplate::from(template), RenameTemplate::ArtistAndTitle);
        assert_eq!(select.select.len(), 2);
        assert!(select.dry_run);
    }
}

use std::path::Path;
use std::time::Duration;

use csv::Writer;
use serde::Serialize;

use crate::library::entry::Entry;
use crate::library::scanner::ScanResult;
use crate::operations::batch::BatchReport;
use crate::Result;

/// Formats a byte count the way the review table shows it.
pub fn format_size(length: u64) -> String {
    match length {
        0 => "0".to_string(),
        1..=999_999 => format!("{:.2} kB", length as f64 / 1024.0),
        1_000_000..=999_999_999 => format!("{:.2} MB", length as f64 / 1_048_576.0),
        _ => format!("{:.2} GB", length as f64 / 1_073_741_824.0),
    }
}

pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

fn number(value: Option<u32>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

#[derive(Debug, Serialize)]
struct EntryRow<'a> {
    directory: String,
    file: String,
    state: String,
    track: String,
    disc: String,
    performers: &'a str,
    album_artists: &'a str,
    album: &'a str,
    year: String,
    title: &'a str,
    duration: String,
    size: String,
}

impl<'a> EntryRow<'a> {
    fn from_entry(entry: &'a Entry) -> Self {
        Self {
            directory: entry.relative_path().display().to_string(),
            file: entry.file_name(),
            state: entry.state().to_string(),
            track: number(entry.track),
            disc: number(entry.disc),
            performers: entry.performers.as_deref().unwrap_or_default(),
            album_artists: entry.album_artists.as_deref().unwrap_or_default(),
            album: entry.album.as_deref().unwrap_or_default(),
            year: number(entry.year),
            title: entry.title.as_deref().unwrap_or_default(),
            duration: entry.duration().map(format_duration).unwrap_or_default(),
            size: format_size(entry.size_bytes()),
        }
    }
}

pub struct Reporter;

impl Reporter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_scan(&self, scan: &ScanResult) {
        for group in &scan.groups {
            let relative = group.directory.strip_prefix(&scan.root).unwrap_or(&group.directory);
            println!("\n[{}]", relative.display());
            for entry in &group.entries {
                let row = EntryRow::from_entry(entry);
                println!(
                    "  {:<24} {:>3} | {} | {} | {} | {} | {} | {} | {} | {}",
                    row.state,
                    row.track,
                    row.file,
                    row.performers,
                    row.album_artists,
                    row.album,
                    row.year,
                    row.title,
                    row.duration,
                    row.size
                );
            }
        }
        println!(
            "\n{} entries in {} directories, {} with warnings",
            scan.len(),
            scan.groups.len(),
            scan.warning_count()
        );
    }

    pub fn print_batch(&self, report: &BatchReport) {
        println!("=== {} ===", report.operation);
        for outcome in &report.outcomes {
            match &outcome.result {
                Ok(path) if path != &outcome.path => {
                    println!("  OK    {} -> {}", outcome.path.display(), path.display())
                }
                Ok(_) => println!("  OK    {}", outcome.path.display()),
                Err(e) => eprintln!("  FAIL  {}", e),
            }
        }
        println!(
            "{} succeeded, {} failed",
            report.succeeded(),
            report.outcomes.len() - report.succeeded()
        );
    }

    pub fn generate_scan_report(&self, scan: &ScanResult, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path_ref = output_path.as_ref();
        let mut writer = Writer::from_path(output_path_ref)?;
        for entry in scan.entries() {
            writer.serialize(EntryRow::from_entry(entry))?;
        }
        writer.flush()?;
        log::info!("Report generated: {}", output_path_ref.display());
        Ok(())
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::metadata::TagData;
    use crate::library::scanner::group_by_directory;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn size_formatting_thresholds() {
        assert_eq!(format_size(0), "0");
        assert_eq!(format_size(2048), "2.00 kB");
        assert_eq!(format_size(999_999), "976.56 kB");
        assert_eq!(format_size(5 * 1_048_576), "5.00 MB");
        assert_eq!(format_size(3 * 1_073_741_824), "3.00 GB");
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0:00");
        assert_eq!(format_duration(Duration::from_secs(301)), "5:01");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1:02:05");
    }

    #[test]
    fn csv_report_has_one_row_per_entry() {
        let dir = tempdir().unwrap();
        let tags = TagData {
            performers: vec!["A".into(), "B".into()],
            title: Some("Song".into()),
            track: Some(1),
            ..TagData::default()
        };
        let entries = vec![
            Entry::from_tags("/m/x/01 - Song.mp3", "/m", Some(tags)),
            Entry::from_tags("/m/x/cover.jpg", "/m", None),
        ];
        let scan = ScanResult {
            root: PathBuf::from("/m"),
            groups: group_by_directory(entries),
        };

        let out = dir.path().join("report.csv");
        Reporter::new().generate_scan_report(&scan, &out).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("directory,file,state,track"));
        assert!(lines[1].contains("\"A, B\""));
        assert!(lines[1].contains("metadata+path"));
        assert!(lines[2].contains("cover.jpg,ok"));
    }
}

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tag_organizer::cli::commands::{Cli, Commands, ScanArgs, SelectArgs};
use tag_organizer::library::entry::{split_names, NAME_SEPARATOR};
use tag_organizer::utils::reporting::Reporter;
use tag_organizer::{
    BatchOperations, BatchReport, LibraryError, LibraryScanner, LoftyTags, RenameTemplate, Result,
    ScanResult, Selection,
};

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let tags = LoftyTags::new();

    let outcome = match cli.command {
        Commands::Scan { scan, csv } => run_scan(&tags, &scan, csv.as_deref()),
        Commands::CopyPerformers { scan, select } => run_copy_performers(&tags, &scan, &select),
        Commands::Rename {
            scan,
            select,
            template,
        } => run_rename(&tags, &scan, &select, template.into()),
        Commands::Edit {
            input,
            extensions,
            file,
            title,
            album,
            year,
            track,
            disc,
            album_artists,
            performers,
        } => {
            let edits = Edits {
                title,
                album,
                year,
                track,
                disc,
                album_artists,
                performers,
            };
            run_edit(&tags, &input, extensions, &file, edits)
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn scan(tags: &LoftyTags, args: &ScanArgs) -> Result<ScanResult> {
    LibraryScanner::new(tags, args.settings()).scan(&args.input, args.only_warnings())
}

fn selection(scan: &ScanResult, args: &SelectArgs) -> Selection {
    if args.select.is_empty() {
        return Selection::all();
    }
    let mut selection = Selection::new();
    for path in &args.select {
        selection.select_path(&scan.root, path);
    }
    selection
}

/// Prints the batch results, then scans again since the earlier listing is stale.
fn finish_batch(tags: &LoftyTags, args: &ScanArgs, report: &BatchReport) -> Result<()> {
    let reporter = Reporter::new();
    reporter.print_batch(report);
    if report.rescan_required {
        let rescan = scan(tags, args)?;
        println!("\nAfter rescan: {} entries with warnings", rescan.warning_count());
    }
    Ok(())
}

fn run_scan(tags: &LoftyTags, args: &ScanArgs, csv: Option<&Path>) -> Result<()> {
    let result = scan(tags, args)?;
    let reporter = Reporter::new();
    reporter.print_scan(&result);
    if let Some(csv) = csv {
        reporter.generate_scan_report(&result, csv)?;
        println!("Report saved to: {}", csv.display());
    }
    Ok(())
}

fn run_copy_performers(tags: &LoftyTags, args: &ScanArgs, select: &SelectArgs) -> Result<()> {
    let mut result = scan(tags, args)?;
    let selection = selection(&result, select);

    if select.dry_run {
        println!("Dry run - no files will be changed");
        for entry in selection.apply(&result) {
            println!(
                "  Would set album artists of {} to '{}'",
                entry.file_path().display(),
                entry.performers.as_deref().unwrap_or_default()
            );
        }
        return Ok(());
    }

    let ops = BatchOperations::new(tags);
    let report = ops.copy_performers_to_album_artists(selection.apply_mut(&mut result));
    finish_batch(tags, args, &report)
}

fn run_rename(
    tags: &LoftyTags,
    args: &ScanArgs,
    select: &SelectArgs,
    template: RenameTemplate,
) -> Result<()> {
    let result = scan(tags, args)?;
    let selection = selection(&result, select);

    if select.dry_run {
        println!("Dry run - no files will be renamed");
        for entry in selection.apply(&result) {
            println!(
                "  Would rename: {} -> {}",
                entry.file_name(),
                template.file_name(entry)
            );
        }
        return Ok(());
    }

    let ops = BatchOperations::new(tags);
    let report = ops.rename(selection.apply(&result), template);
    finish_batch(tags, args, &report)
}

struct Edits {
    title: Option<String>,
    album: Option<String>,
    year: Option<u32>,
    track: Option<u32>,
    disc: Option<u32>,
    album_artists: Option<String>,
    performers: Option<String>,
}

fn run_edit(
    tags: &LoftyTags,
    root: &Path,
    extensions: Vec<String>,
    file: &Path,
    edits: Edits,
) -> Result<()> {
    let args = ScanArgs {
        input: root.to_path_buf(),
        all: true,
        extensions,
        no_follow_links: false,
    };
    let mut result = scan(tags, &args)?;

    let target = if file.is_absolute() {
        file.to_path_buf()
    } else {
        result.root.join(file)
    };
    let target = std::fs::canonicalize(&target).unwrap_or(target);

    let mut selection = Selection::new();
    selection.select_file(&target);
    let Some(entry) = selection.apply_mut(&mut result).into_iter().next() else {
        return Err(LibraryError::NotFound(target));
    };

    if let Some(title) = edits.title {
        entry.title = Some(title);
    }
    if let Some(album) = edits.album {
        entry.album = Some(album);
    }
    if let Some(year) = edits.year {
        entry.year = Some(year);
    }
    if let Some(track) = edits.track {
        entry.track = Some(track);
    }
    if let Some(disc) = edits.disc {
        entry.disc = Some(disc);
    }
    if let Some(album_artists) = edits.album_artists {
        entry.album_artists = Some(split_names(&album_artists).join(NAME_SEPARATOR));
    }
    if let Some(performers) = edits.performers {
        entry.performers = Some(split_names(&performers).join(NAME_SEPARATOR));
    }

    BatchOperations::new(tags).save_entry(entry)?;
    println!("Saved tags to {}", target.display());

    let rescan = scan(tags, &args)?;
    let state = rescan
        .find(&target)
        .map(|e| e.state().to_string())
        .unwrap_or_else(|| "missing".to_string());
    println!("State after rescan: {}", state);
    Ok(())
}

use std::path::PathBuf;

pub mod audio;
pub mod library;
pub mod operations;
pub mod utils;
pub mod cli;

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Folder not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Cannot read tags from {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
    #[error("Cannot write tags to {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
    #[error("Cannot rename {}: {reason}", path.display())]
    Rename { path: PathBuf, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, LibraryError>;

// Re-exports for convenience
pub use audio::metadata::{LoftyTags, MetadataReader, MetadataWriter, TagData};
pub use library::entry::{Entry, EntryState};
pub use library::scanner::{DirectoryGroup, LibraryScanner, ScanResult, ScanSettings};
pub use library::selection::Selection;
pub use operations::batch::{BatchOperations, BatchReport, EntryOutcome};
pub use operations::template::RenameTemplate;

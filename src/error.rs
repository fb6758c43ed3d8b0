// error.rs - Error types for pani

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pani operations.
pub type Result<T> = std::result::Result<T, PaniError>;

/// Errors that can occur while planning, running or writing a comparison run.
#[derive(Error, Debug)]
pub enum PaniError {
    /// A required input folder yielded no matching files
    #[error("Can't find any files with extension '{extension}' in the directory {}", .folder.display())]
    NoInputFiles { folder: PathBuf, extension: String },

    /// Input folder does not exist or is not a directory
    #[error("Input folder not found: {}", .0.display())]
    InputFolderNotFound(PathBuf),

    /// The external comparator exited with a non-zero status
    #[error(
        "{tool} failed for {} vs {} (exit: {status})\n  command: {command}\n  output: {output}",
        .reference.display(),
        .query.display()
    )]
    ExternalToolFailure {
        tool: String,
        reference: PathBuf,
        query: PathBuf,
        command: String,
        status: String,
        output: String,
    },

    /// The external comparator could not be started
    #[error("Failed to run '{command}': {source}")]
    ToolSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The external comparator exceeded its time budget
    #[error("Comparison {} vs {} timed out after {seconds}s", .reference.display(), .query.display())]
    Timeout {
        reference: PathBuf,
        query: PathBuf,
        seconds: u64,
    },

    /// Comparison was abandoned because the run is being aborted
    #[error("Comparison cancelled")]
    Cancelled,

    /// The report could not be turned into an identity score
    #[error(
        "Failed to read identity score for {} vs {} from {}: {reason}",
        .reference.display(),
        .query.display(),
        .report.display()
    )]
    ScoreParseFailure {
        reference: PathBuf,
        query: PathBuf,
        report: PathBuf,
        reason: String,
    },

    /// One or more comparisons failed and partial results were not permitted
    #[error("{failed} of {total} comparisons failed")]
    ComparisonsFailed { failed: usize, total: usize },

    /// Refusing to write a matrix with empty cells
    #[error("Result matrix has {missing} empty cells; refusing to write a partial matrix")]
    IncompleteMatrix { missing: usize },

    /// Invalid configuration parameter
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid glob pattern built from folder and extension
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Invalid include/exclude expression
    #[error("Invalid regex: {0}")]
    Regex(#[from] regex::Error),

    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PaniError {
    /// Whether this error only reflects another worker's failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PaniError::Cancelled)
    }
}

impl From<tempfile::PersistError> for PaniError {
    fn from(e: tempfile::PersistError) -> Self {
        PaniError::Io(e.error)
    }
}

impl From<glob::GlobError> for PaniError {
    fn from(e: glob::GlobError) -> Self {
        PaniError::Io(e.into())
    }
}

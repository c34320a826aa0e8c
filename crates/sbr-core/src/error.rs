//! Error types for sbr-core

use std::path::PathBuf;

/// Result type for sbr-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sbr-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A manifest record has a field count other than 1, 2, 3 or 4
    #[error("Invalid manifest record #{record} on line {line}: #fields must be 1, 2, 3 or 4, not {fields}")]
    ManifestParse {
        record: usize,
        line: usize,
        fields: usize,
    },

    /// A quoted manifest field is never closed
    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },

    /// A quote appears inside an unquoted manifest field
    #[error("Bare \" in unquoted field on line {line}")]
    BareQuote { line: usize },

    /// A closing quote is followed by something other than a separator
    #[error("Extraneous or missing \" in quoted field on line {line}")]
    ExtraneousQuote { line: usize },

    /// The directory walk failed
    #[error("Cannot walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    /// A checkout could not be interrogated during a scan
    #[error("Cannot scan checkout {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: sbr_git::Error,
    },

    /// A path to clone into is occupied by something that is not a directory
    #[error("Cannot clone into '{rel}': destination exists and is not a directory")]
    DestinationIsFile { rel: String },

    /// Pulling the workspace root failed; nothing downstream ran
    #[error("Pulling the workspace root failed: {source}")]
    RootPull {
        #[source]
        source: sbr_git::Error,
    },

    /// A patch does not apply to the record set it targets
    #[error("Patch conflict on '{rel}': {message}")]
    PatchConflict { rel: String, message: String },

    /// Aggregate of recoverable per-subrepository failures
    #[error("Errors occurred ({count}) during operations")]
    Operations { count: usize },

    /// Some checkouts had no readable HEAD; the digest is unreliable
    #[error("Cannot compute workspace version: {count} checkout(s) failed")]
    Version { count: usize },

    /// A path lies outside the workspace root
    #[error("{path} is not inside the workspace root")]
    OutsideWorkspace { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from sbr-fs
    #[error(transparent)]
    Fs(#[from] sbr_fs::Error),

    /// Git error from sbr-git
    #[error(transparent)]
    Git(#[from] sbr_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

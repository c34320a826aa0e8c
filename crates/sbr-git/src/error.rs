//! Error types for sbr-git

use std::path::PathBuf;

/// Result type for sbr-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sbr-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Failed to run git in {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`git {command}` failed in {path}: {output}")]
    CommandFailed {
        command: String,
        path: PathBuf,
        output: String,
    },

    #[error("Refusing branch name '{branch}': it would be read as a git option")]
    InvalidBranch { branch: String },

    #[error("{path} doesn't declare a remote 'origin'")]
    RemoteNotFound { path: PathBuf },

    #[error("Unexpected output from `git {command}`: {output}")]
    UnexpectedOutput { command: String, output: String },

    #[error("Git task panicked or was cancelled: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    /// Combined output of the failed git process, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::CommandFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

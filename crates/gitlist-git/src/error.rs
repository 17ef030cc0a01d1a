//! Error types for the gitlist-git crate

use crate::properties::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Git-specific errors
#[derive(Error, Debug)]
pub enum GitError {
    /// The configured path could not be opened as a repository
    #[error("repository not found at {path:?}: {}", .source.message())]
    RepositoryNotFound {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// No repository has been opened for this context yet
    #[error("no repository is open")]
    NotInitialized,

    /// Git operation failed
    #[error("git error: {}", .0.message())]
    Git(#[from] git2::Error),

    /// IO operation failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Repository has no working directory
    #[error("bare repository")]
    BareRepository,

    /// Path is not within the repository
    #[error("path not in repository: {0}")]
    PathNotInRepo(String),

    /// No stash entry at the given index
    #[error("no stash at index {0}")]
    StashNotFound(usize),

    /// Connection settings were rejected
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl GitError {
    /// True when the underlying library reported a missing object or ref.
    pub fn is_not_found(&self) -> bool {
        match self {
            GitError::Git(err) => err.code() == git2::ErrorCode::NotFound,
            GitError::RepositoryNotFound { .. } => true,
            _ => false,
        }
    }
}

/// Result type alias for Git operations
pub type GitResult<T> = Result<T, GitError>;

use std::path::PathBuf;

/// All errors produced by gitvault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A document, collection, or revision does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Initialization was attempted against a non-empty directory that is
    /// not already a valid repository.
    #[error("repository path not empty: {}", .0.display())]
    PathNotEmpty(PathBuf),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Failure from the embedded engine or from the external `git` query.
    #[error("git error: {0}")]
    Git(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn path_not_empty(path: impl Into<PathBuf>) -> Self {
        Self::PathNotEmpty(path.into())
    }

    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }

    pub fn git(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Git(Box::new(err))
    }

    pub fn git_msg(msg: impl Into<String>) -> Self {
        Self::Git(msg.into().into())
    }

    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io(std::io::Error::new(
            err.kind(),
            format!("{}: {}", path.into().display(), err),
        ))
    }
}

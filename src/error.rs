//! Error types for the conversion pipeline.

use std::path::PathBuf;

/// Result type alias using the pipeline Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a run.
///
/// I/O failures inside a task (creating a directory, listing a group,
/// deleting a merged input) surface as the error of the stage they
/// happened in.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input tree could not be read. Raised before any task starts.
    #[error("failed to read {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A source file could not be converted.
    #[error("failed to convert {}: {source}", path.display())]
    Conversion {
        path: PathBuf,
        #[source]
        source: wavbatch_av::Error,
    },

    /// A group directory could not be merged.
    #[error("failed to merge {}: {source}", group.display())]
    Merge {
        group: PathBuf,
        #[source]
        source: wavbatch_av::Error,
    },

    /// A task panicked or its runtime went away.
    #[error("task failed to complete: {0}")]
    TaskPanicked(String),
}

impl Error {
    pub fn conversion(path: impl Into<PathBuf>, source: impl Into<wavbatch_av::Error>) -> Self {
        Self::Conversion {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn merge(group: impl Into<PathBuf>, source: impl Into<wavbatch_av::Error>) -> Self {
        Self::Merge {
            group: group.into(),
            source: source.into(),
        }
    }

    /// The path the failure is about.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Error::Traversal { path, .. } | Error::Conversion { path, .. } => Some(path.as_path()),
            Error::Merge { group, .. } => Some(group.as_path()),
            Error::TaskPanicked(_) => None,
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::TaskPanicked(err.to_string())
    }
}

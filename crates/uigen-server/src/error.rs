//! Errors raised while serving a project session.

use std::path::PathBuf;
use thiserror::Error;
use uigen_files::FilesError;
use uigen_preview::PreviewError;
use uuid::Uuid;

/// Failure of a session operation.
///
/// Tool failures the agent can fix (missing files, bad ranges) are not
/// errors; they come back as tool output. These variants cover everything
/// the agent cannot fix.
#[derive(Error, Debug)]
pub enum SessionError {
    /// No live session has this id.
    #[error("Session {id} not found or expired. Call open_project again.")]
    NotFound {
        /// Requested session id
        id: Uuid,
    },

    /// The project file could not be decoded into a file tree.
    #[error("Failed to load project: {0}")]
    Files(#[from] FilesError),

    /// The preview could not be built.
    #[error("Failed to build preview: {0}")]
    Preview(#[from] PreviewError),

    /// Reading or writing the project file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Project file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl SessionError {
    /// Returns `true` if the session id was unknown or expired.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the project file could not be read or written.
    #[must_use]
    pub const fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = SessionError::NotFound { id: Uuid::nil() };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("open_project"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = SessionError::Io {
            path: PathBuf::from("/tmp/project.json"),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.is_io_error());
        assert!(err.to_string().contains("/tmp/project.json"));
    }
}

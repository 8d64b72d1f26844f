//! Error types surfaced by the mock file system.

use std::fmt;

use thiserror::Error;

/// Which attribute-guard rule refused an operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessDenial {
    /// The target path is an existing directory.
    IsDirectory,
    /// The existing file carries the `HIDDEN` attribute.
    Hidden,
    /// The existing file carries the `READ_ONLY` attribute.
    ReadOnly,
}

impl fmt::Display for AccessDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            AccessDenial::IsDirectory => "is a directory",
            AccessDenial::Hidden => "file is hidden",
            AccessDenial::ReadOnly => "file is read-only",
        };
        f.write_str(reason)
    }
}

/// Errors that can occur during mock file system operations.
///
/// Paths embedded in messages are the paths exactly as the caller passed them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// Malformed call arguments
    #[error("{0}")]
    Argument(String),

    /// The path could not be normalized
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// Offending path
        path: String,
        /// Why the normalizer rejected it
        reason: String,
    },

    /// The parent directory of the target does not exist
    #[error("Could not find a part of the path '{path}'.")]
    DirectoryNotFound {
        /// Offending path
        path: String,
    },

    /// The file does not exist
    #[error("Could not find file '{path}'.")]
    FileNotFound {
        /// Offending path
        path: String,
    },

    /// Refused by the attribute guard
    #[error("Access to the path '{path}' is denied.")]
    UnauthorizedAccess {
        /// Offending path
        path: String,
        /// The rule that fired
        denial: AccessDenial,
    },

    /// A file occupies a path where a directory was requested
    #[error("Cannot create '{path}' because a file with the same name already exists.")]
    AlreadyExists {
        /// Offending path
        path: String,
    },

    /// The cancellation token was already signaled
    #[error("The operation was canceled.")]
    OperationCancelled,
}

impl FsError {
    /// Returns `true` for errors caused by malformed arguments rather than by file system state.
    pub fn is_argument(&self) -> bool {
        matches!(self, FsError::Argument(_) | FsError::InvalidPath { .. })
    }

    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        FsError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn directory_not_found(path: &str) -> Self {
        FsError::DirectoryNotFound {
            path: path.to_string(),
        }
    }

    pub(crate) fn file_not_found(path: &str) -> Self {
        FsError::FileNotFound {
            path: path.to_string(),
        }
    }

    pub(crate) fn denied(path: &str, denial: AccessDenial) -> Self {
        FsError::UnauthorizedAccess {
            path: path.to_string(),
            denial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_message_names_path() {
        let err = FsError::denied(r"c:\something\demo.txt", AccessDenial::Hidden);
        assert_eq!(
            err.to_string(),
            r"Access to the path 'c:\something\demo.txt' is denied."
        );
    }

    #[test]
    fn test_argument_family() {
        assert!(FsError::Argument("empty".into()).is_argument());
        assert!(FsError::invalid_path("a\0b", "illegal character").is_argument());
        assert!(!FsError::directory_not_found("/x").is_argument());
        assert!(!FsError::OperationCancelled.is_argument());
    }

    #[test]
    fn test_denial_reason_text() {
        assert_eq!(AccessDenial::IsDirectory.to_string(), "is a directory");
        assert_eq!(AccessDenial::ReadOnly.to_string(), "file is read-only");
    }
}

//! Attribute guard: decides whether a mutation may touch an existing path.

use tracing::debug;

use crate::attributes::FileAttributes;
use crate::core::Result;
use crate::error::{AccessDenial, FsError};

/// The kind of mutation being attempted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Replace or extend file content.
    Write,
    /// Remove the file.
    Delete,
}

/// Checks the guard rules, in order:
///
/// 1. the path is an existing directory,
/// 2. the existing file is hidden (writes only; the host deletes hidden files),
/// 3. the existing file is read-only.
///
/// `existing` holds the attributes of the file currently stored at the path, if any.
/// `path` is the caller's path and ends up in the error message.
pub fn check(
    existing: Option<FileAttributes>,
    is_directory: bool,
    path: &str,
    operation: Operation,
) -> Result<()> {
    match denial(existing, is_directory, operation) {
        None => Ok(()),
        Some(denial) => {
            debug!(path, ?operation, %denial, "access denied");
            Err(FsError::denied(path, denial))
        }
    }
}

fn denial(
    existing: Option<FileAttributes>,
    is_directory: bool,
    operation: Operation,
) -> Option<AccessDenial> {
    if is_directory {
        return Some(AccessDenial::IsDirectory);
    }
    let attrs = existing?;
    if operation == Operation::Write && attrs.contains(FileAttributes::HIDDEN) {
        return Some(AccessDenial::Hidden);
    }
    if attrs.contains(FileAttributes::READ_ONLY) {
        return Some(AccessDenial::ReadOnly);
    }
    None
}

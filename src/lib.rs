//! An in-memory file system for Rust tests.
//! Lets code that reads and writes files run against a fake disk that fails the way a real one does.
//!
//! ### Overview
//!
//! `mockfs-kit` keeps every file and directory in memory. Code under test depends on the
//! `FsBackend` trait; tests hand it a `MockFileSystem`, seed it, run the code and inspect the result.
//!
//! **Key ideas**:
//! - **Faithful errors**: missing parents, directories, hidden and read-only files are refused
//!   exactly where a real file system would refuse them.
//! - **Path normalization**: Unix and Windows conventions, case folding, `.` and `..`, relative paths.
//! - **Encodings**: text is stored as bytes, byte-order markers included.
//! - **Cancellation**: every async operation takes a `CancellationToken`.
//!
//! ```
//! use mockfs_kit::{FileAttributes, FileData, FsBackend, FsError, FsOptions, MockFileSystem};
//!
//! let mut fs = MockFileSystem::from_files(
//!     FsOptions::windows(),
//!     [(r"c:\data\config.ini", FileData::from_text("[main]"))],
//! ).unwrap();
//!
//! fs.set_attributes(r"c:\data\config.ini", FileAttributes::HIDDEN).unwrap();
//! let err = fs.write_all_text(r"c:\data\config.ini", "[other]").unwrap_err();
//! assert!(matches!(err, FsError::UnauthorizedAccess { .. }));
//! ```

mod attributes;
mod cancel;
mod core;
mod encoding;
mod error;
mod guard;
mod options;
mod path;
mod vfs;

pub use crate::core::{FsBackend, Result};
pub use attributes::FileAttributes;
pub use cancel::CancellationToken;
pub use encoding::{Encoding, EncodingSpec};
pub use error::{AccessDenial, FsError};
pub use guard::Operation;
pub use options::FsOptions;
pub use path::{Normalizer, PathKey, PathStyle};
pub use vfs::{FileData, MockFileSystem};

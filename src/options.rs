//! Construction options for [`MockFileSystem`](crate::MockFileSystem).

use crate::encoding::EncodingSpec;
use crate::path::{Normalizer, PathStyle};

/// Emulated platform conventions.
///
/// Unset fields follow the path style: Windows compares paths case-insensitively and ends lines
/// with `\r\n`, Unix is case-sensitive and uses `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsOptions {
    path_style: PathStyle,
    case_sensitive: Option<bool>,
    newline: Option<String>,
    current_dir: Option<String>,
    default_encoding: EncodingSpec,
}

impl FsOptions {
    pub fn new(path_style: PathStyle) -> Self {
        Self {
            path_style,
            case_sensitive: None,
            newline: None,
            current_dir: None,
            default_encoding: EncodingSpec::default(),
        }
    }

    pub fn unix() -> Self {
        Self::new(PathStyle::Unix)
    }

    pub fn windows() -> Self {
        Self::new(PathStyle::Windows)
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = Some(newline.into());
        self
    }

    /// Sets the initial working directory. It is created when the file system is built.
    pub fn with_current_dir(mut self, path: impl Into<String>) -> Self {
        self.current_dir = Some(path.into());
        self
    }

    /// Encoding used by the write operations that take no explicit encoding.
    pub fn with_default_encoding(mut self, encoding: EncodingSpec) -> Self {
        self.default_encoding = encoding;
        self
    }

    pub fn path_style(&self) -> PathStyle {
        self.path_style
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
            .unwrap_or_else(|| self.path_style.is_case_sensitive())
    }

    pub fn newline(&self) -> &str {
        self.newline
            .as_deref()
            .unwrap_or_else(|| self.path_style.newline())
    }

    pub fn current_dir(&self) -> &str {
        self.current_dir
            .as_deref()
            .unwrap_or_else(|| self.path_style.root())
    }

    pub fn default_encoding(&self) -> EncodingSpec {
        self.default_encoding
    }

    pub(crate) fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.path_style, self.is_case_sensitive())
    }
}

impl Default for FsOptions {
    /// Conventions of the host platform.
    fn default() -> Self {
        Self::new(PathStyle::host())
    }
}

//! Path normalization: turns caller-supplied path strings into store lookup keys.
//!
//! A [`PathKey`] keeps two forms of the same path:
//! - the **display** form, absolute and canonical for the emulated platform
//!   (`/home/user/a.txt`, `C:\Users\a.txt`);
//! - the **folded** form used for comparison, which is the display form lower-cased
//!   when the file system emulates a case-insensitive host.
//!
//! Two inputs that normalize to the same folded form address the same entry.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::trace;

use crate::core::Result;
use crate::error::FsError;

/// Path conventions of the emulated platform.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PathStyle {
    /// `/` separated, rooted at `/`.
    Unix,
    /// `\` (or `/`) separated, rooted at a drive such as `C:\`.
    Windows,
}

impl PathStyle {
    /// Style of the platform the crate was compiled for.
    pub fn host() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Unix
        }
    }

    /// Canonical separator.
    pub fn separator(self) -> char {
        match self {
            PathStyle::Unix => '/',
            PathStyle::Windows => '\\',
        }
    }

    /// Line terminator of the platform.
    pub fn newline(self) -> &'static str {
        match self {
            PathStyle::Unix => "\n",
            PathStyle::Windows => "\r\n",
        }
    }

    /// Default root directory.
    pub fn root(self) -> &'static str {
        match self {
            PathStyle::Unix => "/",
            PathStyle::Windows => "C:\\",
        }
    }

    /// Whether the platform compares paths case-sensitively by default.
    pub fn is_case_sensitive(self) -> bool {
        self == PathStyle::Unix
    }

    fn root_len(self) -> usize {
        match self {
            PathStyle::Unix => 1,
            PathStyle::Windows => 3, // "C:\"
        }
    }

    fn is_separator(self, c: char) -> bool {
        match self {
            PathStyle::Unix => c == '/',
            PathStyle::Windows => c == '\\' || c == '/',
        }
    }

    fn is_illegal(self, c: char) -> bool {
        match self {
            PathStyle::Unix => c == '\0',
            PathStyle::Windows => {
                (c as u32) < 0x20 || matches!(c, '"' | '<' | '>' | '|' | '*' | '?')
            }
        }
    }
}

/// Normalized path used as a store key.
///
/// Equality, ordering and hashing only look at the folded form.
#[derive(Debug, Clone)]
pub struct PathKey {
    display: String,
    folded: String,
    style: PathStyle,
}

impl PathKey {
    fn new(display: String, case_sensitive: bool, style: PathStyle) -> Self {
        let folded = if case_sensitive {
            display.clone()
        } else {
            display.to_lowercase()
        };
        Self {
            display,
            folded,
            style,
        }
    }

    /// Canonical display form.
    pub fn as_str(&self) -> &str {
        &self.display
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    /// Returns `true` for the root of a drive (or `/`).
    pub fn is_root(&self) -> bool {
        self.display.len() <= self.style.root_len()
    }

    /// Returns the key of the containing directory, or `None` for a root.
    pub fn parent(&self) -> Option<PathKey> {
        if self.is_root() {
            return None;
        }
        let sep = self.style.separator();
        let root_len = self.style.root_len();
        let cut = |s: &str| -> String {
            let idx = s.rfind(sep).unwrap_or(0).max(root_len);
            s[..idx].to_string()
        };
        Some(PathKey {
            display: cut(&self.display),
            folded: cut(&self.folded),
            style: self.style,
        })
    }

    /// Root portion of the display form (`/` or `C:\`).
    fn root_str(&self) -> &str {
        &self.display[..self.style.root_len()]
    }

    /// Non-root components of the display form.
    fn components(&self) -> impl Iterator<Item = &str> {
        let sep = self.style.separator();
        self.display[self.style.root_len()..]
            .split(sep)
            .filter(|part| !part.is_empty())
    }
}

impl PartialEq for PathKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for PathKey {}

impl Hash for PathKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl PartialOrd for PathKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Canonicalizes path strings under a fixed style and case policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Normalizer {
    style: PathStyle,
    case_sensitive: bool,
}

impl Normalizer {
    pub fn new(style: PathStyle, case_sensitive: bool) -> Self {
        Self {
            style,
            case_sensitive,
        }
    }

    pub fn style(&self) -> PathStyle {
        self.style
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Key of the default root directory.
    pub fn root(&self) -> PathKey {
        PathKey::new(
            self.style.root().to_string(),
            self.case_sensitive,
            self.style,
        )
    }

    /// Normalizes `path` into a key; relative paths are resolved against `cwd`.
    ///
    /// - repeated separators and `.` components are removed;
    /// - `..` removes the preceding component and never climbs above the root;
    /// - trailing separators are dropped;
    /// - on Windows, `/` is accepted as a separator, the drive letter is upper-cased and
    ///   trailing dots and spaces are trimmed from every component.
    ///
    /// Fails with [`FsError::InvalidPath`] for an empty path or illegal characters.
    pub fn normalize(&self, path: &str, cwd: &PathKey) -> Result<PathKey> {
        if path.is_empty() {
            return Err(FsError::invalid_path(path, "path is empty"));
        }
        if let Some(c) = path.chars().find(|&c| self.style.is_illegal(c)) {
            return Err(FsError::invalid_path(
                path,
                format!("illegal character {c:?}"),
            ));
        }

        let (root, rest, relative) = self.split_root(path, cwd)?;

        let mut parts: Vec<&str> = if relative {
            cwd.components().collect()
        } else {
            Vec::new()
        };
        for part in rest.split(|c| self.style.is_separator(c)) {
            match part {
                "" | "." => continue,
                ".." => {
                    parts.pop();
                    continue;
                }
                _ => {}
            }
            let part = match self.style {
                PathStyle::Windows => part.trim_end_matches(['.', ' ']),
                PathStyle::Unix => part,
            };
            if !part.is_empty() {
                parts.push(part);
            }
        }

        let sep = self.style.separator().to_string();
        let mut canonical = root;
        canonical.push_str(&parts.join(sep.as_str()));
        trace!(raw = path, key = %canonical, "normalized path");

        Ok(PathKey::new(canonical, self.case_sensitive, self.style))
    }

    /// Splits `path` into (root, remainder, is_relative).
    fn split_root<'p>(&self, path: &'p str, cwd: &PathKey) -> Result<(String, &'p str, bool)> {
        match self.style {
            PathStyle::Unix => Ok(("/".to_string(), path, !path.starts_with('/'))),
            PathStyle::Windows => {
                let bytes = path.as_bytes();
                let has_drive =
                    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
                if path
                    .char_indices()
                    .any(|(i, c)| c == ':' && !(has_drive && i == 1))
                {
                    return Err(FsError::invalid_path(
                        path,
                        "':' is only valid after a drive letter",
                    ));
                }
                if has_drive {
                    let root = format!("{}:\\", (bytes[0] as char).to_ascii_uppercase());
                    let rest = &path[2..];
                    // "C:foo" is relative to the current directory of drive C:
                    let relative = !rest.starts_with(['\\', '/']) && root == cwd.root_str();
                    Ok((root, rest, relative))
                } else {
                    let relative = !path.starts_with(['\\', '/']);
                    Ok((cwd.root_str().to_string(), path, relative))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unix() -> (Normalizer, PathKey) {
        let n = Normalizer::new(PathStyle::Unix, true);
        let root = n.root();
        (n, root)
    }

    fn windows() -> (Normalizer, PathKey) {
        let n = Normalizer::new(PathStyle::Windows, false);
        let root = n.root();
        (n, root)
    }

    mod unix_paths {
        use super::*;

        #[test]
        fn test_absolute_path_is_kept() -> Result<()> {
            let (n, root) = unix();
            assert_eq!(n.normalize("/foo/bar", &root)?.as_str(), "/foo/bar");
            Ok(())
        }

        #[test]
        fn test_dots_and_separators_collapse() -> Result<()> {
            let (n, root) = unix();
            assert_eq!(n.normalize("/foo/././bar", &root)?.as_str(), "/foo/bar");
            assert_eq!(n.normalize("/foo/./../bar", &root)?.as_str(), "/bar");
            assert_eq!(n.normalize("//foo///bar//", &root)?.as_str(), "/foo/bar");
            assert_eq!(n.normalize("/../../..", &root)?.as_str(), "/");
            Ok(())
        }

        #[test]
        fn test_relative_path_uses_cwd() -> Result<()> {
            let (n, root) = unix();
            let cwd = n.normalize("/current/working/dir", &root)?;
            assert_eq!(n.normalize("foo", &cwd)?.as_str(), "/current/working/dir/foo");
            assert_eq!(n.normalize("../foo", &cwd)?.as_str(), "/current/working/foo");
            assert_eq!(n.normalize(".", &cwd)?.as_str(), "/current/working/dir");
            assert_eq!(n.normalize("../../../../..", &cwd)?.as_str(), "/");
            Ok(())
        }

        #[test]
        fn test_backslash_is_an_ordinary_character() -> Result<()> {
            let (n, root) = unix();
            assert_eq!(n.normalize(r"/a\b", &root)?.as_str(), r"/a\b");
            Ok(())
        }

        #[test]
        fn test_case_sensitive_keys_differ() -> Result<()> {
            let (n, root) = unix();
            assert_ne!(n.normalize("/Home", &root)?, n.normalize("/home", &root)?);
            Ok(())
        }

        #[test]
        fn test_nul_is_rejected() {
            let (n, root) = unix();
            let err = n.normalize("/a\0b", &root).unwrap_err();
            assert!(matches!(err, FsError::InvalidPath { .. }));
        }
    }

    mod windows_paths {
        use super::*;

        #[test]
        fn test_drive_is_upper_cased_and_separators_unified() -> Result<()> {
            let (n, root) = windows();
            let key = n.normalize("c:/something\\demo.txt", &root)?;
            assert_eq!(key.as_str(), r"C:\something\demo.txt");
            Ok(())
        }

        #[test]
        fn test_case_insensitive_keys_match() -> Result<()> {
            let (n, root) = windows();
            assert_eq!(
                n.normalize(r"C:\Something\DEMO.txt", &root)?,
                n.normalize(r"c:\something\demo.TXT", &root)?
            );
            Ok(())
        }

        #[test]
        fn test_rooted_path_takes_cwd_drive() -> Result<()> {
            let (n, root) = windows();
            let cwd = n.normalize(r"D:\work", &root)?;
            assert_eq!(n.normalize(r"\temp", &cwd)?.as_str(), r"D:\temp");
            assert_eq!(n.normalize("notes.txt", &cwd)?.as_str(), r"D:\work\notes.txt");
            Ok(())
        }

        #[test]
        fn test_trailing_dots_and_spaces_are_trimmed() -> Result<()> {
            let (n, root) = windows();
            assert_eq!(n.normalize(r"C:\dir. \file.txt..", &root)?.as_str(), r"C:\dir\file.txt");
            Ok(())
        }

        #[test]
        fn test_drive_root() -> Result<()> {
            let (n, root) = windows();
            let key = n.normalize("e:", &root)?;
            assert_eq!(key.as_str(), r"E:\");
            assert!(key.is_root());
            Ok(())
        }

        #[test]
        fn test_drive_relative_path_uses_cwd_of_same_drive() -> Result<()> {
            let (n, root) = windows();
            let cwd = n.normalize(r"C:\work", &root)?;
            assert_eq!(n.normalize("C:foo", &cwd)?.as_str(), r"C:\work\foo");
            assert_eq!(n.normalize(r"c:..\bar", &cwd)?.as_str(), r"C:\bar");
            assert_eq!(n.normalize(r"C:\foo", &cwd)?.as_str(), r"C:\foo");
            assert_eq!(n.normalize("D:foo", &cwd)?.as_str(), r"D:\foo");
            Ok(())
        }

        #[test]
        fn test_illegal_characters_are_rejected() {
            let (n, root) = windows();
            for path in [r"C:\a|b", r"C:\a<b", r"C:\what?", "C:\\tab\there", r"C:\a:b"] {
                let err = n.normalize(path, &root).unwrap_err();
                assert!(err.is_argument(), "{path} should be rejected");
            }
        }
    }

    mod key {
        use super::*;

        #[test]
        fn test_parent_chain() -> Result<()> {
            let (n, root) = unix();
            let key = n.normalize("/a/b/c", &root)?;
            let parent = key.parent().unwrap();
            assert_eq!(parent.as_str(), "/a/b");
            assert_eq!(parent.parent().unwrap().as_str(), "/a");
            assert_eq!(parent.parent().unwrap().parent().unwrap().as_str(), "/");
            assert!(root.parent().is_none());
            Ok(())
        }

        #[test]
        fn test_windows_parent_keeps_folding() -> Result<()> {
            let (n, root) = windows();
            let key = n.normalize(r"C:\Dir\File.txt", &root)?;
            let parent = key.parent().unwrap();
            assert_eq!(parent.as_str(), r"C:\Dir");
            assert_eq!(parent, n.normalize(r"c:\dir", &root)?);
            assert_eq!(parent.parent().unwrap().as_str(), r"C:\");
            Ok(())
        }

        #[test]
        fn test_empty_path_is_invalid() {
            let (n, root) = unix();
            assert!(matches!(
                n.normalize("", &root),
                Err(FsError::InvalidPath { .. })
            ));
        }
    }

    mod idempotence {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn unix_normalize_is_idempotent(path in "[a-zA-Z0-9_. /\\\\]{1,32}") {
                let (n, root) = unix();
                let once = n.normalize(&path, &root).unwrap();
                let twice = n.normalize(once.as_str(), &root).unwrap();
                prop_assert_eq!(once.as_str(), twice.as_str());
            }

            #[test]
            fn windows_normalize_is_idempotent(path in "([a-zA-Z]:)?[a-zA-Z0-9_. /\\\\]{1,32}") {
                let (n, root) = windows();
                let once = n.normalize(&path, &root).unwrap();
                let twice = n.normalize(once.as_str(), &root).unwrap();
                prop_assert_eq!(once.as_str(), twice.as_str());
                prop_assert_eq!(once, twice);
            }
        }
    }
}

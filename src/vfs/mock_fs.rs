//! This module provides the mock file system: an in-memory store fronted by the write, read and
//! seeding operations tests use to stand in for the real disk.

use tracing::debug;

use crate::attributes::FileAttributes;
use crate::core::{FsBackend, Result};
use crate::encoding::EncodingSpec;
use crate::error::{AccessDenial, FsError};
use crate::guard::{self, Operation};
use crate::options::FsOptions;
use crate::path::{Normalizer, PathKey};
use crate::vfs::FileData;
use crate::vfs::store::FileStore;

/// An in-memory file system that reproduces the error behavior of a real one.
///
/// ### Internal state
///
/// * `cwd`: current working directory as a normalized key. Relative paths are resolved
///   against it. Defaults to the root of the emulated platform (`/` or `C:\`).
/// * `store`: flat map from normalized key to [`FileData`], plus the set of existing
///   directories. Roots always exist.
///
/// ### Invariants
///
/// 1. **Parent consistency**: every file created through this type has an existing parent
///    directory. Seeding with [`MockFileSystem::add_file`] creates missing parents.
/// 2. **All-or-nothing**: a failing operation leaves the store untouched.
/// 3. **Normalized keys**: two paths that normalize to the same key address the same entry
///    (case-insensitively when the emulated platform is).
///
/// ### Thread Safety
///
/// Meant for one test at a time; there is no internal locking. Wrap it in a `Mutex` if a test
/// really needs to share it.
///
/// ### Example
///
/// ```
/// use mockfs_kit::{FsBackend, FsError, FsOptions, MockFileSystem};
///
/// let mut fs = MockFileSystem::with_options(FsOptions::unix()).unwrap();
///
/// let err = fs.write_all_text("/docs/note.txt", "Hello").unwrap_err();
/// assert!(matches!(err, FsError::DirectoryNotFound { .. }));
///
/// fs.add_directory("/docs").unwrap();
/// fs.write_all_text("/docs/note.txt", "Hello").unwrap();
/// assert_eq!(fs.get_file("/docs/note.txt").unwrap().text_contents(), "Hello");
/// ```
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    options: FsOptions,
    normalizer: Normalizer,
    cwd: PathKey,
    store: FileStore,
}

impl MockFileSystem {
    /// Creates an empty file system that follows the host platform's conventions.
    pub fn new() -> Self {
        let options = FsOptions::default();
        let normalizer = options.normalizer();
        let root = normalizer.root();
        Self {
            options,
            normalizer,
            cwd: root.clone(),
            store: FileStore::new(root),
        }
    }

    /// Creates an empty file system. The configured current directory is created.
    pub fn with_options(options: FsOptions) -> Result<Self> {
        let normalizer = options.normalizer();
        let root = normalizer.root();
        let cwd = normalizer.normalize(options.current_dir(), &root)?;
        let mut store = FileStore::new(root);
        store.add_directory(cwd.clone());
        Ok(Self {
            options,
            normalizer,
            cwd,
            store,
        })
    }

    /// Creates a file system pre-populated with `files`.
    pub fn from_files<'a, I>(options: FsOptions, files: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, FileData)>,
    {
        let mut fs = Self::with_options(options)?;
        for (path, data) in files {
            fs.add_file(path, data)?;
        }
        Ok(fs)
    }

    pub fn options(&self) -> &FsOptions {
        &self.options
    }

    /// Seeds a file, creating its missing parent directories.
    ///
    /// Replaces an existing file under the write rules: hidden or read-only files and
    /// directories are refused.
    pub fn add_file(&mut self, path: &str, data: FileData) -> Result<()> {
        let key = self.to_key(path)?;
        let existing = self.store.get(&key).map(FileData::attributes);
        guard::check(
            existing,
            self.store.directory_exists(&key),
            path,
            Operation::Write,
        )?;
        if let Some(parent) = key.parent() {
            self.ensure_directory(parent, path)?;
        }
        debug!(path = %key, bytes = data.len(), attributes = %data.attributes(), "seeded file");
        self.store.put(key, data);
        Ok(())
    }

    /// Seeds a directory and its missing parents.
    pub fn add_directory(&mut self, path: &str) -> Result<()> {
        self.create_directory(path)
    }

    /// Returns the stored record for `path`, if it is a file.
    pub fn get_file(&self, path: &str) -> Option<&FileData> {
        let key = self.to_key(path).ok()?;
        self.store.get(&key)
    }

    /// Normalized paths of all files, in key order.
    pub fn all_files(&self) -> impl Iterator<Item = &str> {
        self.store.files().map(|(key, _)| key.as_str())
    }

    /// Normalized paths of all directories, roots included, in key order.
    pub fn all_directories(&self) -> impl Iterator<Item = &str> {
        self.store.directories().map(PathKey::as_str)
    }

    /// Rejects blank paths, then normalizes against the current directory.
    fn to_key(&self, path: &str) -> Result<PathKey> {
        if path.trim().is_empty() {
            return Err(FsError::Argument(
                "The path is empty or consists only of white space.".to_string(),
            ));
        }
        self.normalizer.normalize(path, &self.cwd)
    }

    /// Error for a missing file: a missing parent wins over a missing file.
    fn missing(&self, key: &PathKey, path: &str) -> FsError {
        match key.parent() {
            Some(parent) if !self.store.directory_exists(&parent) => {
                FsError::directory_not_found(path)
            }
            _ => FsError::file_not_found(path),
        }
    }

    fn require_parent(&self, key: &PathKey, path: &str) -> Result<()> {
        match key.parent() {
            Some(parent) if !self.store.directory_exists(&parent) => {
                Err(FsError::directory_not_found(path))
            }
            _ => Ok(()),
        }
    }

    /// Validation shared by every write: argument check, guard, parent directory.
    fn prepare_write(&self, path: &str) -> Result<PathKey> {
        let key = self.to_key(path)?;
        let existing = self.store.get(&key).map(FileData::attributes);
        guard::check(
            existing,
            self.store.directory_exists(&key),
            path,
            Operation::Write,
        )?;
        if existing.is_none() {
            self.require_parent(&key, path)?;
        }
        Ok(key)
    }

    /// Replaces the content at `key`, keeping the attributes of an existing file.
    fn commit(&mut self, key: PathKey, contents: Vec<u8>) {
        let bytes = contents.len();
        if let Some(record) = self.store.get_mut(&key) {
            record.set_contents(contents);
        } else {
            self.store.put(key.clone(), FileData::new(contents));
        }
        debug!(path = %key, bytes, "wrote file");
    }

    /// Creates `key` and its ancestors, failing if a file is in the way.
    fn ensure_directory(&mut self, key: PathKey, path: &str) -> Result<()> {
        let mut current = Some(key.clone());
        while let Some(dir) = current {
            if self.store.directory_exists(&dir) {
                break;
            }
            if self.store.contains_file(&dir) {
                return Err(FsError::AlreadyExists {
                    path: path.to_string(),
                });
            }
            current = dir.parent();
        }
        for created in self.store.add_directory(key) {
            debug!(path = %created, "created directory");
        }
        Ok(())
    }

    fn read_record(&self, path: &str) -> Result<&FileData> {
        let key = self.to_key(path)?;
        if self.store.directory_exists(&key) {
            return Err(FsError::denied(path, AccessDenial::IsDirectory));
        }
        self.store
            .get(&key)
            .ok_or_else(|| self.missing(&key, path))
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FsBackend for MockFileSystem {
    fn current_dir(&self) -> &str {
        self.cwd.as_str()
    }

    fn set_current_dir(&mut self, path: &str) -> Result<()> {
        let key = self.to_key(path)?;
        if !self.store.directory_exists(&key) {
            return Err(FsError::directory_not_found(path));
        }
        debug!(path = %key, "changed current directory");
        self.cwd = key;
        Ok(())
    }

    fn default_encoding(&self) -> EncodingSpec {
        self.options.default_encoding()
    }

    fn newline(&self) -> &str {
        self.options.newline()
    }

    fn file_exists(&self, path: &str) -> bool {
        self.to_key(path)
            .is_ok_and(|key| self.store.contains_file(&key))
    }

    fn directory_exists(&self, path: &str) -> bool {
        self.to_key(path)
            .is_ok_and(|key| self.store.directory_exists(&key))
    }

    fn create_directory(&mut self, path: &str) -> Result<()> {
        let key = self.to_key(path)?;
        self.ensure_directory(key, path)
    }

    fn get_attributes(&self, path: &str) -> Result<FileAttributes> {
        let key = self.to_key(path)?;
        if self.store.directory_exists(&key) {
            return Ok(FileAttributes::DIRECTORY);
        }
        self.store
            .get(&key)
            .map(FileData::attributes)
            .ok_or_else(|| self.missing(&key, path))
    }

    fn set_attributes(&mut self, path: &str, attributes: FileAttributes) -> Result<()> {
        let key = self.to_key(path)?;
        if self.store.directory_exists(&key) {
            return Err(FsError::denied(path, AccessDenial::IsDirectory));
        }
        let missing = self.missing(&key, path);
        let record = self.store.get_mut(&key).ok_or(missing)?;
        record.set_attributes(attributes);
        debug!(path = %key, attributes = %record.attributes(), "set attributes");
        Ok(())
    }

    fn delete_file(&mut self, path: &str) -> Result<()> {
        let key = self.to_key(path)?;
        let existing = self.store.get(&key).map(FileData::attributes);
        guard::check(
            existing,
            self.store.directory_exists(&key),
            path,
            Operation::Delete,
        )?;
        if existing.is_none() {
            return self.require_parent(&key, path);
        }
        self.store.remove(&key);
        debug!(path = %key, "deleted file");
        Ok(())
    }

    fn read_all_bytes(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.read_record(path)?.contents().to_vec())
    }

    fn read_all_text(&self, path: &str) -> Result<String> {
        let record = self.read_record(path)?;
        Ok(EncodingSpec::decode_detected(
            record.contents(),
            self.options.default_encoding(),
        ))
    }

    fn read_all_text_encoded(&self, path: &str, encoding: EncodingSpec) -> Result<String> {
        Ok(self.read_record(path)?.text_contents_encoded(encoding))
    }

    fn write_all_bytes(&mut self, path: &str, bytes: &[u8]) -> Result<()> {
        let key = self.prepare_write(path)?;
        self.commit(key, bytes.to_vec());
        Ok(())
    }

    fn write_all_text_encoded<'a>(
        &mut self,
        path: &str,
        contents: impl Into<Option<&'a str>>,
        encoding: EncodingSpec,
    ) -> Result<()> {
        let key = self.prepare_write(path)?;
        // null content is stored as zero bytes, without a preamble
        let bytes = contents
            .into()
            .map(|text| encoding.encode(text))
            .unwrap_or_default();
        self.commit(key, bytes);
        Ok(())
    }

    fn append_all_text_encoded<'a>(
        &mut self,
        path: &str,
        contents: impl Into<Option<&'a str>>,
        encoding: EncodingSpec,
    ) -> Result<()> {
        let key = self.prepare_write(path)?;
        let Some(text) = contents.into() else {
            if !self.store.contains_file(&key) {
                self.commit(key, Vec::new());
            }
            return Ok(());
        };
        let has_content = self.store.get(&key).is_some_and(|record| !record.is_empty());
        if !has_content {
            self.commit(key, encoding.encode(text));
            return Ok(());
        }
        let mut body = Vec::new();
        encoding.encode_body(text, &mut body);
        if let Some(record) = self.store.get_mut(&key) {
            record.append_contents(&body);
        }
        debug!(path = %key, bytes = body.len(), "appended to file");
        Ok(())
    }
}

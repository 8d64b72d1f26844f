//! Flat in-memory storage: normalized key -> file record, plus a set of directory keys.
//!
//! The store performs no validation. Callers (the file system façade) are responsible for
//! parent-directory and attribute checks before calling [`FileStore::put`].

use std::collections::{BTreeMap, BTreeSet};

use crate::path::PathKey;
use crate::vfs::FileData;

#[derive(Debug, Clone)]
pub(crate) struct FileStore {
    files: BTreeMap<PathKey, FileData>,
    directories: BTreeSet<PathKey>,
}

impl FileStore {
    /// Creates a store whose directory index holds `root`.
    pub fn new(root: PathKey) -> Self {
        let mut directories = BTreeSet::new();
        directories.insert(root);
        Self {
            files: BTreeMap::new(),
            directories,
        }
    }

    pub fn get(&self, key: &PathKey) -> Option<&FileData> {
        self.files.get(key)
    }

    pub fn get_mut(&mut self, key: &PathKey) -> Option<&mut FileData> {
        self.files.get_mut(key)
    }

    /// Inserts or replaces the record at `key`.
    pub fn put(&mut self, key: PathKey, record: FileData) {
        self.files.insert(key, record);
    }

    pub fn remove(&mut self, key: &PathKey) -> Option<FileData> {
        self.files.remove(key)
    }

    pub fn contains_file(&self, key: &PathKey) -> bool {
        self.files.contains_key(key)
    }

    /// Roots are always present, even on drives nothing was written to.
    pub fn directory_exists(&self, key: &PathKey) -> bool {
        key.is_root() || self.directories.contains(key)
    }

    /// Adds `key` and every missing ancestor. Returns the keys that were created, outermost first.
    pub fn add_directory(&mut self, key: PathKey) -> Vec<PathKey> {
        let mut missing = Vec::new();
        let mut next = Some(key);
        while let Some(current) = next {
            if self.directories.contains(&current) {
                break;
            }
            next = current.parent();
            missing.push(current);
        }
        missing.reverse();
        for dir in &missing {
            self.directories.insert(dir.clone());
        }
        missing
    }

    pub fn files(&self) -> impl Iterator<Item = (&PathKey, &FileData)> {
        self.files.iter()
    }

    pub fn directories(&self) -> impl Iterator<Item = &PathKey> {
        self.directories.iter()
    }
}

//! Local directory tree backend.
//!
//! Mirrors a hierarchical object store on disk: `stor/scrum/2024/03/01/alice`
//! becomes `<root>/stor/scrum/2024/03/01/alice`.  Directories are never
//! created implicitly, so a write into a missing day fails with
//! [`StorageError::DirectoryNotFound`] exactly like the remote store would.

use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
};

use chrono::{DateTime, Utc};

use super::{DirEntry, EntryKind, Storage, StorageError, StoredObject};
use crate::path::ObjectPath;

pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn local(&self, path: &ObjectPath) -> PathBuf {
        path.as_str()
            .split('/')
            .fold(self.root.clone(), |acc, seg| acc.join(seg))
    }

    /// Map a not-found on `path` to the right variant by checking whether its
    /// parent directory is present.
    fn classify_missing(&self, path: &ObjectPath) -> StorageError {
        let parent_exists = self
            .local(path)
            .parent()
            .is_some_and(|p| p.is_dir());
        if parent_exists {
            StorageError::NotFound(path.clone())
        } else {
            StorageError::DirectoryNotFound(path.clone())
        }
    }

    fn io_error(&self, path: &ObjectPath, source: io::Error) -> StorageError {
        if source.kind() == io::ErrorKind::NotFound {
            self.classify_missing(path)
        } else {
            StorageError::Io {
                path: path.clone(),
                source,
            }
        }
    }
}

impl Storage for FsStorage {
    fn list_directory(&self, path: &ObjectPath) -> Result<Vec<DirEntry>, StorageError> {
        let dir = self.local(path);
        let reader = fs::read_dir(&dir).map_err(|e| self.io_error(path, e))?;

        let mut entries = Vec::new();
        for item in reader {
            let item = item.map_err(|e| self.io_error(path, e))?;
            let file_type = item.file_type().map_err(|e| self.io_error(path, e))?;
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::Object
            };
            entries.push(DirEntry {
                name: item.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn get_object(&self, path: &ObjectPath) -> Result<StoredObject, StorageError> {
        let local = self.local(path);
        if local.is_dir() {
            return Err(StorageError::Backend(format!("{path} is a directory")));
        }
        let file = fs::File::open(&local).map_err(|e| self.io_error(path, e))?;
        let modified = file
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|e| self.io_error(path, e))?;

        Ok(StoredObject {
            reader: Box::new(file),
            last_modified: DateTime::<Utc>::from(modified),
        })
    }

    fn put_object(&self, path: &ObjectPath, body: &mut dyn Read) -> Result<(), StorageError> {
        let mut file = fs::File::create(self.local(path)).map_err(|e| self.io_error(path, e))?;
        io::copy(body, &mut file).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(())
    }

    fn put_directory(&self, path: &ObjectPath) -> Result<(), StorageError> {
        let local = self.local(path);
        match fs::create_dir(&local) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && local.is_dir() => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::DirectoryNotFound(path.clone()))
            },
            Err(source) => Err(StorageError::Io {
                path: path.clone(),
                source,
            }),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

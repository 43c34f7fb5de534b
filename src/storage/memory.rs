//! In-memory backend for flow tests.
//!
//! Same directory rules as [`super::fs::FsStorage`], plus the ability to make
//! individual paths fail so error propagation can be exercised.

use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, HashSet},
    io::{Cursor, Read},
};

use chrono::{DateTime, TimeZone, Utc};

use super::{DirEntry, EntryKind, Storage, StorageError, StoredObject};
use crate::path::ObjectPath;

#[derive(Default)]
pub struct MemoryStorage {
    dirs: RefCell<BTreeSet<String>>,
    objects: RefCell<BTreeMap<String, (Vec<u8>, DateTime<Utc>)>>,
    failing: RefCell<HashSet<String>>,
    /// Every `put_directory` call, in order.
    pub dir_calls: RefCell<Vec<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `body` at `path`, creating every ancestor directory.
    pub fn seed(&self, path: &ObjectPath, body: &str) {
        for dir in path.ancestors() {
            self.dirs.borrow_mut().insert(dir.to_string());
        }
        let mtime = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        self.objects
            .borrow_mut()
            .insert(path.to_string(), (body.as_bytes().to_vec(), mtime));
    }

    /// Make every operation on `path` fail with a backend error.
    pub fn fail_on(&self, path: &ObjectPath) {
        self.failing.borrow_mut().insert(path.to_string());
    }

    pub fn body(&self, path: &ObjectPath) -> Option<String> {
        self.objects
            .borrow()
            .get(path.as_str())
            .map(|(b, _)| String::from_utf8_lossy(b).into_owned())
    }

    pub fn object_count(&self) -> usize {
        self.objects.borrow().len()
    }

    fn check_failing(&self, path: &ObjectPath) -> Result<(), StorageError> {
        if self.failing.borrow().contains(path.as_str()) {
            Err(StorageError::Backend(format!("injected failure on {path}")))
        } else {
            Ok(())
        }
    }

    fn parent_exists(&self, path: &ObjectPath) -> bool {
        match path.ancestors().last() {
            Some(parent) => self.dirs.borrow().contains(parent.as_str()),
            None => true,
        }
    }
}

impl Storage for MemoryStorage {
    fn list_directory(&self, path: &ObjectPath) -> Result<Vec<DirEntry>, StorageError> {
        self.check_failing(path)?;
        if !self.dirs.borrow().contains(path.as_str()) {
            return Err(if self.parent_exists(path) {
                StorageError::NotFound(path.clone())
            } else {
                StorageError::DirectoryNotFound(path.clone())
            });
        }

        let prefix = format!("{path}/");
        let direct = |key: &String| {
            key.strip_prefix(&prefix)
                .filter(|rest| !rest.contains('/'))
                .map(str::to_string)
        };

        let mut entries: Vec<DirEntry> = self
            .dirs
            .borrow()
            .iter()
            .filter_map(direct)
            .map(|name| DirEntry {
                name,
                kind: EntryKind::Directory,
            })
            .collect();
        entries.extend(self.objects.borrow().keys().filter_map(direct).map(|name| {
            DirEntry {
                name,
                kind: EntryKind::Object,
            }
        }));
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn get_object(&self, path: &ObjectPath) -> Result<StoredObject, StorageError> {
        self.check_failing(path)?;
        match self.objects.borrow().get(path.as_str()) {
            Some((body, mtime)) => Ok(StoredObject {
                reader: Box::new(Cursor::new(body.clone())),
                last_modified: *mtime,
            }),
            None if self.parent_exists(path) => Err(StorageError::NotFound(path.clone())),
            None => Err(StorageError::DirectoryNotFound(path.clone())),
        }
    }

    fn put_object(&self, path: &ObjectPath, body: &mut dyn Read) -> Result<(), StorageError> {
        self.check_failing(path)?;
        if !self.parent_exists(path) {
            return Err(StorageError::DirectoryNotFound(path.clone()));
        }
        let mut buf = Vec::new();
        body.read_to_end(&mut buf)
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
        let mtime = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        self.objects
            .borrow_mut()
            .insert(path.to_string(), (buf, mtime));
        Ok(())
    }

    fn put_directory(&self, path: &ObjectPath) -> Result<(), StorageError> {
        self.check_failing(path)?;
        self.dir_calls.borrow_mut().push(path.to_string());
        if !self.parent_exists(path) {
            return Err(StorageError::DirectoryNotFound(path.clone()));
        }
        self.dirs.borrow_mut().insert(path.to_string());
        Ok(())
    }
}

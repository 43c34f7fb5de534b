//! Object storage seam.
//!
//! The flows in [`crate::commands`] only ever talk to a [`Storage`]; which
//! backend sits behind it is decided once from `[storage]` in the config.
//!
//! | Backend          | Namespace     | Notes                                      |
//! |------------------|---------------|--------------------------------------------|
//! | [`fs::FsStorage`] | hierarchical | directories must exist before objects      |
//! | [`s3::S3Storage`] | flat         | `put_directory` is a no-op                 |

pub mod fs;
#[cfg(test)]
pub mod memory;
pub mod s3;

use std::io::Read;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    config::{Backend, StorageConfig},
    path::ObjectPath,
};

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StorageError {
    /// A directory somewhere above the requested path does not exist.
    #[error("directory does not exist: {0}")]
    DirectoryNotFound(ObjectPath),

    /// The parent directory exists but the object itself does not.
    #[error("resource not found: {0}")]
    NotFound(ObjectPath),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: ObjectPath,
        #[source]
        source: std::io::Error,
    },

    #[error("storage backend error: {0}")]
    Backend(String),
}

// ─── Data ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Object,
    Directory,
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// A fetched object: its body and when it was last written.
pub struct StoredObject {
    pub reader: Box<dyn Read>,
    pub last_modified: DateTime<Utc>,
}

// ─── Trait ────────────────────────────────────────────────────────────────────

/// Blocking storage operations consumed by the `get` and `set` flows.
pub trait Storage {
    /// Entries directly under `path`, in the backend's listing order.
    fn list_directory(&self, path: &ObjectPath) -> Result<Vec<DirEntry>, StorageError>;

    fn get_object(&self, path: &ObjectPath) -> Result<StoredObject, StorageError>;

    /// Replace the object at `path` with everything `body` yields.
    fn put_object(&self, path: &ObjectPath, body: &mut dyn Read) -> Result<(), StorageError>;

    /// Create `path` as a directory.  Creating one that already exists is not
    /// an error.
    fn put_directory(&self, path: &ObjectPath) -> Result<(), StorageError>;
}

// ─── Probing ──────────────────────────────────────────────────────────────────

/// What a fetch attempt revealed about `path`.
#[derive(Debug)]
pub enum Probe {
    Exists,
    DirMissing,
    NotFound,
    Failed(StorageError),
}

/// Try to fetch `path` and classify the result.
pub fn probe(storage: &dyn Storage, path: &ObjectPath) -> Probe {
    match storage.get_object(path) {
        Ok(_) => Probe::Exists,
        Err(StorageError::DirectoryNotFound(_)) => Probe::DirMissing,
        Err(StorageError::NotFound(_)) => Probe::NotFound,
        Err(e) => Probe::Failed(e),
    }
}

// ─── Construction ─────────────────────────────────────────────────────────────

/// Build the backend selected in `[storage]`.
pub fn open(cfg: &StorageConfig) -> Result<Box<dyn Storage>> {
    match cfg.backend {
        Backend::Fs => Ok(Box::new(fs::FsStorage::new(cfg.root.clone()))),
        Backend::S3 => {
            let store = s3::S3Storage::from_config(cfg).context("unable to create S3 client")?;
            Ok(Box::new(store))
        },
    }
}

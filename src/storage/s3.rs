//! S3-compatible backend built on `object_store`.
//!
//! Credentials, region and endpoint are picked up from the usual `AWS_*`
//! environment variables; `[storage]` values override them.  The store is
//! async, so each call is driven to completion on a private current-thread
//! runtime and the rest of the program stays synchronous.
//!
//! S3 has no real directories.  `put_directory` succeeds without doing
//! anything and a missing key is always [`StorageError::NotFound`].

use std::{io::Read, sync::Arc};

use object_store::{ObjectStore, PutPayload, aws::AmazonS3Builder, path::Path};
use tokio::runtime::Runtime;

use super::{DirEntry, EntryKind, Storage, StorageError, StoredObject};
use crate::{config::StorageConfig, path::ObjectPath};

pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    runtime: Runtime,
}

impl S3Storage {
    pub fn from_config(cfg: &StorageConfig) -> anyhow::Result<Self> {
        let mut builder = AmazonS3Builder::from_env();
        if let Some(bucket) = &cfg.bucket {
            builder = builder.with_bucket_name(bucket);
        }
        if let Some(endpoint) = &cfg.endpoint {
            builder = builder.with_endpoint(endpoint);
        }
        if let Some(region) = &cfg.region {
            builder = builder.with_region(region);
        }
        if cfg.allow_http {
            builder = builder.with_allow_http(true);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            store: Arc::new(builder.build()?),
            runtime,
        })
    }

    fn key(path: &ObjectPath) -> Path {
        Path::from(path.as_str())
    }
}

fn map_err(path: &ObjectPath, err: object_store::Error) -> StorageError {
    match err {
        object_store::Error::NotFound { .. } => StorageError::NotFound(path.clone()),
        other => StorageError::Backend(other.to_string()),
    }
}

impl Storage for S3Storage {
    fn list_directory(&self, path: &ObjectPath) -> Result<Vec<DirEntry>, StorageError> {
        let prefix = Self::key(path);
        let listing = self
            .runtime
            .block_on(self.store.list_with_delimiter(Some(&prefix)))
            .map_err(|e| map_err(path, e))?;

        let dirs = listing.common_prefixes.iter().filter_map(|p| {
            p.filename().map(|name| DirEntry {
                name: name.to_string(),
                kind: EntryKind::Directory,
            })
        });
        let objects = listing.objects.iter().filter_map(|meta| {
            meta.location.filename().map(|name| DirEntry {
                name: name.to_string(),
                kind: EntryKind::Object,
            })
        });

        let mut entries: Vec<DirEntry> = dirs.chain(objects).collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn get_object(&self, path: &ObjectPath) -> Result<StoredObject, StorageError> {
        let key = Self::key(path);
        let (bytes, last_modified) = self
            .runtime
            .block_on(async {
                let result = self.store.get(&key).await?;
                let last_modified = result.meta.last_modified;
                Ok::<_, object_store::Error>((result.bytes().await?, last_modified))
            })
            .map_err(|e| map_err(path, e))?;

        Ok(StoredObject {
            reader: Box::new(std::io::Cursor::new(bytes)),
            last_modified,
        })
    }

    fn put_object(&self, path: &ObjectPath, body: &mut dyn Read) -> Result<(), StorageError> {
        let mut buf = Vec::new();
        body.read_to_end(&mut buf)
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;

        self.runtime
            .block_on(self.store.put(&Self::key(path), PutPayload::from(buf)))
            .map_err(|e| map_err(path, e))?;
        Ok(())
    }

    fn put_directory(&self, _path: &ObjectPath) -> Result<(), StorageError> {
        Ok(())
    }
}

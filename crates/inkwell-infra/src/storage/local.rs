use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use inkwell_core::ports::{ObjectStore, ObjectStoreError};

use super::{StorageConfig, key_from_public_url, public_url};

/// Object store backed by a directory tree: `{root}/{bucket}/{key}`.
///
/// Files are expected to be served by a static file server under
/// `public_base`.
pub struct LocalObjectStore {
    root: PathBuf,
    bucket: String,
    public_base: String,
}

impl LocalObjectStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            root: config.root,
            bucket: config.bucket,
            public_base: config.public_base,
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(ObjectStoreError::Rejected(format!("invalid key: {key}")));
        }
        Ok(self.root.join(&self.bucket).join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ObjectStoreError::Unavailable(e.to_string()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ObjectStoreError::Unavailable(e.to_string()))?;

        tracing::debug!(key = %key, content_type = %content_type, "Object stored");
        Ok(public_url(&self.public_base, &self.bucket, key))
    }

    async fn delete_keys(&self, keys: &[String]) -> Result<usize, ObjectStoreError> {
        let mut removed = 0;
        for key in keys {
            let path = self.path_for(key)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(ObjectStoreError::Unavailable(e.to_string())),
            }
        }
        Ok(removed)
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        key_from_public_url(&self.public_base, &self.bucket, url)
    }
}

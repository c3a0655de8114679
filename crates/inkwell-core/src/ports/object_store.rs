//! Object storage port for post images and avatars.

use async_trait::async_trait;

/// A bucket-scoped object store handing out public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the object's public URL.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ObjectStoreError>;

    /// Delete a batch of keys; returns how many objects were removed.
    async fn delete_keys(&self, keys: &[String]) -> Result<usize, ObjectStoreError>;

    /// Recover the key from a public URL issued by this store.
    fn key_from_url(&self, url: &str) -> Option<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    #[error("Object store unavailable: {0}")]
    Unavailable(String),

    #[error("Object rejected: {0}")]
    Rejected(String),
}

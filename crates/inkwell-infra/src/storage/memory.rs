use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use inkwell_core::ports::{ObjectStore, ObjectStoreError};

use super::{key_from_public_url, public_url};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// Object store kept in process memory.
///
/// Can be switched offline to exercise cleanup failure paths.
pub struct InMemoryObjectStore {
    public_base: String,
    bucket: String,
    objects: RwLock<HashMap<String, StoredObject>>,
    available: AtomicBool,
}

impl InMemoryObjectStore {
    pub fn new(public_base: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into(),
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }

    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|o| o.content_type.clone())
    }

    pub async fn size(&self, key: &str) -> Option<usize> {
        self.objects.read().await.get(key).map(|o| o.bytes.len())
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    fn ensure_available(&self) -> Result<(), ObjectStoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ObjectStoreError::Unavailable("store offline".into()))
        }
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new("http://localhost:9000", "uploads")
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ObjectStoreError> {
        self.ensure_available()?;
        self.objects.write().await.insert(
            key.to_owned(),
            StoredObject {
                bytes,
                content_type: content_type.to_owned(),
            },
        );
        Ok(public_url(&self.public_base, &self.bucket, key))
    }

    async fn delete_keys(&self, keys: &[String]) -> Result<usize, ObjectStoreError> {
        self.ensure_available()?;
        let mut objects = self.objects.write().await;
        Ok(keys.iter().filter(|k| objects.remove(*k).is_some()).count())
    }

    fn key_from_url(&self, url: &str) -> Option<String> {
        key_from_public_url(&self.public_base, &self.bucket, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_delete() {
        let store = InMemoryObjectStore::default();
        let url = store.put("a/b.png", vec![1, 2, 3], "image/png").await.unwrap();

        let key = store.key_from_url(&url).unwrap();
        assert_eq!(key, "a/b.png");
        assert_eq!(store.content_type(&key).await.as_deref(), Some("image/png"));
        assert_eq!(store.size(&key).await, Some(3));

        let removed = store
            .delete_keys(&[key.clone(), "missing".into()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(!store.contains(&key).await);
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let store = InMemoryObjectStore::default();
        store.set_available(false);

        assert!(matches!(
            store.put("k", vec![1], "image/png").await,
            Err(ObjectStoreError::Unavailable(_))
        ));
        assert!(store.delete_keys(&["k".into()]).await.is_err());
    }
}

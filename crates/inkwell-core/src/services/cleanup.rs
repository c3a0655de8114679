//! Best-effort object store cleanup that never blocks the primary mutation.

use serde::Serialize;

use crate::ports::ObjectStore;

/// Outcome of deleting stored objects after the authoritative write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Cleanup {
    /// Nothing stored belonged to the entity.
    NotNeeded,
    Completed { deleted: usize },
    /// The store failed; the failure is logged and otherwise ignored.
    Failed { reason: String },
}

impl Cleanup {
    pub fn is_failed(&self) -> bool {
        matches!(self, Cleanup::Failed { .. })
    }
}

/// Delete the objects behind `urls`. URLs the store did not issue are skipped.
pub(crate) async fn purge(store: &dyn ObjectStore, urls: &[String], context: &str) -> Cleanup {
    let mut keys: Vec<String> = Vec::new();
    for key in urls.iter().filter_map(|url| store.key_from_url(url)) {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    if keys.is_empty() {
        return Cleanup::NotNeeded;
    }

    match store.delete_keys(&keys).await {
        Ok(deleted) => {
            tracing::debug!(context, deleted, "Stored objects removed");
            Cleanup::Completed { deleted }
        }
        Err(e) => {
            tracing::warn!(context, keys = keys.len(), error = %e, "Object store cleanup failed");
            Cleanup::Failed {
                reason: e.to_string(),
            }
        }
    }
}

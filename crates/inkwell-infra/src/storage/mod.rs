//! Object storage adapters.
//!
//! Objects are addressed by `{public_base}/{bucket}/{key}`; the key is
//! recovered from a URL by stripping that prefix.

mod local;
mod memory;

pub use local::LocalObjectStore;
pub use memory::InMemoryObjectStore;

/// Where objects live and how they are addressed publicly.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: std::path::PathBuf,
    pub bucket: String,
    pub public_base: String,
}

fn public_url(public_base: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", public_base.trim_end_matches('/'), bucket, key)
}

fn key_from_public_url(public_base: &str, bucket: &str, url: &str) -> Option<String> {
    let prefix = format!("{}/{}/", public_base.trim_end_matches('/'), bucket);
    url.strip_prefix(&prefix)
        .filter(|key| !key.is_empty())
        .map(str::to_owned)
}

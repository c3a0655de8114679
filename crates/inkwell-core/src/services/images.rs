//! Image upload validation and object key layout.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// An uploaded image body.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Only non-empty `image/*` bodies up to 5 MiB are accepted.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.content_type.trim().to_ascii_lowercase().starts_with("image/") {
            return Err(DomainError::invalid("file", "Only image files are allowed"));
        }
        if self.bytes.is_empty() {
            return Err(DomainError::invalid("file", "No file uploaded"));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(DomainError::invalid("file", "Image must be at most 5 MB"));
        }
        Ok(())
    }

    /// `<prefix><millis>-<6 random chars><.ext>`
    pub fn object_key(&self, prefix: &str, now: DateTime<Utc>) -> String {
        let random = Uuid::new_v4().simple().to_string();
        let extension = self.extension().map(|e| format!(".{e}")).unwrap_or_default();
        format!(
            "{prefix}{}-{}{extension}",
            now.timestamp_millis(),
            &random[..6]
        )
    }

    fn extension(&self) -> Option<&str> {
        let (_, ext) = self.filename.as_deref()?.rsplit_once('.')?;
        (!ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())).then_some(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: Option<&str>, content_type: &str, size: usize) -> ImageUpload {
        ImageUpload {
            filename: filename.map(String::from),
            content_type: content_type.into(),
            bytes: vec![0u8; size],
        }
    }

    #[test]
    fn test_validate() {
        assert!(upload(None, "image/png", 10).validate().is_ok());
        assert!(upload(None, "text/plain", 10).validate().is_err());
        assert!(upload(None, "image/png", 0).validate().is_err());
        assert!(upload(None, "image/png", MAX_IMAGE_BYTES + 1).validate().is_err());
    }

    #[test]
    fn test_object_key_layout() {
        let now = Utc::now();
        let key = upload(Some("cat.photo.JPG"), "image/jpeg", 1).object_key("u/p/", now);
        assert!(key.starts_with(&format!("u/p/{}-", now.timestamp_millis())));
        assert!(key.ends_with(".JPG"));

        let bare = upload(Some("weird.na me"), "image/jpeg", 1).object_key("", now);
        assert!(!bare.contains('.'));
    }
}

//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Session details returned alongside the `token` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse<U> {
    pub user: U,
    pub expires_in: u64,
}

/// Profile fields a user can edit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub about: Option<String>,
}

/// Replacement set of preferred category ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    #[serde(default)]
    pub category_ids: Vec<String>,
}

/// Current preferred category ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesResponse {
    pub category_ids: Vec<String>,
}

/// Create or partially update a post. Absent fields are left untouched on update.
///
/// `tags` accepts a single string or an array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub details: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Value>,
}

/// Create a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

/// `GET /categories` query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryListQuery {
    pub search: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

/// Create or edit a comment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub content: String,
}

/// Image URLs to detach from a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteImagesRequest {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Optional original file name for a raw image upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

/// `{ "items": [...] }` wrapper for unpaged collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

/// Image URLs of a post after an upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUrlsResponse {
    pub image_urls: Vec<String>,
}

/// Plain acknowledgement message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::tags::{normalize_tag_value, validate_tags};
use crate::error::{DomainError, Violations};

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(DomainError::invalid(
                "status",
                format!("`{other}` is not one of draft, published, archived"),
            )),
        }
    }
}

/// Post entity - a blog article owned by the user who created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub summary: String,
    pub details: String,
    pub author: String,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub categories: Vec<Uuid>,
    pub tags: Vec<String>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a post from validated fields, stamping `published_at` if needed.
    pub fn new(user_id: Uuid, fields: PostFields, now: DateTime<Utc>) -> Self {
        let mut post = Self {
            id: Uuid::new_v4(),
            user_id,
            title: fields.title,
            summary: fields.summary,
            details: fields.details,
            author: fields.author,
            status: fields.status,
            published_at: None,
            categories: fields.categories,
            tags: fields.tags,
            image_urls: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        post.reconcile_publish_fields(now);
        post
    }

    /// Keep `published_at` non-null iff the post is published.
    ///
    /// An already stamped publication date survives re-publishing edits.
    pub fn reconcile_publish_fields(&mut self, now: DateTime<Utc>) {
        if self.status == PostStatus::Published {
            if self.published_at.is_none() {
                self.published_at = Some(now);
            }
        } else {
            self.published_at = None;
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Apply a validated partial update. Only supplied fields change.
    pub fn apply(&mut self, changes: PostChanges, now: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(summary) = changes.summary {
            self.summary = summary;
        }
        if let Some(details) = changes.details {
            self.details = details;
        }
        if let Some(author) = changes.author {
            self.author = author;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(categories) = changes.categories {
            self.categories = categories;
        }
        if let Some(tags) = changes.tags {
            self.tags = tags;
        }
        self.reconcile_publish_fields(now);
        self.updated_at = now;
    }
}

/// Raw post payload as received from a client.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub details: Option<String>,
    pub author: Option<String>,
    pub status: Option<String>,
    pub categories: Option<Vec<String>>,
    pub tags: Option<Value>,
}

/// Validated fields of a new post. Category ids are not yet resolved.
#[derive(Debug, Clone)]
pub struct PostFields {
    pub title: String,
    pub summary: String,
    pub details: String,
    pub author: String,
    pub status: PostStatus,
    pub categories: Vec<Uuid>,
    pub tags: Vec<String>,
}

/// Validated partial update.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub details: Option<String>,
    pub author: Option<String>,
    pub status: Option<PostStatus>,
    pub categories: Option<Vec<Uuid>>,
    pub tags: Option<Vec<String>>,
}

impl PostInput {
    /// Validate a create payload; title, details and tags are required.
    pub fn into_fields(self) -> Result<PostFields, DomainError> {
        let mut violations = Violations::new();

        let title = match self.title {
            Some(title) => check_title(title, &mut violations),
            None => {
                violations.push("title", "Title is required");
                String::new()
            }
        };
        let details = match self.details {
            Some(details) => check_details(details, &mut violations),
            None => {
                violations.push("details", "Details are required");
                String::new()
            }
        };
        let summary = self
            .summary
            .map(|s| check_summary(s, &mut violations))
            .unwrap_or_default();
        let author = self.author.map(|a| a.trim().to_string()).unwrap_or_default();
        let status = self
            .status
            .map(|s| check_status(&s, &mut violations))
            .unwrap_or_default();
        let categories = self
            .categories
            .map(|ids| check_category_ids(&ids, &mut violations))
            .unwrap_or_default();
        let tags = match self.tags {
            Some(raw) => check_tags(&raw, &mut violations),
            None => {
                violations.push("tags", "At least one tag is required");
                Vec::new()
            }
        };

        violations.finish(PostFields {
            title,
            summary,
            details,
            author,
            status,
            categories,
            tags,
        })
    }

    /// Validate an update payload; absent fields stay untouched.
    pub fn into_changes(self) -> Result<PostChanges, DomainError> {
        let mut violations = Violations::new();

        let changes = PostChanges {
            title: self.title.map(|t| check_title(t, &mut violations)),
            summary: self.summary.map(|s| check_summary(s, &mut violations)),
            details: self.details.map(|d| check_details(d, &mut violations)),
            author: self.author.map(|a| a.trim().to_string()),
            status: self.status.map(|s| check_status(&s, &mut violations)),
            categories: self
                .categories
                .map(|ids| check_category_ids(&ids, &mut violations)),
            tags: self.tags.map(|raw| check_tags(&raw, &mut violations)),
        };

        violations.finish(changes)
    }
}

fn check_title(title: String, violations: &mut Violations) -> String {
    let title = title.trim().to_string();
    let len = title.chars().count();
    if len < 3 {
        violations.push("title", "Title must be at least 3 characters");
    } else if len > 200 {
        violations.push("title", "Title must be at most 200 characters");
    }
    title
}

fn check_summary(summary: String, violations: &mut Violations) -> String {
    let summary = summary.trim().to_string();
    if summary.chars().count() > 500 {
        violations.push("summary", "Summary must be at most 500 characters");
    }
    summary
}

fn check_details(details: String, violations: &mut Violations) -> String {
    if details.chars().count() < 10 {
        violations.push("details", "Details must be at least 10 characters");
    }
    details
}

fn check_status(raw: &str, violations: &mut Violations) -> PostStatus {
    match raw.parse::<PostStatus>() {
        Ok(status) => status,
        Err(_) => {
            violations.push("status", "Status must be one of draft, published, archived");
            PostStatus::default()
        }
    }
}

fn check_category_ids(raw: &[String], violations: &mut Violations) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(raw.len());
    for value in raw {
        match Uuid::parse_str(value.trim()) {
            Ok(id) if !ids.contains(&id) => ids.push(id),
            Ok(_) => {}
            Err(_) => {
                violations.push("categories", "categories must be an array of valid ids");
                break;
            }
        }
    }
    ids
}

fn check_tags(raw: &Value, violations: &mut Violations) -> Vec<String> {
    match normalize_tag_value(raw) {
        Ok(tags) => {
            validate_tags(&tags, violations);
            tags
        }
        Err(errors) => {
            for e in errors.into_errors() {
                violations.push(e.field, e.message);
            }
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn input(status: &str) -> PostInput {
        PostInput {
            title: Some("  Hello world  ".into()),
            summary: None,
            details: Some("A long enough body".into()),
            author: Some(" Ann ".into()),
            status: Some(status.into()),
            categories: None,
            tags: Some(json!(["Go", " go ", "GO-lang"])),
        }
    }

    #[test]
    fn test_create_normalizes_tags_and_trims() {
        let fields = input("draft").into_fields().unwrap();
        assert_eq!(fields.title, "Hello world");
        assert_eq!(fields.author, "Ann");
        assert_eq!(fields.tags, vec!["go", "go-lang"]);
    }

    #[test]
    fn test_published_at_tracks_status() {
        let now = Utc::now();
        let draft = Post::new(Uuid::new_v4(), input("draft").into_fields().unwrap(), now);
        assert_eq!(draft.published_at, None);

        let published = Post::new(Uuid::new_v4(), input("published").into_fields().unwrap(), now);
        assert_eq!(published.published_at, Some(now));
    }

    #[test]
    fn test_publish_then_revert() {
        let created = Utc::now() - Duration::hours(2);
        let mut post = Post::new(Uuid::new_v4(), input("draft").into_fields().unwrap(), created);

        let publish_time = Utc::now();
        let publish = PostInput {
            status: Some("published".into()),
            ..Default::default()
        };
        post.apply(publish.into_changes().unwrap(), publish_time);
        assert_eq!(post.published_at, Some(publish_time));
        assert!(post.published_at.unwrap() <= Utc::now());

        // Editing a published post keeps the original publication date.
        let retitle = PostInput {
            title: Some("New title".into()),
            ..Default::default()
        };
        post.apply(retitle.into_changes().unwrap(), publish_time + Duration::minutes(5));
        assert_eq!(post.published_at, Some(publish_time));

        let revert = PostInput {
            status: Some("draft".into()),
            ..Default::default()
        };
        post.apply(revert.into_changes().unwrap(), Utc::now());
        assert_eq!(post.published_at, None);
        assert_eq!(post.status, PostStatus::Draft);
    }

    #[test]
    fn test_missing_required_fields_are_reported_together() {
        let err = PostInput::default().into_fields().unwrap_err();
        let DomainError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = violations.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["title", "details", "tags"]);
    }

    #[test]
    fn test_invalid_status_and_category() {
        let mut raw = input("secret");
        raw.categories = Some(vec!["not-a-uuid".into()]);
        let DomainError::Validation(violations) = raw.into_fields().unwrap_err() else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = violations.errors().iter().map(|e| e.field).collect();
        assert!(fields.contains(&"status"));
        assert!(fields.contains(&"categories"));
    }

    #[test]
    fn test_update_leaves_absent_fields() {
        let changes = PostInput {
            summary: Some(" short ".into()),
            ..Default::default()
        }
        .into_changes()
        .unwrap();
        assert_eq!(changes.summary.as_deref(), Some("short"));
        assert!(changes.title.is_none());
        assert!(changes.tags.is_none());
    }
}

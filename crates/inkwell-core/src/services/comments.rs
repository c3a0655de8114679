use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Comment, CommentView, Post, validate_comment_content};
use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository, UserRepository};

const UNKNOWN_AUTHOR: &str = "Unknown";

/// Comment use cases. Comments are only readable and writable while the
/// parent post is published, and only their author may change them.
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
        }
    }

    pub async fn list(&self, post_id: Uuid) -> Result<Vec<CommentView>, DomainError> {
        self.published_post(post_id).await?;
        let comments = self.comments.list_for_post(post_id).await?;
        self.with_authors(comments).await
    }

    pub async fn create(
        &self,
        caller: Uuid,
        post_id: Uuid,
        content: &str,
    ) -> Result<CommentView, DomainError> {
        self.published_post(post_id).await?;
        let content = validate_comment_content(content)?;

        let comment = Comment::new(post_id, caller, content, Utc::now());
        let saved = self.comments.save(comment).await?;
        tracing::info!(comment_id = %saved.id, post_id = %post_id, "Comment created");

        self.single_view(saved).await
    }

    pub async fn update(
        &self,
        caller: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
        content: &str,
    ) -> Result<CommentView, DomainError> {
        self.published_post(post_id).await?;
        let content = validate_comment_content(content)?;

        let mut comment = self.own_comment(caller, post_id, comment_id).await?;
        comment.content = content;
        comment.updated_at = Utc::now();
        let saved = self.comments.save(comment).await?;

        self.single_view(saved).await
    }

    pub async fn delete(
        &self,
        caller: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), DomainError> {
        self.published_post(post_id).await?;
        let comment = self.own_comment(caller, post_id, comment_id).await?;
        self.comments.delete(comment.id).await?;
        tracing::info!(comment_id = %comment_id, post_id = %post_id, "Comment deleted");
        Ok(())
    }

    async fn published_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", post_id))?;
        if !post.is_published() {
            return Err(DomainError::Forbidden("Post is not public".into()));
        }
        Ok(post)
    }

    /// Someone else's comment is reported as missing.
    async fn own_comment(
        &self,
        caller: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Comment, DomainError> {
        self.comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post_id && c.user_id == caller)
            .ok_or_else(|| DomainError::not_found("Comment", comment_id))
    }

    async fn single_view(&self, comment: Comment) -> Result<CommentView, DomainError> {
        let mut views = self.with_authors(vec![comment]).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::Internal("comment view missing".into()))
    }

    async fn with_authors(&self, comments: Vec<Comment>) -> Result<Vec<CommentView>, DomainError> {
        let mut ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let logins: HashMap<Uuid, String> = self
            .users
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.login))
            .collect();

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = logins
                    .get(&comment.user_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
                CommentView { comment, author }
            })
            .collect())
    }
}

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::cleanup::{Cleanup, purge};
use super::images::ImageUpload;
use crate::domain::{Post, PostInput};
use crate::error::DomainError;
use crate::ports::{CategoryRepository, ObjectStore, PostRepository};
use crate::query::{ListPostsParams, PostQuery};

/// One page of a post listing.
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub items: Vec<Post>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
}

/// Result of deleting a post: the record is gone, image cleanup reported apart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deletion {
    pub post_id: Uuid,
    pub cleanup: Cleanup,
}

/// A post's image URLs after an image mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSet {
    pub image_urls: Vec<String>,
    pub cleanup: Cleanup,
}

/// Post use cases: listing, ownership-checked writes, image management.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    store: Arc<dyn ObjectStore>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            posts,
            categories,
            store,
        }
    }

    /// List posts visible to `caller`. Page and count run concurrently and
    /// are not read atomically.
    pub async fn list(
        &self,
        caller: Option<Uuid>,
        params: &ListPostsParams,
    ) -> Result<PostPage, DomainError> {
        let query = PostQuery::compose(caller, params)?;
        tracing::debug!(?query, "Listing posts");

        let (items, total) = futures::try_join!(
            self.posts.find_page(&query),
            self.posts.count(&query.predicate)
        )?;

        Ok(PostPage {
            items,
            page: query.paging.page,
            limit: query.paging.limit,
            total,
        })
    }

    /// Published posts are public; anything else only to its owner.
    pub async fn get(&self, caller: Option<Uuid>, id: Uuid) -> Result<Post, DomainError> {
        let post = self.find(id).await?;
        if !post.is_published() && caller.is_none_or(|c| !post.is_owned_by(c)) {
            return Err(DomainError::Forbidden("Post is not public".into()));
        }
        Ok(post)
    }

    pub async fn create(&self, caller: Uuid, input: PostInput) -> Result<Post, DomainError> {
        let mut fields = input.into_fields()?;
        fields.categories = self.resolve_categories(fields.categories).await?;

        let post = Post::new(caller, fields, Utc::now());
        let saved = self.posts.save(post).await?;

        tracing::info!(post_id = %saved.id, user_id = %caller, status = %saved.status, "Post created");
        Ok(saved)
    }

    pub async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        let mut post = self.owned(caller, id).await?;
        let mut changes = input.into_changes()?;
        if let Some(ids) = changes.categories.take() {
            changes.categories = Some(self.resolve_categories(ids).await?);
        }

        post.apply(changes, Utc::now());
        let saved = self.posts.save(post).await?;

        tracing::info!(post_id = %saved.id, status = %saved.status, "Post updated");
        Ok(saved)
    }

    /// Delete the record, then best-effort remove its stored images.
    ///
    /// Comments of the post are left in place.
    pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<Deletion, DomainError> {
        let post = self.owned(caller, id).await?;
        self.posts.delete(post.id).await?;

        let cleanup = purge(self.store.as_ref(), &post.image_urls, "post_delete").await;
        tracing::info!(post_id = %post.id, cleanup_failed = cleanup.is_failed(), "Post deleted");

        Ok(Deletion {
            post_id: post.id,
            cleanup,
        })
    }

    /// Store an image and append its URL. Store failures fail the request;
    /// if the post cannot be saved the stored object is removed again.
    pub async fn upload_image(
        &self,
        caller: Uuid,
        id: Uuid,
        upload: ImageUpload,
    ) -> Result<Vec<String>, DomainError> {
        let mut post = self.owned(caller, id).await?;
        upload.validate()?;

        let now = Utc::now();
        let key = upload.object_key(&format!("{}/{}/", post.user_id, post.id), now);
        let url = self
            .store
            .put(&key, upload.bytes, &upload.content_type)
            .await
            .map_err(|e| DomainError::DependencyUnavailable(e.to_string()))?;

        post.image_urls.push(url.clone());
        post.updated_at = now;
        let saved = match self.posts.save(post).await {
            Ok(saved) => saved,
            Err(e) => {
                purge(self.store.as_ref(), &[url], "post_image_rollback").await;
                return Err(e.into());
            }
        };

        tracing::info!(post_id = %saved.id, key = %key, "Post image stored");
        Ok(saved.image_urls)
    }

    /// Detach images from a post. Only URLs the post holds are considered;
    /// their objects are deleted best-effort.
    pub async fn delete_images(
        &self,
        caller: Uuid,
        id: Uuid,
        urls: Vec<String>,
    ) -> Result<ImageSet, DomainError> {
        if urls.is_empty() {
            return Err(DomainError::invalid("urls", "Provide \"urls\" array in body"));
        }
        let mut post = self.owned(caller, id).await?;

        let held: Vec<String> = urls
            .into_iter()
            .filter(|u| post.image_urls.contains(u))
            .collect();
        if held.is_empty() {
            return Ok(ImageSet {
                image_urls: post.image_urls,
                cleanup: Cleanup::NotNeeded,
            });
        }

        let cleanup = purge(self.store.as_ref(), &held, "post_images_delete").await;

        post.image_urls.retain(|u| !held.contains(u));
        post.updated_at = Utc::now();
        let saved = self.posts.save(post).await?;

        Ok(ImageSet {
            image_urls: saved.image_urls,
            cleanup,
        })
    }

    async fn find(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    async fn owned(&self, caller: Uuid, id: Uuid) -> Result<Post, DomainError> {
        let post = self.find(id).await?;
        if !post.is_owned_by(caller) {
            return Err(DomainError::Forbidden("Not the owner of this post".into()));
        }
        Ok(post)
    }

    /// Unknown category ids are dropped.
    async fn resolve_categories(&self, ids: Vec<Uuid>) -> Result<Vec<Uuid>, DomainError> {
        if ids.is_empty() {
            return Ok(ids);
        }
        Ok(self.categories.existing_ids(&ids).await?)
    }
}

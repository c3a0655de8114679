use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Post, User};
use crate::error::RepoError;
use crate::query::{Predicate, PostQuery};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their login.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError>;

    /// Fetch several users at once; missing ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One ordered page of posts matching the query.
    async fn find_page(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching the predicate, ignoring paging.
    async fn count(&self, predicate: &Predicate) -> Result<u64, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// Categories sorted by name, optionally filtered by a search term.
    async fn search(
        &self,
        term: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Category>, RepoError>;

    /// The subset of `ids` that exist, in input order.
    async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments of a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

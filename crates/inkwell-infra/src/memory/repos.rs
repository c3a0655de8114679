use async_trait::async_trait;
use uuid::Uuid;

use inkwell_core::domain::{Category, Comment, Post, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{CategoryRepository, CommentRepository, PostRepository, UserRepository};
use inkwell_core::query::{PostQuery, Predicate};

use super::InMemoryRepository;

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|u| u.login == login)
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let rows = self.rows.read().await;
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }
}

#[async_trait]
impl PostRepository for InMemoryRepository<Post> {
    async fn find_page(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let rows = self.rows.read().await;
        let mut matched: Vec<&Post> = rows
            .values()
            .filter(|p| query.predicate.matches(p))
            .collect();
        matched.sort_by(|a, b| query.compare(a, b));

        Ok(matched
            .into_iter()
            .skip(query.paging.skip() as usize)
            .take(query.paging.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, RepoError> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|p| predicate.matches(p)).count() as u64)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryRepository<Category> {
    async fn search(
        &self,
        term: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Category>, RepoError> {
        let rows = self.rows.read().await;
        let mut matched: Vec<&Category> = rows
            .values()
            .filter(|c| term.is_none_or(|t| c.matches_search(t)))
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(matched
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        let rows = self.rows.read().await;
        Ok(ids.iter().copied().filter(|id| rows.contains_key(id)).collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryRepository<Comment> {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let rows = self.rows.read().await;
        let mut comments: Vec<Comment> = rows
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use inkwell_core::domain::{CategoryInput, PostFields, PostStatus};
    use inkwell_core::ports::BaseRepository;
    use inkwell_core::query::ListPostsParams;

    use super::*;

    fn post(owner: Uuid, status: PostStatus, minutes_ago: i64) -> Post {
        let fields = PostFields {
            title: "A title".into(),
            summary: String::new(),
            details: "Some details here".into(),
            author: "Ada".into(),
            status,
            categories: vec![],
            tags: vec!["rust".into()],
        };
        Post::new(owner, fields, Utc::now() - Duration::minutes(minutes_ago))
    }

    #[tokio::test]
    async fn test_save_overwrites_and_delete_reports_missing() {
        let repo = InMemoryRepository::<Post>::new();
        let mut p = post(Uuid::new_v4(), PostStatus::Draft, 0);
        repo.save(p.clone()).await.unwrap();
        p.title = "Renamed".into();
        repo.save(p.clone()).await.unwrap();

        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.find_by_id(p.id).await.unwrap().unwrap().title, "Renamed");

        repo.delete(p.id).await.unwrap();
        assert!(matches!(repo.delete(p.id).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_find_page_filters_sorts_and_slices() {
        let repo = InMemoryRepository::<Post>::new();
        let owner = Uuid::new_v4();
        for minutes in [30, 10, 20] {
            repo.save(post(owner, PostStatus::Published, minutes))
                .await
                .unwrap();
        }
        repo.save(post(owner, PostStatus::Draft, 5)).await.unwrap();

        let params = ListPostsParams::from_pairs([("limit", "2")]);
        let query = PostQuery::compose(None, &params).unwrap();

        let page = repo.find_page(&query).await.unwrap();
        assert_eq!(page.len(), 2);
        assert!(page[0].published_at >= page[1].published_at);
        assert_eq!(repo.count(&query.predicate).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_category_search_is_sorted_by_name() {
        let repo = InMemoryRepository::<Category>::new();
        for name in ["Rust", "Go", "Rustacean news"] {
            let category = Category::create(
                CategoryInput {
                    name: name.into(),
                    description: None,
                },
                Utc::now(),
            )
            .unwrap();
            repo.save(category).await.unwrap();
        }

        let found = repo.search(Some("rust"), 10, 0).await.unwrap();
        let names: Vec<_> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Rustacean news"]);

        let second = repo.search(None, 1, 1).await.unwrap();
        assert_eq!(second[0].name, "Rust");
    }

    #[tokio::test]
    async fn test_existing_ids_keeps_input_order() {
        let repo = InMemoryRepository::<Category>::new();
        let a = Category::create(
            CategoryInput {
                name: "Alpha".into(),
                description: None,
            },
            Utc::now(),
        )
        .unwrap();
        repo.save(a.clone()).await.unwrap();

        let unknown = Uuid::new_v4();
        let ids = repo.existing_ids(&[unknown, a.id]).await.unwrap();
        assert_eq!(ids, vec![a.id]);
    }
}

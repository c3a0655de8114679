//! Service behaviour over the in-memory adapters.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

use inkwell_core::{DomainError, RepoError};
use inkwell_core::domain::{
    CategoryInput, Credentials, Post, PostFields, PostInput, PostStatus, ProfileUpdate,
};
use inkwell_core::ports::{BaseRepository, PostRepository};
use inkwell_core::query::{ListPostsParams, PostQuery, Predicate};
use inkwell_core::services::{
    CategoryService, Cleanup, CommentService, ImageUpload, PostService, UserService,
};
use inkwell_infra::{
    Argon2PasswordService, InMemoryCategoryRepository, InMemoryCommentRepository,
    InMemoryObjectStore, InMemoryPostRepository, InMemoryUserRepository,
};

struct World {
    posts: Arc<InMemoryPostRepository>,
    categories: Arc<InMemoryCategoryRepository>,
    store: Arc<InMemoryObjectStore>,
    post_service: PostService,
    comment_service: CommentService,
    category_service: CategoryService,
    user_service: UserService,
}

fn world() -> World {
    let posts = Arc::new(InMemoryPostRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let categories = Arc::new(InMemoryCategoryRepository::new());
    let comments = Arc::new(InMemoryCommentRepository::new());
    let store = Arc::new(InMemoryObjectStore::default());

    World {
        post_service: PostService::new(posts.clone(), categories.clone(), store.clone()),
        comment_service: CommentService::new(comments, posts.clone(), users.clone()),
        category_service: CategoryService::new(categories.clone()),
        user_service: UserService::new(
            users,
            categories.clone(),
            Arc::new(Argon2PasswordService::new()),
            store.clone(),
        ),
        posts,
        categories,
        store,
    }
}

fn fields(status: PostStatus, tags: &[&str]) -> PostFields {
    PostFields {
        title: "A post title".into(),
        summary: String::new(),
        details: "Details long enough".into(),
        author: "Ada".into(),
        status,
        categories: vec![],
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

async fn seed(
    world: &World,
    owner: Uuid,
    status: PostStatus,
    tags: &[&str],
    at: DateTime<Utc>,
) -> Post {
    let post = Post::new(owner, fields(status, tags), at);
    world.posts.save(post).await.unwrap()
}

fn params(pairs: &[(&str, &str)]) -> ListPostsParams {
    ListPostsParams::from_pairs(pairs.iter().copied())
}

fn png(name: &str) -> ImageUpload {
    ImageUpload {
        filename: Some(name.into()),
        content_type: "image/png".into(),
        bytes: vec![137, 80, 78, 71],
    }
}

#[tokio::test]
async fn anonymous_listing_only_returns_published_posts() {
    let w = world();
    let owner = Uuid::new_v4();
    let now = Utc::now();
    seed(&w, owner, PostStatus::Published, &["rust"], now).await;
    seed(&w, owner, PostStatus::Draft, &["rust"], now).await;
    seed(&w, owner, PostStatus::Archived, &["rust"], now).await;

    let page = w.post_service.list(None, &params(&[])).await.unwrap();

    assert_eq!(page.total, 1);
    assert!(page.items.iter().all(|p| p.status == PostStatus::Published));
}

#[tokio::test]
async fn signed_in_listing_adds_own_unpublished_posts() {
    let w = world();
    let me = Uuid::new_v4();
    let other = Uuid::new_v4();
    let now = Utc::now();
    seed(&w, me, PostStatus::Draft, &["rust"], now).await;
    seed(&w, other, PostStatus::Draft, &["rust"], now).await;
    seed(&w, other, PostStatus::Published, &["rust"], now).await;

    let page = w.post_service.list(Some(me), &params(&[])).await.unwrap();

    assert_eq!(page.total, 2);
    assert!(
        page.items
            .iter()
            .all(|p| p.user_id == me || p.status == PostStatus::Published)
    );
}

#[tokio::test]
async fn owner_listing_never_leaks_other_users() {
    let w = world();
    let me = Uuid::new_v4();
    let now = Utc::now();
    for status in [PostStatus::Draft, PostStatus::Published, PostStatus::Archived] {
        seed(&w, me, status, &["rust"], now).await;
        seed(&w, Uuid::new_v4(), status, &["rust"], now).await;
    }

    let all = w
        .post_service
        .list(Some(me), &params(&[("owner", "me")]))
        .await
        .unwrap();
    assert_eq!(all.total, 3);
    assert!(all.items.iter().all(|p| p.user_id == me));

    let drafts = w
        .post_service
        .list(Some(me), &params(&[("owner", "me"), ("status", "draft")]))
        .await
        .unwrap();
    assert_eq!(drafts.total, 1);
    assert_eq!(drafts.items[0].status, PostStatus::Draft);
}

#[tokio::test]
async fn owner_listing_requires_a_caller() {
    let w = world();
    let result = w.post_service.list(None, &params(&[("owner", "me")])).await;
    assert!(matches!(result, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn second_page_is_the_next_slice_with_the_same_total() {
    let w = world();
    let owner = Uuid::new_v4();
    let base = Utc::now() - Duration::days(1);
    for i in 0..45 {
        seed(&w, owner, PostStatus::Published, &["rust"], base + Duration::minutes(i)).await;
    }

    let everything = w
        .post_service
        .list(None, &params(&[("limit", "100")]))
        .await
        .unwrap();
    let second = w
        .post_service
        .list(None, &params(&[("limit", "20"), ("page", "1")]))
        .await
        .unwrap();
    let first = w
        .post_service
        .list(None, &params(&[("limit", "20"), ("page", "0")]))
        .await
        .unwrap();

    let expected: Vec<Uuid> = everything.items[20..40].iter().map(|p| p.id).collect();
    let actual: Vec<Uuid> = second.items.iter().map(|p| p.id).collect();
    assert_eq!(actual, expected);
    assert_eq!(first.total, 45);
    assert_eq!(second.total, 45);
    assert_eq!(second.page, 1);
    assert_eq!(second.limit, 20);
}

#[tokio::test]
async fn date_range_bounds_whole_days_of_publication() {
    let w = world();
    let owner = Uuid::new_v4();
    let inside_start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let inside_end = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
    let outside = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let a = seed(&w, owner, PostStatus::Published, &["rust"], inside_start).await;
    let b = seed(&w, owner, PostStatus::Published, &["rust"], inside_end).await;
    seed(&w, owner, PostStatus::Published, &["rust"], outside).await;
    seed(&w, owner, PostStatus::Draft, &["rust"], inside_start).await;

    let page = w
        .post_service
        .list(
            None,
            &params(&[("dateFrom", "2024-01-01"), ("dateTo", "2024-01-31")]),
        )
        .await
        .unwrap();

    let mut ids: Vec<Uuid> = page.items.iter().map(|p| p.id).collect();
    ids.sort();
    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn tag_match_all_needs_every_term_on_any_tag() {
    let w = world();
    let owner = Uuid::new_v4();
    let now = Utc::now();
    let both = seed(&w, owner, PostStatus::Published, &["catnip", "hotdog"], now).await;
    seed(&w, owner, PostStatus::Published, &["cat"], now).await;
    seed(&w, owner, PostStatus::Published, &["dog"], now).await;

    let page = w
        .post_service
        .list(None, &params(&[("tags", "cat,dog"), ("match", "all")]))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, both.id);

    let any = w
        .post_service
        .list(None, &params(&[("tags", "CAT,dog")]))
        .await
        .unwrap();
    assert_eq!(any.total, 3);

    let exact = w
        .post_service
        .list(None, &params(&[("tags", "Cat"), ("match", "exact")]))
        .await
        .unwrap();
    assert_eq!(exact.total, 1);
}

#[tokio::test]
async fn category_filter_keeps_posts_sharing_any_valid_id() {
    let w = world();
    let owner = Uuid::new_v4();
    let now = Utc::now();
    let (rust, web) = (Uuid::new_v4(), Uuid::new_v4());

    let mut both = fields(PostStatus::Published, &["rust"]);
    both.categories = vec![rust, web];
    let both = w.posts.save(Post::new(owner, both, now)).await.unwrap();
    let mut web_only = fields(PostStatus::Published, &["rust"]);
    web_only.categories = vec![web];
    w.posts.save(Post::new(owner, web_only, now)).await.unwrap();
    seed(&w, owner, PostStatus::Published, &["rust"], now).await;

    let filter = format!("{rust},not-a-uuid");
    let page = w
        .post_service
        .list(None, &params(&[("categories", filter.as_str())]))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, both.id);

    let unfiltered = w
        .post_service
        .list(None, &params(&[("categories", "not-a-uuid")]))
        .await
        .unwrap();
    assert_eq!(unfiltered.total, 3);
}

#[tokio::test]
async fn search_matches_title_or_author_literally() {
    let w = world();
    let owner = Uuid::new_v4();
    let now = Utc::now();

    let mut discount = fields(PostStatus::Published, &["rust"]);
    discount.title = "Now 100% async".into();
    let discount = w.posts.save(Post::new(owner, discount, now)).await.unwrap();
    let mut by_grace = fields(PostStatus::Published, &["rust"]);
    by_grace.author = "Grace Hopper".into();
    let by_grace = w.posts.save(Post::new(owner, by_grace, now)).await.unwrap();
    let mut near_miss = fields(PostStatus::Published, &["rust"]);
    near_miss.title = "1000 ways".into();
    w.posts.save(Post::new(owner, near_miss, now)).await.unwrap();

    let literal = w
        .post_service
        .list(None, &params(&[("q", "100%")]))
        .await
        .unwrap();
    assert_eq!(literal.total, 1);
    assert_eq!(literal.items[0].id, discount.id);

    let author = w
        .post_service
        .list(None, &params(&[("q", "  hOPPER ")]))
        .await
        .unwrap();
    assert_eq!(author.total, 1);
    assert_eq!(author.items[0].id, by_grace.id);

    let title = w
        .post_service
        .list(None, &params(&[("q", "ASYNC")]))
        .await
        .unwrap();
    assert_eq!(title.total, 1);
}

#[tokio::test]
async fn category_listing_survives_a_huge_page() {
    let w = world();
    w.category_service
        .create(CategoryInput {
            name: "Languages".into(),
            description: None,
        })
        .await
        .unwrap();

    let page = w
        .category_service
        .list(None, Some("200"), Some("9223372036854775807"))
        .await
        .unwrap();
    assert!(page.is_empty());

    let posts = w
        .post_service
        .list(None, &params(&[("page", "100000000000000000"), ("limit", "100")]))
        .await
        .unwrap();
    assert!(posts.items.is_empty());
}

#[tokio::test]
async fn created_post_normalizes_tags_and_drops_unknown_categories() {
    let w = world();
    let category = w
        .category_service
        .create(CategoryInput {
            name: "Languages".into(),
            description: None,
        })
        .await
        .unwrap();

    let input = PostInput {
        title: Some("Learning Go".into()),
        details: Some("A long enough body".into()),
        author: Some("Ada".into()),
        status: Some("published".into()),
        categories: Some(vec![category.id.to_string(), Uuid::new_v4().to_string()]),
        tags: Some(json!(["Go", " go ", "GO-lang"])),
        ..Default::default()
    };
    let post = w.post_service.create(Uuid::new_v4(), input).await.unwrap();

    assert_eq!(post.tags, vec!["go".to_string(), "go-lang".to_string()]);
    assert_eq!(post.categories, vec![category.id]);
    assert!(post.published_at.is_some_and(|at| at <= Utc::now()));
    assert_eq!(w.categories.len().await, 1);
}

#[tokio::test]
async fn publishing_and_reverting_moves_published_at() {
    let w = world();
    let me = Uuid::new_v4();
    let draft = seed(&w, me, PostStatus::Draft, &["rust"], Utc::now()).await;
    assert!(draft.published_at.is_none());

    let published = w
        .post_service
        .update(
            me,
            draft.id,
            PostInput {
                status: Some("published".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(published.published_at.is_some());

    let reverted = w
        .post_service
        .update(
            me,
            draft.id,
            PostInput {
                status: Some("draft".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(reverted.published_at.is_none());
}

#[tokio::test]
async fn unpublished_post_is_only_visible_to_its_owner() {
    let w = world();
    let me = Uuid::new_v4();
    let draft = seed(&w, me, PostStatus::Draft, &["rust"], Utc::now()).await;

    assert!(w.post_service.get(Some(me), draft.id).await.is_ok());
    assert!(matches!(
        w.post_service.get(None, draft.id).await,
        Err(DomainError::Forbidden(_))
    ));
    assert!(matches!(
        w.post_service
            .update(Uuid::new_v4(), draft.id, PostInput::default())
            .await,
        Err(DomainError::Forbidden(_))
    ));
}

#[tokio::test]
async fn deleting_a_post_survives_store_outage() {
    let w = world();
    let me = Uuid::new_v4();
    let post = seed(&w, me, PostStatus::Published, &["rust"], Utc::now()).await;
    let urls = w.post_service.upload_image(me, post.id, png("a.png")).await.unwrap();
    assert_eq!(urls.len(), 1);

    w.store.set_available(false);
    let deletion = w.post_service.delete(me, post.id).await.unwrap();

    assert!(deletion.cleanup.is_failed());
    assert!(w.posts.find_by_id(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_post_removes_its_images() {
    let w = world();
    let me = Uuid::new_v4();
    let post = seed(&w, me, PostStatus::Published, &["rust"], Utc::now()).await;
    let urls = w.post_service.upload_image(me, post.id, png("a.png")).await.unwrap();
    let key = w.store_key(&urls[0]);
    assert!(w.store.contains(&key).await);

    let deletion = w.post_service.delete(me, post.id).await.unwrap();

    assert_eq!(deletion.cleanup, Cleanup::Completed { deleted: 1 });
    assert!(!w.store.contains(&key).await);
}

#[tokio::test]
async fn image_upload_fails_when_store_is_down() {
    let w = world();
    let me = Uuid::new_v4();
    let post = seed(&w, me, PostStatus::Draft, &["rust"], Utc::now()).await;
    w.store.set_available(false);

    let result = w.post_service.upload_image(me, post.id, png("a.png")).await;

    assert!(matches!(result, Err(DomainError::DependencyUnavailable(_))));
    let stored = w.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert!(stored.image_urls.is_empty());
}

/// Reads pass through; every write fails.
struct ReadOnlyPosts(Arc<InMemoryPostRepository>);

#[async_trait]
impl BaseRepository<Post, Uuid> for ReadOnlyPosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.0.find_by_id(id).await
    }

    async fn save(&self, _entity: Post) -> Result<Post, RepoError> {
        Err(RepoError::Connection("read-only".into()))
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Err(RepoError::Connection("read-only".into()))
    }
}

#[async_trait]
impl PostRepository for ReadOnlyPosts {
    async fn find_page(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        self.0.find_page(query).await
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, RepoError> {
        self.0.count(predicate).await
    }
}

#[tokio::test]
async fn failed_save_removes_the_uploaded_image() {
    let w = world();
    let me = Uuid::new_v4();
    let post = seed(&w, me, PostStatus::Draft, &["rust"], Utc::now()).await;
    let service = PostService::new(
        Arc::new(ReadOnlyPosts(w.posts.clone())),
        w.categories.clone(),
        w.store.clone(),
    );

    let result = service.upload_image(me, post.id, png("cover.png")).await;

    assert!(matches!(result, Err(DomainError::Repo(RepoError::Connection(_)))));
    assert_eq!(w.store.object_count().await, 0);
    let stored = w.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert!(stored.image_urls.is_empty());
}

#[tokio::test]
async fn deleting_images_ignores_urls_the_post_does_not_hold() {
    let w = world();
    let me = Uuid::new_v4();
    let post = seed(&w, me, PostStatus::Draft, &["rust"], Utc::now()).await;
    let first = w.post_service.upload_image(me, post.id, png("a.png")).await.unwrap();
    let both = w.post_service.upload_image(me, post.id, png("b.jpg")).await.unwrap();

    let set = w
        .post_service
        .delete_images(
            me,
            post.id,
            vec![first[0].clone(), "http://elsewhere/x.png".into()],
        )
        .await
        .unwrap();

    assert_eq!(set.image_urls, vec![both[1].clone()]);
    assert_eq!(set.cleanup, Cleanup::Completed { deleted: 1 });

    let empty = w.post_service.delete_images(me, post.id, vec![]).await;
    assert!(matches!(empty, Err(DomainError::Validation(_))));
}

#[tokio::test]
async fn comments_require_a_published_post() {
    let w = world();
    let author = w
        .user_service
        .register(Credentials {
            login: "ada_l".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap();
    let draft = seed(&w, author.id, PostStatus::Draft, &["rust"], Utc::now()).await;

    let result = w.comment_service.create(author.id, draft.id, "Nice").await;
    assert!(matches!(result, Err(DomainError::Forbidden(_))));
    assert!(matches!(
        w.comment_service.list(draft.id).await,
        Err(DomainError::Forbidden(_))
    ));
}

#[tokio::test]
async fn comment_lifecycle_on_published_post() {
    let w = world();
    let author = w
        .user_service
        .register(Credentials {
            login: "ada_l".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap();
    let stranger = Uuid::new_v4();
    let post = seed(&w, Uuid::new_v4(), PostStatus::Published, &["rust"], Utc::now()).await;

    let view = w
        .comment_service
        .create(author.id, post.id, "  First!  ")
        .await
        .unwrap();
    assert_eq!(view.comment.content, "First!");
    assert_eq!(view.author, "ada_l");

    let foreign_edit = w
        .comment_service
        .update(stranger, post.id, view.comment.id, "Hijacked")
        .await;
    assert!(matches!(foreign_edit, Err(DomainError::NotFound { .. })));

    let edited = w
        .comment_service
        .update(author.id, post.id, view.comment.id, "Edited")
        .await
        .unwrap();
    assert_eq!(edited.comment.content, "Edited");

    let anonymous = w
        .comment_service
        .create(stranger, post.id, "Hello")
        .await
        .unwrap();
    assert_eq!(anonymous.author, "Unknown");

    let listed = w.comment_service.list(post.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].comment.id, view.comment.id);

    w.comment_service
        .delete(author.id, post.id, view.comment.id)
        .await
        .unwrap();
    assert_eq!(w.comment_service.list(post.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn registration_and_login() {
    let w = world();
    let credentials = Credentials {
        login: "ada_l".into(),
        password: "hunter22".into(),
    };
    let user = w.user_service.register(credentials.clone()).await.unwrap();
    assert_ne!(user.password_hash, "hunter22");

    assert!(matches!(
        w.user_service.register(credentials).await,
        Err(DomainError::Duplicate(_))
    ));
    assert_eq!(
        w.user_service
            .authenticate("ada_l", "hunter22")
            .await
            .unwrap()
            .id,
        user.id
    );
    assert!(matches!(
        w.user_service.authenticate("ada_l", "wrong!").await,
        Err(DomainError::Unauthorized)
    ));
    assert!(matches!(
        w.user_service.authenticate("nobody", "hunter22").await,
        Err(DomainError::Unauthorized)
    ));
}

#[tokio::test]
async fn profile_avatar_and_preferences() {
    let w = world();
    let user = w
        .user_service
        .register(Credentials {
            login: "ada_l".into(),
            password: "hunter22".into(),
        })
        .await
        .unwrap();

    let updated = w
        .user_service
        .update_profile(
            user.id,
            ProfileUpdate {
                name: Some("Ada".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Ada");

    let first = w.user_service.upload_avatar(user.id, png("me.png")).await.unwrap();
    let second = w.user_service.upload_avatar(user.id, png("me2.png")).await.unwrap();
    assert!(!w.store.contains(&w.store_key(&first.avatar_url)).await);
    assert!(w.store.contains(&w.store_key(&second.avatar_url)).await);

    let category = w
        .category_service
        .create(CategoryInput {
            name: "Rust".into(),
            description: None,
        })
        .await
        .unwrap();
    let prefs = w
        .user_service
        .set_preferences(
            user.id,
            &[category.id.to_string(), Uuid::new_v4().to_string()],
        )
        .await
        .unwrap();
    assert_eq!(prefs, vec![category.id]);

    assert!(matches!(
        w.user_service
            .set_preferences(user.id, &["not-an-id".to_string()])
            .await,
        Err(DomainError::Validation(_))
    ));
    assert!(w.user_service.reset_preferences(user.id).await.unwrap().is_empty());
}

impl World {
    fn store_key(&self, url: &str) -> String {
        use inkwell_core::ports::ObjectStore;
        self.store.key_from_url(url).unwrap()
    }
}

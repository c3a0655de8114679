use chrono::{TimeZone, Utc};
use sea_orm::{DatabaseBackend, EntityTrait, MockDatabase, QueryFilter, QueryTrait, Value};
use uuid::Uuid;

use inkwell_core::domain::{Post, PostStatus};
use inkwell_core::ports::{BaseRepository, PostRepository};
use inkwell_core::query::{
    DateField, DateRange, ListPostsParams, PostQuery, Predicate, TagMode, TextField,
};

use super::entity::post;
use super::postgres_repo::PostgresPostRepository;
use super::query::{apply_order, post_condition};

fn post_model(id: Uuid, title: &str) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        user_id: Uuid::new_v4(),
        title: title.to_owned(),
        summary: String::new(),
        details: "Long enough details".to_owned(),
        author: "Ada".to_owned(),
        status: "published".to_owned(),
        published_at: Some(now.into()),
        category_ids: vec![Uuid::new_v4()],
        tags: vec!["rust".to_owned()],
        image_urls: vec![],
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn statement(predicate: &Predicate) -> sea_orm::Statement {
    post::Entity::find()
        .filter(post_condition(predicate))
        .build(DatabaseBackend::Postgres)
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, "Test Post")]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.status, PostStatus::Published);
    assert_eq!(post.tags, vec!["rust".to_string()]);
}

#[tokio::test]
async fn test_find_page_maps_rows() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            post_model(first, "First"),
            post_model(second, "Second"),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let query = PostQuery::compose(None, &ListPostsParams::default()).unwrap();

    let page = repo.find_page(&query).await.unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, first);
    assert_eq!(page[1].title, "Second");
}

#[test]
fn test_unknown_status_reads_as_draft() {
    let mut model = post_model(Uuid::new_v4(), "Odd");
    model.status = "pending".to_owned();

    let post: Post = model.into();
    assert_eq!(post.status, PostStatus::Draft);
}

#[test]
fn test_status_and_owner_condition() {
    let owner = Uuid::new_v4();
    let stmt = statement(&Predicate::All(vec![
        Predicate::StatusIs(PostStatus::Published),
        Predicate::OwnerIs(owner),
    ]));

    assert!(stmt.sql.contains(r#""posts"."status" = $1"#));
    assert!(stmt.sql.contains(r#""posts"."user_id" = $2"#));
    let values = stmt.values.unwrap().0;
    assert!(values.contains(&Value::from("published")));
    assert!(values.contains(&Value::from(owner)));
}

#[test]
fn test_date_range_binds_both_bounds() {
    let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let stmt = statement(&Predicate::DateWithin {
        field: DateField::PublishedAt,
        range: DateRange {
            from: Some(from),
            to: Some(from + chrono::Duration::days(1)),
        },
    });

    assert!(stmt.sql.contains(r#""posts"."published_at" >= $1"#));
    assert!(stmt.sql.contains(r#""posts"."published_at" <= $2"#));
}

#[test]
fn test_category_overlap_binds_one_array() {
    let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
    let stmt = statement(&Predicate::All(vec![
        Predicate::StatusIs(PostStatus::Published),
        Predicate::CategoryAnyOf(ids.clone()),
    ]));

    assert!(stmt.sql.contains(r#""posts"."category_ids" && $2"#));
    let values = stmt.values.unwrap().0;
    assert_eq!(values.len(), 2);
    assert_eq!(values[1], Value::from(ids));
}

#[test]
fn test_composed_listing_numbers_every_placeholder() {
    let category = Uuid::new_v4();
    let params = ListPostsParams::from_pairs([
        ("q", "rust".to_string()),
        ("categories", format!("{category},not-an-id")),
        ("tags", "web".to_string()),
        ("dateFrom", "2024-01-01".to_string()),
    ]);
    let query = PostQuery::compose(None, &params).unwrap();
    let stmt = statement(&query.predicate);

    let mut placeholders: Vec<usize> = stmt
        .sql
        .split('$')
        .skip(1)
        .map(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap()
        })
        .collect();
    placeholders.sort_unstable();
    let values = stmt.values.unwrap().0;
    assert_eq!(placeholders, (1..=values.len()).collect::<Vec<_>>());

    assert_eq!(values.len(), 6);
    assert!(values.contains(&Value::from("published")));
    assert!(values.contains(&Value::from(vec![category])));
    assert!(values.contains(&Value::from("%rust%")));
    assert!(values.contains(&Value::from("%web%")));
}

#[test]
fn test_tags_all_requires_every_term() {
    let stmt = statement(&Predicate::TagMatch {
        mode: TagMode::All,
        terms: vec!["rust".into(), "web_dev".into()],
    });

    assert_eq!(stmt.sql.matches("EXISTS (SELECT 1 FROM unnest").count(), 2);
    assert!(stmt.sql.contains(" AND "));
    let values = stmt.values.unwrap().0;
    assert!(values.contains(&Value::from("%rust%")));
    assert!(values.contains(&Value::from("%web!_dev%")));
}

#[test]
fn test_tags_exact_uses_array_membership() {
    let stmt = statement(&Predicate::TagMatch {
        mode: TagMode::Exact,
        terms: vec!["Go".into(), "rust".into()],
    });

    assert!(stmt.sql.contains(r#"$1 = ANY("posts"."tags")"#));
    assert!(stmt.sql.contains(r#"$2 = ANY("posts"."tags")"#));
    assert!(stmt.sql.contains(" OR "));
    assert!(stmt.values.unwrap().0.contains(&Value::from("go")));
}

#[test]
fn test_text_search_escapes_wildcards() {
    let stmt = statement(&Predicate::TextContains {
        fields: vec![TextField::Title, TextField::Author],
        needle: "100%".into(),
    });

    assert!(stmt.sql.contains(r#""posts"."title" ILIKE $1 ESCAPE '!'"#));
    assert!(stmt.sql.contains(r#""posts"."author" ILIKE $2 ESCAPE '!'"#));
    assert!(stmt.values.unwrap().0.contains(&Value::from("%100!%%")));
}

#[test]
fn test_public_listing_order() {
    let query = PostQuery::compose(None, &ListPostsParams::default()).unwrap();
    let sql = apply_order(post::Entity::find(), &query.order)
        .build(DatabaseBackend::Postgres)
        .sql;

    assert!(sql.contains(r#"ORDER BY "posts"."published_at" DESC NULLS LAST"#));
    assert!(sql.contains(r#""posts"."created_at" DESC"#));
    assert!(sql.ends_with(r#""posts"."id" DESC"#));
}

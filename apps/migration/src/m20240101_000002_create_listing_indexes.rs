//! Indexes backing post listing filters and orderings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const UP: &[&str] = &[
    "CREATE EXTENSION IF NOT EXISTS pg_trgm",
    r#"CREATE INDEX IF NOT EXISTS idx_posts_status_published ON "posts" ("status", "published_at" DESC, "created_at" DESC, "id" DESC)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_posts_user_created ON "posts" ("user_id", "created_at" DESC, "id" DESC)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_posts_category_ids ON "posts" USING GIN ("category_ids")"#,
    r#"CREATE INDEX IF NOT EXISTS idx_posts_tags ON "posts" USING GIN ("tags")"#,
    r#"CREATE INDEX IF NOT EXISTS idx_posts_title_trgm ON "posts" USING GIN ("title" gin_trgm_ops)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_posts_author_trgm ON "posts" USING GIN ("author" gin_trgm_ops)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_comments_post_created ON "comments" ("post_id", "created_at")"#,
    r#"CREATE INDEX IF NOT EXISTS idx_categories_name_trgm ON "categories" USING GIN ("name" gin_trgm_ops)"#,
];

const DOWN: &[&str] = &[
    "DROP INDEX IF EXISTS idx_categories_name_trgm",
    "DROP INDEX IF EXISTS idx_comments_post_created",
    "DROP INDEX IF EXISTS idx_posts_author_trgm",
    "DROP INDEX IF EXISTS idx_posts_title_trgm",
    "DROP INDEX IF EXISTS idx_posts_tags",
    "DROP INDEX IF EXISTS idx_posts_category_ids",
    "DROP INDEX IF EXISTS idx_posts_user_created",
    "DROP INDEX IF EXISTS idx_posts_status_published",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for statement in UP {
            db.execute_unprepared(statement).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for statement in DOWN {
            db.execute_unprepared(statement).await?;
        }
        Ok(())
    }
}

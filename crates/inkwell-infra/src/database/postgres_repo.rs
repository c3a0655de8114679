//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use inkwell_core::domain::{Category, Comment, Post, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{CategoryRepository, CommentRepository, PostRepository, UserRepository};
use inkwell_core::query::{PostQuery, Predicate};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::Entity as PostEntity;
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};
use super::query::{apply_order, escape_like, post_condition};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(login = %login, "Finding user by login");

        let result = UserEntity::find()
            .filter(user::Column::Login.eq(login))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_page(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let select = PostEntity::find().filter(post_condition(&query.predicate));

        let result = apply_order(select, &query.order)
            .offset(query.paging.skip())
            .limit(query.paging.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, predicate: &Predicate) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post_condition(predicate))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn search(
        &self,
        term: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<Category>, RepoError> {
        let mut select = CategoryEntity::find();
        if let Some(term) = term {
            let pattern = format!("%{}%", escape_like(term));
            select = select.filter(
                Condition::any()
                    .add(Expr::cust_with_values(
                        r#""categories"."name" ILIKE $1 ESCAPE '!'"#,
                        [pattern.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        r#""categories"."description" ILIKE $1 ESCAPE '!'"#,
                        [pattern],
                    )),
            );
        }

        let result = select
            .order_by_asc(category::Column::Name)
            .order_by_asc(category::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn existing_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<Uuid> = CategoryEntity::find()
            .select_only()
            .column(category::Column::Id)
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(ids.iter().copied().filter(|id| found.contains(id)).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

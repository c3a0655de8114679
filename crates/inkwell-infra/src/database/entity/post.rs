//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use inkwell_core::domain::{Post, PostStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub summary: String,
    #[sea_orm(column_type = "Text")]
    pub details: String,
    pub author: String,
    pub status: String,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub category_ids: Vec<Uuid>,
    pub tags: Vec<String>,
    pub image_urls: Vec<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Post {
    fn from(model: Model) -> Self {
        let status = model.status.parse().unwrap_or_else(|_| {
            tracing::warn!(post_id = %model.id, status = %model.status, "Unknown stored post status");
            PostStatus::Draft
        });

        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            summary: model.summary,
            details: model.details,
            author: model.author,
            status,
            published_at: model.published_at.map(Into::into),
            categories: model.category_ids,
            tags: model.tags,
            image_urls: model.image_urls,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<Post> for ActiveModel {
    fn from(post: Post) -> Self {
        Self {
            id: Set(post.id),
            user_id: Set(post.user_id),
            title: Set(post.title),
            summary: Set(post.summary),
            details: Set(post.details),
            author: Set(post.author),
            status: Set(post.status.as_str().to_owned()),
            published_at: Set(post.published_at.map(Into::into)),
            category_ids: Set(post.categories),
            tags: Set(post.tags),
            image_urls: Set(post.image_urls),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}

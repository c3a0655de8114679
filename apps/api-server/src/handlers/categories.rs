//! Category handlers.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::CategoryInput;
use inkwell_shared::dto::{CategoryListQuery, CategoryRequest, ItemsResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories?search=&limit=&page=
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<CategoryListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let items = state
        .categories
        .list(
            query.search.as_deref(),
            query.limit.as_deref(),
            query.page.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(ItemsResponse { items }))
}

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    tracing::debug!(user_id = %identity.user_id, name = %req.name, "Creating category");

    let category = state
        .categories
        .create(CategoryInput {
            name: req.name,
            description: req.description,
        })
        .await?;
    Ok(HttpResponse::Created().json(category))
}

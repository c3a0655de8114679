//! Comment handlers. All of them require the parent post to be published.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_shared::dto::{CommentRequest, ItemsResponse, MessageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts/{id}/comments
pub async fn list(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let items = state.comments.list(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ItemsResponse { items }))
}

/// POST /api/posts/{id}/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .comments
        .create(identity.user_id, path.into_inner(), &body.content)
        .await?;
    Ok(HttpResponse::Created().json(view))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let view = state
        .comments
        .update(identity.user_id, post_id, comment_id, &body.content)
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .comments
        .delete(identity.user_id, post_id, comment_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Comment deleted")))
}

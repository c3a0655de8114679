//! Post handlers: listing, CRUD and image management.

use actix_web::{HttpRequest, HttpResponse, web};
use uuid::Uuid;

use inkwell_core::domain::PostInput;
use inkwell_core::query::ListPostsParams;
use inkwell_shared::dto::{DeleteImagesRequest, ImageUrlsResponse, PostRequest, UploadQuery};

use super::read_upload;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts
///
/// Query pairs are kept raw so repeated keys (`tags=a&tags=b`) survive.
pub async fn list(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<Vec<(String, String)>>,
) -> AppResult<HttpResponse> {
    let params = ListPostsParams::from_pairs(query.into_inner());
    let page = state.posts.list(identity.user_id(), &params).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(identity.user_id(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .create(identity.user_id, post_input(body.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(post))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(
            identity.user_id,
            path.into_inner(),
            post_input(body.into_inner()),
        )
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let deletion = state
        .posts
        .delete(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(deletion))
}

/// POST /api/posts/{id}/images
pub async fn upload_image(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let upload = read_upload(&req, query.into_inner(), body);
    let image_urls = state
        .posts
        .upload_image(identity.user_id, path.into_inner(), upload)
        .await?;
    Ok(HttpResponse::Created().json(ImageUrlsResponse { image_urls }))
}

/// DELETE /api/posts/{id}/images
pub async fn delete_images(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<DeleteImagesRequest>,
) -> AppResult<HttpResponse> {
    let set = state
        .posts
        .delete_images(identity.user_id, path.into_inner(), body.into_inner().urls)
        .await?;
    Ok(HttpResponse::Ok().json(set))
}

fn post_input(req: PostRequest) -> PostInput {
    PostInput {
        title: req.title,
        summary: req.summary,
        details: req.details,
        author: req.author,
        status: req.status,
        categories: req.categories,
        tags: req.tags,
    }
}

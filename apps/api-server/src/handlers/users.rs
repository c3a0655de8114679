//! Account, session, profile and preference handlers.

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};

use inkwell_core::domain::{Credentials, ProfileUpdate};
use inkwell_core::ports::TokenService;
use inkwell_shared::dto::{
    LoginRequest, MessageResponse, PreferencesRequest, PreferencesResponse, RegisterUserRequest,
    SessionResponse, UpdateProfileRequest, UploadQuery,
};

use super::read_upload;
use crate::middleware::auth::{Identity, cleared_session_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/users/create
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .users
        .register(Credentials {
            login: req.login,
            password: req.password,
        })
        .await?;

    Ok(HttpResponse::Created().json(user))
}

/// POST /api/users/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state.users.authenticate(&req.login, &req.password).await?;

    let token = token_service
        .generate_token(user.id, &user.login)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let expires_in = token_service.expiration_seconds();

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(
            token,
            expires_in,
            state.session.cookie_secure,
        ))
        .json(SessionResponse {
            user,
            expires_in: expires_in.max(0) as u64,
        }))
}

/// POST /api/users/logout
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(cleared_session_cookie(state.session.cookie_secure))
        .json(MessageResponse::new("Logged out"))
}

/// GET /api/users/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.users.profile(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// PUT /api/users/me
pub async fn update_me(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .users
        .update_profile(
            identity.user_id,
            ProfileUpdate {
                name: req.name,
                email: req.email,
                about: req.about,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// POST /api/users/me/avatar
pub async fn upload_avatar(
    state: web::Data<AppState>,
    identity: Identity,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let upload = read_upload(&req, query.into_inner(), body);
    let user = state.users.upload_avatar(identity.user_id, upload).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// GET /api/users/preferences
pub async fn preferences(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let ids = state.users.preferences(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(preferences_body(ids)))
}

/// PUT /api/users/preferences
pub async fn set_preferences(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PreferencesRequest>,
) -> AppResult<HttpResponse> {
    let ids = state
        .users
        .set_preferences(identity.user_id, &body.category_ids)
        .await?;
    Ok(HttpResponse::Ok().json(preferences_body(ids)))
}

/// DELETE /api/users/preferences
pub async fn reset_preferences(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let ids = state.users.reset_preferences(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(preferences_body(ids)))
}

fn preferences_body(ids: Vec<uuid::Uuid>) -> PreferencesResponse {
    PreferencesResponse {
        category_ids: ids.iter().map(ToString::to_string).collect(),
    }
}

//! HTTP handlers and route configuration.

mod categories;
mod comments;
mod health;
mod posts;
mod users;


use actix_web::http::header;
use actix_web::{HttpRequest, web};

use inkwell_core::services::{ImageUpload, MAX_IMAGE_BYTES};
use inkwell_shared::dto::UploadQuery;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let uploads = web::PayloadConfig::new(MAX_IMAGE_BYTES);

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/users")
                    .route("/create", web::post().to(users::register))
                    .route("/register", web::post().to(users::register))
                    .route("/login", web::post().to(users::login))
                    .route("/logout", web::post().to(users::logout))
                    .route("/me", web::get().to(users::me))
                    .route("/me", web::put().to(users::update_me))
                    .service(
                        web::resource("/me/avatar")
                            .app_data(uploads.clone())
                            .route(web::post().to(users::upload_avatar)),
                    )
                    .route("/preferences", web::get().to(users::preferences))
                    .route("/preferences", web::put().to(users::set_preferences))
                    .route("/preferences", web::delete().to(users::reset_preferences)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list))
                    .route("", web::post().to(categories::create)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .service(
                        web::resource("/{id}/images")
                            .app_data(uploads)
                            .route(web::post().to(posts::upload_image))
                            .route(web::delete().to(posts::delete_images)),
                    )
                    .route("/{id}/comments", web::get().to(comments::list))
                    .route("/{id}/comments", web::post().to(comments::create))
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::put().to(comments::update),
                    )
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::delete().to(comments::delete),
                    ),
            ),
    );
}

/// Raw request body plus its declared content type.
fn read_upload(req: &HttpRequest, query: UploadQuery, body: web::Bytes) -> ImageUpload {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    ImageUpload {
        filename: query.filename,
        content_type,
        bytes: body.to_vec(),
    }
}

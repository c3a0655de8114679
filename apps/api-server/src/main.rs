//! # Inkwell API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use inkwell_core::ports::{ObjectStore, TokenService};
use inkwell_infra::{Argon2PasswordService, JwtTokenService, LocalObjectStore};

mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::RequestIdMiddleware;
use state::{AppState, Repositories, SessionSettings};
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Inkwell API Server on {}:{}",
        config.host,
        config.port
    );

    let repos = Repositories::connect(config.database.as_ref()).await;
    let store: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(config.storage.clone()));
    let state = AppState::new(
        repos,
        Arc::new(Argon2PasswordService::new()),
        store,
        SessionSettings {
            cookie_secure: config.cookie_secure,
        },
    );
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

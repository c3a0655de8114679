//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{
    CategoryRepository, CommentRepository, ObjectStore, PasswordService, PostRepository,
    UserRepository,
};
use inkwell_core::services::{CategoryService, CommentService, PostService, UserService};
use inkwell_infra::database::DatabaseConfig;
use inkwell_infra::{
    Argon2PasswordService, InMemoryCategoryRepository, InMemoryCommentRepository,
    InMemoryPostRepository, InMemoryUserRepository,
};

/// Session cookie settings.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub cookie_secure: bool,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub categories: Arc<CategoryService>,
    pub users: Arc<UserService>,
    pub session: SessionSettings,
}

/// The four repositories the services are wired from.
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            categories: Arc::new(InMemoryCategoryRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
        }
    }

    /// Postgres repositories when configured and reachable, in-memory otherwise.
    pub async fn connect(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            use inkwell_infra::database::connect;
            use inkwell_infra::{
                PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
                PostgresUserRepository,
            };

            let Some(config) = db_config else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                return Self::in_memory();
            };

            match connect(config).await {
                Ok(conn) => Self {
                    posts: Arc::new(PostgresPostRepository::new(conn.clone())),
                    users: Arc::new(PostgresUserRepository::new(conn.clone())),
                    categories: Arc::new(PostgresCategoryRepository::new(conn.clone())),
                    comments: Arc::new(PostgresCommentRepository::new(conn)),
                },
                Err(e) => {
                    tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
                    Self::in_memory()
                }
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Self::in_memory()
        }
    }
}

impl AppState {
    pub fn new(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        store: Arc<dyn ObjectStore>,
        session: SessionSettings,
    ) -> Self {
        let state = Self {
            posts: Arc::new(PostService::new(
                repos.posts.clone(),
                repos.categories.clone(),
                store.clone(),
            )),
            comments: Arc::new(CommentService::new(
                repos.comments,
                repos.posts,
                repos.users.clone(),
            )),
            categories: Arc::new(CategoryService::new(repos.categories.clone())),
            users: Arc::new(UserService::new(
                repos.users,
                repos.categories,
                passwords,
                store,
            )),
            session,
        };
        tracing::info!("Application state initialized");
        state
    }

    /// Fully in-memory state around the given store.
    #[cfg(test)]
    pub fn in_memory(store: Arc<dyn ObjectStore>) -> Self {
        Self::new(
            Repositories::in_memory(),
            Arc::new(Argon2PasswordService::new()),
            store,
            SessionSettings {
                cookie_secure: false,
            },
        )
    }
}

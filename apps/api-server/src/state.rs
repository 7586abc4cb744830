//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{PostRepository, TokenService, UserRepository};
use quill_core::services::{AccountService, PostService};
use quill_infra::{
    AmmoniaSanitizer, Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository,
    JwtTokenService, LocalCoverStorage,
};

#[cfg(feature = "postgres")]
use quill_infra::{PostgresPostRepository, PostgresUserRepository, database::connect};

use crate::config::AppConfig;
use crate::middleware::session::SessionCookies;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub posts: PostService,
    pub tokens: Arc<dyn TokenService>,
    pub sessions: SessionCookies,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build the application state, connecting to Postgres when configured.
    pub async fn new(config: &AppConfig) -> Self {
        let (users, posts) = Self::repositories(config).await;
        let state = Self::with_repositories(config, users, posts);

        tracing::info!("Application state initialized");
        state
    }

    /// State backed by in-memory repositories.
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::with_repositories(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
        )
    }

    /// Wire services around the given repositories.
    pub fn with_repositories(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
    ) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let sessions = SessionCookies::new(&config.session, tokens.expiration_seconds());

        let accounts = AccountService::new(
            users.clone(),
            Arc::new(Argon2PasswordService::new()),
            tokens.clone(),
        );
        let posts = PostService::new(
            posts,
            users,
            Arc::new(AmmoniaSanitizer),
            Arc::new(LocalCoverStorage::new(&config.upload_dir)),
        );

        Self {
            accounts,
            posts,
            tokens,
            sessions,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryPostRepository::new()),
            );
        };

        match connect(db_config).await {
            Ok(conn) => {
                let conn = Arc::new(conn);
                (
                    Arc::new(PostgresUserRepository::shared(conn.clone())),
                    Arc::new(PostgresPostRepository::shared(conn)),
                )
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                (
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryPostRepository::new()),
                )
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        (
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryPostRepository::new()),
        )
    }
}

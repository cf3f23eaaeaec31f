//! Application Startup
//!
//! Wiring of storage, cache and media backends into the shared state, and
//! server initialization.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{
    AuthServiceImpl, CommentServiceImpl, FeedServiceImpl, FollowServiceImpl, PostServiceImpl,
};
use crate::config::{CacheBackend, MediaBackend, Settings, StorageBackend};
use crate::domain::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};
use crate::infrastructure::cache::{self, MemoryPageCache, PageCache, RedisPageCache};
use crate::infrastructure::database;
use crate::infrastructure::media::{LocalMediaStore, MediaStore, MemoryMediaStore};
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::repositories::{
    PgCommentRepository, PgFollowRepository, PgGroupRepository, PgPostRepository,
    PgUserRepository,
};
use crate::presentation::http::routes;
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub page_cache: Arc<dyn PageCache>,
    pub media: Arc<dyn MediaStore>,
    /// Present only with the Postgres backend; used by the readiness check.
    pub db: Option<PgPool>,
    pub snowflake: Arc<SnowflakeGenerator>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Connect the backends selected in `settings`.
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        let mut state = Self::in_memory(settings.clone());

        if settings.storage.backend == StorageBackend::Postgres {
            let db = database::create_pool(&settings.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            tracing::info!("Database connection pool created");

            if settings.database.run_migrations {
                database::run_migrations(&db)
                    .await
                    .context("failed to run migrations")?;
                tracing::info!("Database migrations applied");
            }

            state.users = Arc::new(PgUserRepository::new(db.clone()));
            state.groups = Arc::new(PgGroupRepository::new(db.clone()));
            state.posts = Arc::new(PgPostRepository::new(db.clone()));
            state.comments = Arc::new(PgCommentRepository::new(db.clone()));
            state.follows = Arc::new(PgFollowRepository::new(db.clone()));
            state.db = Some(db);
        }

        if settings.cache.backend == CacheBackend::Redis {
            let conn = cache::create_redis_client(&settings.redis)
                .await
                .context("failed to connect to Redis")?;
            state.page_cache = Arc::new(RedisPageCache::new(conn, settings.cache.key_prefix.clone()));
        }

        if settings.media.backend == MediaBackend::Local {
            state.media = Arc::new(LocalMediaStore::new(&settings.media.root));
            tracing::info!(root = %settings.media.root, "Serving media from local directory");
        }

        Ok(state)
    }

    /// State backed entirely by process memory, whatever `settings` selects.
    pub fn in_memory(settings: Settings) -> Self {
        let store = Arc::new(MemoryStore::new());
        let snowflake = Arc::new(SnowflakeGenerator::with_epoch(
            settings.snowflake.epoch,
            u64::from(settings.snowflake.machine_id),
            0,
        ));

        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            follows: store,
            page_cache: Arc::new(MemoryPageCache::new()),
            media: Arc::new(MemoryMediaStore::new()),
            db: None,
            snowflake,
            settings: Arc::new(settings),
        }
    }

    pub fn auth_service(&self) -> AuthServiceImpl {
        AuthServiceImpl::new(
            self.users.clone(),
            self.snowflake.clone(),
            self.settings.auth.clone(),
        )
    }

    pub fn post_service(&self) -> PostServiceImpl {
        PostServiceImpl::new(
            self.posts.clone(),
            self.groups.clone(),
            self.comments.clone(),
            self.media.clone(),
            self.snowflake.clone(),
        )
    }

    pub fn feed_service(&self) -> FeedServiceImpl {
        FeedServiceImpl::new(
            self.posts.clone(),
            self.groups.clone(),
            self.users.clone(),
            self.follows.clone(),
            self.settings.posts.page_size,
        )
    }

    pub fn comment_service(&self) -> CommentServiceImpl {
        CommentServiceImpl::new(
            self.comments.clone(),
            self.posts.clone(),
            self.snowflake.clone(),
        )
    }

    pub fn follow_service(&self) -> FollowServiceImpl {
        FollowServiceImpl::new(self.follows.clone(), self.users.clone())
    }

    /// Lifetime of a cached main-feed page.
    pub fn index_ttl(&self) -> Duration {
        Duration::from_secs(self.settings.cache.index_ttl_secs)
    }
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        let addr = settings.server_addr();
        let state = AppState::from_settings(settings).await?;
        let router = routes::create_router(state);

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

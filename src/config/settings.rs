//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// Redis configuration
    pub redis: RedisSettings,

    /// Which repository backend serves the data model
    pub storage: StorageSettings,

    /// Page cache configuration
    pub cache: CacheSettings,

    /// Uploaded image storage
    pub media: MediaSettings,

    /// Session cookie authentication settings
    pub auth: AuthSettings,

    /// Feed and post presentation settings
    pub posts: PostSettings,

    /// Snowflake ID generator settings
    pub snowflake: SnowflakeSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    #[serde(default)]
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply pending migrations on startup
    pub run_migrations: bool,
}

/// Redis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    /// Redis connection URL
    #[serde(default)]
    pub url: String,
}

/// Repository backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
}

/// Page cache backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Redis,
}

/// Page cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    pub backend: CacheBackend,

    /// How long the rendered main feed stays cached, in seconds
    pub index_ttl_secs: u64,

    /// Prefix for every page cache key
    pub key_prefix: String,
}

/// Media backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaBackend {
    Local,
    Memory,
}

/// Uploaded image storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    pub backend: MediaBackend,

    /// Directory uploads are written under when `backend = "local"`
    pub root: String,

    /// Largest accepted multipart body in bytes
    pub max_upload_bytes: usize,
}

/// Session authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Secret key for signing session tokens
    pub secret: String,

    /// Session lifetime in minutes
    pub session_ttl_minutes: i64,

    /// Mark the session cookie `Secure`
    pub secure_cookie: bool,
}

/// Feed and post presentation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PostSettings {
    /// Number of posts on one feed page
    pub page_size: u32,

    /// Characters kept when a post is shown in its short form
    pub truncate_text_length: usize,
}

/// Snowflake ID generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Machine/worker ID (0-31)
    pub machine_id: u16,

    /// Custom epoch timestamp in milliseconds
    pub epoch: u64,
}

/// Minimum required length for the session signing secret (256 bits = 32 bytes)
pub const MIN_AUTH_SECRET_LENGTH: usize = 32;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the values fail validation.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("storage.backend", "postgres")?
            .set_default("cache.backend", "memory")?
            .set_default("cache.index_ttl_secs", 20)?
            .set_default("cache.key_prefix", "yatube:page")?
            .set_default("media.backend", "local")?
            .set_default("media.root", "media")?
            .set_default("media.max_upload_bytes", 5_i64 * 1024 * 1024)?
            .set_default("auth.session_ttl_minutes", 60 * 24 * 14)?
            .set_default("auth.secure_cookie", false)?
            .set_default("posts.page_size", 10)?
            .set_default("posts.truncate_text_length", 15)?
            .set_default("snowflake.machine_id", 1)?
            .set_default("snowflake.epoch", 1420070400000_u64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__POSTS__PAGE_SIZE=20 -> posts.page_size = 20
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option("auth.secret", std::env::var("JWT_SECRET").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                settings.validate()?;
                Ok(settings)
            })
    }

    /// Check cross-field constraints the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.secret.len() < MIN_AUTH_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "auth secret must be at least {} characters. Current length: {}",
                MIN_AUTH_SECRET_LENGTH,
                self.auth.secret.len()
            )));
        }
        if self.posts.page_size == 0 {
            return Err(ConfigError::Message("posts.page_size must be positive".into()));
        }
        if self.storage.backend == StorageBackend::Postgres && self.database.url.is_empty() {
            return Err(ConfigError::Message(
                "database.url (DATABASE_URL) is required for the postgres backend".into(),
            ));
        }
        if self.cache.backend == CacheBackend::Redis && self.redis.url.is_empty() {
            return Err(ConfigError::Message(
                "redis.url (REDIS_URL) is required for the redis cache backend".into(),
            ));
        }
        Ok(())
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Self-contained settings: in-memory storage, cache and media.
    ///
    /// Used by tests and local demos that should not need Postgres or Redis.
    pub fn in_memory() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 0,
            },
            database: DatabaseSettings {
                url: String::new(),
                max_connections: 1,
                min_connections: 0,
                acquire_timeout: 5,
                run_migrations: false,
            },
            redis: RedisSettings { url: String::new() },
            storage: StorageSettings {
                backend: StorageBackend::Memory,
            },
            cache: CacheSettings {
                backend: CacheBackend::Memory,
                index_ttl_secs: 20,
                key_prefix: "yatube:page".into(),
            },
            media: MediaSettings {
                backend: MediaBackend::Memory,
                root: "media".into(),
                max_upload_bytes: 5 * 1024 * 1024,
            },
            auth: AuthSettings {
                secret: "in-memory-session-secret-0123456789abcdef".into(),
                session_ttl_minutes: 60,
                secure_cookie: false,
            },
            posts: PostSettings {
                page_size: 10,
                truncate_text_length: 15,
            },
            snowflake: SnowflakeSettings {
                machine_id: 1,
                epoch: 1420070400000,
            },
            environment: "test".into(),
        }
    }
}

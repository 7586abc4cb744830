//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

#[cfg(feature = "postgres")]
use quill_infra::DatabaseConfig;
use quill_infra::JwtConfig;

const DEV_COOKIE_SECRET: &str = "change-me-cookie-secret";

/// Session cookie settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key material for signing the `token` cookie.
    pub cookie_secret: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_secret: DEV_COOKIE_SECRET.to_string(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub session: SessionConfig,
    /// Origin allowed to make credentialed cross-site requests.
    pub client_url: String,
    /// Root of the `/public` static mount.
    pub public_dir: PathBuf,
    /// Where covers are written; normally inside `public_dir`.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 10000,
            #[cfg(feature = "postgres")]
            database: None,
            jwt: JwtConfig::default(),
            session: SessionConfig::default(),
            client_url: "http://localhost:3000".to_string(),
            public_dir: PathBuf::from("public"),
            upload_dir: PathBuf::from("public/uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parsed("DB_MIN_CONNECTIONS").unwrap_or(2),
        });

        let cookie_secret = env::var("COOKIE_SECRET").unwrap_or(defaults.session.cookie_secret);
        if cookie_secret == DEV_COOKIE_SECRET {
            tracing::warn!("Using default cookie secret. Set COOKIE_SECRET for production use.");
        }

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT").unwrap_or(defaults.port),
            #[cfg(feature = "postgres")]
            database,
            jwt: JwtConfig::from_env(),
            session: SessionConfig { cookie_secret },
            client_url: env::var("CLIENT_URL").unwrap_or(defaults.client_url),
            public_dir: env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES").unwrap_or(defaults.max_upload_bytes),
        }
    }
}

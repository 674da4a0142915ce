//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use quill_infra::JwtConfig;
use quill_infra::database::DatabaseConfig;

#[cfg(feature = "rate-limit")]
use quill_infra::RateLimitConfig;

#[cfg(feature = "smtp")]
use quill_infra::SmtpConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL used in links sent by email, without a trailing slash.
    pub public_url: String,
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations at startup.
    pub run_migrations: bool,
    pub jwt: JwtConfig,
    pub reset_token_ttl: Duration,
    #[cfg(feature = "rate-limit")]
    pub login_rate_limit: RateLimitConfig,
    #[cfg(feature = "smtp")]
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let public_url = env::var("PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://{host}:{port}"))
            .trim_end_matches('/')
            .to_string();

        let reset_minutes = env::var("RESET_TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60);

        Self {
            public_url,
            database: DatabaseConfig::from_env(),
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            jwt: JwtConfig::from_env(),
            reset_token_ttl: Duration::from_secs(reset_minutes * 60),
            #[cfg(feature = "rate-limit")]
            login_rate_limit: RateLimitConfig::from_env(),
            #[cfg(feature = "smtp")]
            smtp: SmtpConfig::from_env(),
            host,
            port,
        }
    }
}

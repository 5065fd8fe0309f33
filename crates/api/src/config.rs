use std::time::Duration;

use crowdsense_core::rating::AggregateMode;
use crowdsense_db::PoolSettings;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Database pool limits.
    pub pool: PoolSettings,
    /// How multi-category submissions fold into a space's rating.
    pub aggregate_mode: AggregateMode,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `8080`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `DB_MAX_CONNECTIONS`      | `20`                    |
    /// | `DB_ACQUIRE_TIMEOUT_SECS` | `2`                     |
    /// | `DB_IDLE_TIMEOUT_SECS`    | `30`                    |
    /// | `FEEDBACK_AGGREGATE_MODE` | `per_entry`             |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values; misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_or("PORT", "8080")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let defaults = PoolSettings::default();
        let pool = PoolSettings {
            max_connections: env_or("DB_MAX_CONNECTIONS", &defaults.max_connections.to_string())
                .parse()
                .expect("DB_MAX_CONNECTIONS must be a valid u32"),
            acquire_timeout: Duration::from_secs(
                env_or(
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    &defaults.acquire_timeout.as_secs().to_string(),
                )
                .parse()
                .expect("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64"),
            ),
            idle_timeout: Duration::from_secs(
                env_or("DB_IDLE_TIMEOUT_SECS", &defaults.idle_timeout.as_secs().to_string())
                    .parse()
                    .expect("DB_IDLE_TIMEOUT_SECS must be a valid u64"),
            ),
        };

        let aggregate_mode: AggregateMode = env_or("FEEDBACK_AGGREGATE_MODE", "per_entry")
            .parse()
            .unwrap_or_else(|e| panic!("FEEDBACK_AGGREGATE_MODE: {e}"));

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            pool,
            aggregate_mode,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

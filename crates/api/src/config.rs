use rats_genai::GenAiConfig;

use crate::auth::jwt::JwtConfig;
use crate::social::SocialConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to stop after the server drains (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Generative-AI client configuration.
    pub genai: GenAiConfig,
    /// OAuth client credentials per social platform.
    pub social: SocialConfig,
    /// Secret used to encrypt linked-account tokens at rest.
    pub token_encryption_key: String,
    /// Tick interval of the reminder scheduler and post dispatcher (default: `300`).
    pub reminder_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                       |
    /// | `TOKEN_ENCRYPTION_KEY`   | **required**               |
    /// | `REMINDER_INTERVAL_SECS` | `300`                      |
    ///
    /// # Panics
    ///
    /// Panics on malformed numbers or a missing `TOKEN_ENCRYPTION_KEY`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let token_encryption_key = std::env::var("TOKEN_ENCRYPTION_KEY")
            .expect("TOKEN_ENCRYPTION_KEY must be set in the environment");
        assert!(
            !token_encryption_key.is_empty(),
            "TOKEN_ENCRYPTION_KEY must not be empty"
        );

        let reminder_interval_secs: u64 = std::env::var("REMINDER_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REMINDER_INTERVAL_SECS must be a valid u64");
        assert!(
            reminder_interval_secs > 0,
            "REMINDER_INTERVAL_SECS must be greater than zero"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            genai: GenAiConfig::from_env(),
            social: SocialConfig::from_env(),
            token_encryption_key,
            reminder_interval_secs,
        }
    }
}

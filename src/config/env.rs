// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;

const DEFAULT_JWT_SECRET: &str = "domicare-dev-secret-change-me";

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string
    /// Format: sqlite://path/to/file.db?mode=rwc
    pub database_url: String,

    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 5000)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Secret used to sign access tokens (HS256)
    pub jwt_secret: String,

    /// Access token lifetime in hours
    pub jwt_expiration_hours: i64,

    /// Stripe secret key; empty means payments are simulated
    pub stripe_secret_key: String,

    /// Stripe REST endpoint
    pub stripe_api_base: String,

    /// ISO currency used for payment intents
    pub payment_currency: String,

    /// Root directory for uploaded documents
    pub upload_dir: String,

    /// Maximum decoded size of an uploaded document
    pub max_upload_bytes: usize,

    /// Allowed login attempts per e-mail and per minute
    pub login_attempts_per_minute: u32,

    /// Maximum connections in database pool
    pub db_max_connections: u32,

    /// Connection timeout in seconds
    pub db_connection_timeout: u64,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://domicare.db?mode=rwc".to_string()),

            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),

            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),

            stripe_secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),

            stripe_api_base: env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com/v1".to_string()),

            payment_currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "eur".to_string()),

            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),

            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|_| "5242880".to_string())
                .parse()
                .unwrap_or(5 * 1024 * 1024),

            login_attempts_per_minute: env::var("LOGIN_ATTEMPTS_PER_MINUTE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            db_connection_timeout: env::var("DB_CONNECTION_TIMEOUT")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_empty() {
            return Err("DATABASE_URL is required".to_string());
        }

        if self.jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        if self.is_production() && self.jwt_secret == DEFAULT_JWT_SECRET {
            return Err("JWT_SECRET must be set in production".to_string());
        }

        if self.stripe_secret_key.is_empty() {
            log::warn!("STRIPE_SECRET_KEY not configured - payments are simulated");
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether real Stripe calls are made
    pub fn stripe_enabled(&self) -> bool {
        !self.stripe_secret_key.is_empty()
    }

    /// JSON body limit: base64 uploads are a third larger than the file
    pub fn json_body_limit(&self) -> usize {
        self.max_upload_bytes / 3 * 4 + 64 * 1024
    }
}

#[cfg(test)]
impl Config {
    /// Configuration used by unit and handler tests
    pub fn for_tests() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            server_address: "127.0.0.1".to_string(),
            server_port: 0,
            environment: "test".to_string(),
            log_level: "warn".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 1,
            stripe_secret_key: String::new(),
            stripe_api_base: "http://localhost:12111/v1".to_string(),
            payment_currency: "eur".to_string(),
            upload_dir: std::env::temp_dir()
                .join(format!("domicare-test-{}", uuid::Uuid::new_v4()))
                .to_string_lossy()
                .into_owned(),
            max_upload_bytes: 1024,
            login_attempts_per_minute: 3,
            db_max_connections: 1,
            db_connection_timeout: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_rejects_default_secret() {
        let mut config = Config::for_tests();
        config.environment = "production".to_string();
        config.jwt_secret = DEFAULT_JWT_SECRET.to_string();
        assert!(config.validate().is_err());

        config.jwt_secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_database_url_is_rejected() {
        let mut config = Config::for_tests();
        config.database_url = String::new();
        assert_eq!(
            config.validate(),
            Err("DATABASE_URL is required".to_string())
        );
    }
}

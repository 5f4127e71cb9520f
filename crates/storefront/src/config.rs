//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CATALOG_REFRESH_SECS` - Catalog reload interval (default: 60)
//! - `GEMINI_API_KEY` - Enables the design workshop when set
//! - `GEMINI_TEXT_MODEL` - Concept model (default: gemini-3-flash-preview)
//! - `GEMINI_IMAGE_MODEL` - Image model (default: gemini-3-pro-image-preview)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` / `SENTRY_TRACES_SAMPLE_RATE` - Sampling (defaults 1.0 / 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;

use rosa_studio_core::env;
pub use rosa_studio_core::env::ConfigError;

pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-3-pro-image-preview";

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    /// Public base URL, without a trailing slash
    pub base_url: String,
    pub session_secret: SecretString,
    /// How often the catalog is reloaded from the database
    pub catalog_refresh: Duration,
    /// Design workshop; `None` disables it
    pub gemini: Option<GeminiConfig>,
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Gemini API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    pub text_model: String,
    pub image_model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"[REDACTED]")
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables, reading `.env` first
    /// when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or the session secret looks weak.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let refresh_secs: u64 = env::parsed("CATALOG_REFRESH_SECS", "60")?;
        if refresh_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_REFRESH_SECS".to_string(),
                "must be a positive number of seconds".to_string(),
            ));
        }

        Ok(Self {
            database_url: env::database_url(&["STOREFRONT_DATABASE_URL"])?,
            host: env::parsed("STOREFRONT_HOST", "127.0.0.1")?,
            port: env::parsed("STOREFRONT_PORT", "3000")?,
            base_url: env::base_url("STOREFRONT_BASE_URL")?,
            session_secret: env::session_secret("STOREFRONT_SESSION_SECRET")?,
            catalog_refresh: Duration::from_secs(refresh_secs),
            gemini: GeminiConfig::from_env(),
            sentry_dsn: env::optional("SENTRY_DSN"),
            sentry_environment: env::optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env::rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env::rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl GeminiConfig {
    /// `None` when no key is set; the workshop is then disabled.
    fn from_env() -> Option<Self> {
        let api_key = env::optional("GEMINI_API_KEY").filter(|k| !k.trim().is_empty())?;
        Some(Self {
            api_key: SecretString::from(api_key),
            text_model: env::or_default("GEMINI_TEXT_MODEL", DEFAULT_TEXT_MODEL),
            image_model: env::or_default("GEMINI_IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            catalog_refresh: Duration::from_secs(60),
            gemini: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure_follows_scheme() {
        let mut config = config();
        assert!(!config.is_secure());
        config.base_url = "https://rosa.studio".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_gemini_config_debug_redacts_key() {
        let gemini = GeminiConfig {
            api_key: SecretString::from("AIzaSuperSecretKey"),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        };
        let debug_output = format!("{gemini:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains(DEFAULT_TEXT_MODEL));
        assert!(!debug_output.contains("AIzaSuperSecretKey"));
    }
}

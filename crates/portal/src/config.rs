//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PLATFORM_URL` - Base URL of the hosted platform
//! - `PLATFORM_ANON_KEY` - Project API key sent on every request
//! - `PLATFORM_SERVICE_KEY` - Service-role key for table writes
//!
//! ## Optional
//! - `PORTAL_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTAL_PORT` - Listen port (default: 3000)
//! - `PORTAL_BASE_URL` - Public URL (default: http://localhost:3000)
//! - `PORTAL_BOOTSTRAP_CPF` - Digits of the reserved administrator CPF
//!   (default: 236616)
//! - `PORTAL_LOGIN_EMAIL_DOMAIN` - Domain of the synthetic login address
//!   (default: temmaissaude.com)
//! - `PORTAL_CONTENT_DIR` - Plan catalog directory
//!   (default: crates/portal/content)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Minimum accepted length for platform keys.
const MIN_KEY_LENGTH: usize = 16;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Portal application configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the portal
    pub base_url: String,
    /// Hosted platform configuration
    pub platform: PlatformConfig,
    /// Digits of the reserved bootstrap administrator CPF
    pub bootstrap_cpf: String,
    /// Domain appended to CPF digits to form the synthetic login email
    pub login_email_domain: String,
    /// Directory holding the plan catalog
    pub content_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Hosted platform configuration.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct PlatformConfig {
    /// Base URL of the platform, with a trailing slash
    pub base_url: Url,
    /// Project API key (safe to expose to browsers)
    pub anon_key: String,
    /// Service-role key (server-side only)
    pub service_key: SecretString,
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("base_url", &self.base_url.as_str())
            .field("anon_key", &self.anon_key)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the service key fails placeholder/length validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("PORTAL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTAL_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("PORTAL_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORTAL_PORT".to_owned(), e.to_string()))?;
        let base_url = get_env_or_default("PORTAL_BASE_URL", "http://localhost:3000");

        let platform = PlatformConfig::from_env()?;

        let bootstrap_cpf = get_env_or_default("PORTAL_BOOTSTRAP_CPF", "236616");
        if !bootstrap_cpf.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar(
                "PORTAL_BOOTSTRAP_CPF".to_owned(),
                "must contain digits only".to_owned(),
            ));
        }

        let login_email_domain =
            get_env_or_default("PORTAL_LOGIN_EMAIL_DOMAIN", "temmaissaude.com");
        let content_dir =
            PathBuf::from(get_env_or_default("PORTAL_CONTENT_DIR", "crates/portal/content"));

        Ok(Self {
            host,
            port,
            base_url,
            platform,
            bootstrap_cpf,
            login_email_domain,
            content_dir,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PlatformConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_url = get_required_env("PLATFORM_URL")?;
        let base_url = parse_base_url(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("PLATFORM_URL".to_owned(), e))?;

        Ok(Self {
            base_url,
            anon_key: get_required_env("PLATFORM_ANON_KEY")?,
            service_key: get_validated_secret("PLATFORM_SERVICE_KEY")?,
        })
    }
}

/// Parse and normalize the platform base URL to end with a slash, so joining
/// relative endpoint paths keeps the full path.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let normalized = if raw.ends_with('/') {
        raw.to_owned()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| e.to_string())
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Validate that a secret is not a placeholder and is long enough.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_owned(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    if secret.len() < MIN_KEY_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
            format!(
                "must be at least {MIN_KEY_LENGTH} characters (got {})",
                secret.len()
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

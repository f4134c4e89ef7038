//! Error types for the platform gateway.

use thiserror::Error;

/// Errors that can occur when talking to the platform.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed before a platform response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform rejected the request.
    #[error("platform error ({code}): {message}")]
    Api {
        /// Error code reported by the platform.
        code: String,
        /// Error message.
        message: String,
    },

    /// The credential pair did not match an identity.
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// A unique constraint was violated (Postgres code 23505).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A platform response could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),

    /// The change feed broke mid-stream.
    #[error("stream error: {0}")]
    Stream(String),
}

/// Error body returned by the platform's table endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct RestErrorBody {
    /// Postgres-style error code (`23505` for unique violations).
    #[serde(default)]
    pub code: Option<String>,
    /// Error message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned by the platform's auth endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct AuthErrorBody {
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

impl AuthErrorBody {
    /// The most specific message the body carries.
    #[must_use]
    pub fn message(&self) -> String {
        self.error_description
            .clone()
            .or_else(|| self.msg.clone())
            .unwrap_or_else(|| "unknown auth error".to_owned())
    }
}

/// Postgres unique-constraint violation code.
pub const UNIQUE_VIOLATION: &str = "23505";

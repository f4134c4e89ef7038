//! HTTP implementation of the platform gateway.
//!
//! Speaks the platform's hosted-auth and table REST endpoints plus the
//! server-sent-event change feed. All requests carry the project `apikey`
//! header and a bearer token for the portal's service role.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use cotador_core::{AccountStatus, UserId};

use crate::config::PlatformConfig;
use crate::models::User;

use super::error::{AuthErrorBody, GatewayError, RestErrorBody, UNIQUE_VIOLATION};
use super::feed;
use super::{AuthIdentity, AuthSession, ChangeFeed, Gateway, NewUser, UserRecord};

/// Phrase the platform's auth endpoint uses for a credential mismatch.
const INVALID_CREDENTIALS_MARKER: &str = "Invalid login credentials";

/// HTTP gateway to the hosted platform.
#[derive(Clone)]
pub struct PlatformGateway {
    inner: Arc<PlatformGatewayInner>,
}

struct PlatformGatewayInner {
    client: reqwest::Client,
    base_url: Url,
}

impl PlatformGateway {
    /// Create a new gateway from the platform configuration.
    ///
    /// # Panics
    ///
    /// Panics if the service key contains invalid header characters.
    #[must_use]
    pub fn new(config: &PlatformConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.anon_key).expect("invalid apikey for header"),
        );
        headers.insert(
            reqwest::header::AUTHORIZATION,
            bearer(&config.service_key),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("failed to build HTTP client");

        Self {
            inner: Arc::new(PlatformGatewayInner {
                client,
                base_url: config.base_url.clone(),
            }),
        }
    }

    /// Resolve a path against the platform base URL.
    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| GatewayError::Parse(format!("invalid endpoint {path}: {e}")))
    }

    /// Turn a non-success auth response into the matching error variant.
    async fn auth_error(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed: AuthErrorBody = serde_json::from_str(&body).unwrap_or(AuthErrorBody {
            error_description: None,
            msg: Some(body),
            error_code: None,
        });

        let message = parsed.message();
        if message.contains(INVALID_CREDENTIALS_MARKER) {
            return GatewayError::InvalidCredentials;
        }

        GatewayError::Api {
            code: parsed
                .error_code
                .unwrap_or_else(|| status.as_u16().to_string()),
            message,
        }
    }

    /// Turn a non-success table response into the matching error variant.
    async fn rest_error(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed: RestErrorBody = serde_json::from_str(&body).unwrap_or(RestErrorBody {
            code: None,
            message: None,
        });

        let message = parsed.message.unwrap_or(body);
        match parsed.code {
            Some(code) if code == UNIQUE_VIOLATION => GatewayError::Conflict(message),
            Some(code) => GatewayError::Api { code, message },
            None if status == StatusCode::CONFLICT => GatewayError::Conflict(message),
            None => GatewayError::Api {
                code: status.as_u16().to_string(),
                message,
            },
        }
    }
}

fn bearer(key: &SecretString) -> HeaderValue {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", key.expose_secret()))
        .expect("invalid service key for header");
    value.set_sensitive(true);
    value
}

#[derive(Debug, serde::Deserialize)]
struct IdentityResponse {
    id: uuid::Uuid,
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    user: IdentityResponse,
}

#[derive(Debug, serde::Serialize)]
struct CredentialPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[async_trait]
impl Gateway for PlatformGateway {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthIdentity, GatewayError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("auth/v1/signup")?)
            .json(&CredentialPayload { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::auth_error(response).await);
        }

        let identity: IdentityResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("sign-up response: {e}")))?;

        Ok(AuthIdentity {
            id: UserId::new(identity.id),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, GatewayError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.set_query(Some("grant_type=password"));

        let response = self
            .inner
            .client
            .post(url)
            .json(&CredentialPayload { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::auth_error(response).await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("sign-in response: {e}")))?;

        Ok(AuthSession {
            user_id: UserId::new(token.user.id),
            access_token: SecretString::from(token.access_token),
        })
    }

    async fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("rest/v1/users")?)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rest_error(response).await);
        }

        let records: Vec<UserRecord> = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("users rows: {e}")))?;

        records.into_iter().map(UserRecord::into_user).collect()
    }

    async fn insert_user(&self, user: &NewUser) -> Result<(), GatewayError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("rest/v1/users")?)
            .header("Prefer", "return=minimal")
            .json(user)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rest_error(response).await);
        }

        Ok(())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, GatewayError> {
        let filter = format!("eq.{id}");
        let response = self
            .inner
            .client
            .get(self.endpoint("rest/v1/users")?)
            .query(&[("select", "*"), ("id", filter.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rest_error(response).await);
        }

        let records: Vec<UserRecord> = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("users rows: {e}")))?;

        records
            .into_iter()
            .next()
            .map(UserRecord::into_user)
            .transpose()
    }

    async fn update_status(
        &self,
        id: UserId,
        status: AccountStatus,
    ) -> Result<(), GatewayError> {
        let filter = format!("eq.{id}");
        let response = self
            .inner
            .client
            .patch(self.endpoint("rest/v1/users")?)
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rest_error(response).await);
        }

        Ok(())
    }

    async fn subscribe(&self) -> Result<ChangeFeed, GatewayError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("realtime/v1/users")?)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rest_error(response).await);
        }

        Ok(ChangeFeed::new(feed::events(response)))
    }
}

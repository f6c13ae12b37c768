//! Data source behind the dashboard: mock literals or the REST backend.
//!
//! ARCHITECTURE
//! ============
//! Route handlers talk to `DataSource` only. In mock mode it answers from
//! `services::mock`; in proxy mode every call goes through `ApiClient`, so
//! session rejection is handled in one place and surfaces here as
//! `Fetched::SessionEnded`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::api_client::{ApiClient, ApiError, ApiOutcome};
use super::logout::SessionEnd;
use super::{mock, session};
use crate::config::LoginField;

/// Message used whenever the backend gives no better one.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("backend returned status {0}")]
    Status(u16),
    #[error("backend response parse failed: {0}")]
    Decode(String),
}

/// Read-only collections the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    Proofs,
    Statistics,
}

impl Resource {
    /// Path on the backend, also the suffix of the local `/api/...` route.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Users => "/users",
            Self::Proofs => "/proofs",
            Self::Statistics => "/statistics",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Proofs => "proofs",
            Self::Statistics => "statistics",
        }
    }

    fn mock(self) -> Value {
        match self {
            Self::Users => mock::users(),
            Self::Proofs => mock::proofs(),
            Self::Statistics => mock::statistics(),
        }
    }
}

/// Either data, or a session that the backend has just ended.
#[derive(Debug)]
pub enum Fetched<T> {
    Ready(T),
    SessionEnded(SessionEnd),
}

/// Backend answer relayed without interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct Passthrough {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl Passthrough {
    fn json(status: StatusCode, value: &Value) -> Result<Self, DataError> {
        let body = serde_json::to_vec(value).map_err(|e| DataError::Decode(e.to_string()))?;
        Ok(Self {
            status,
            content_type: Some(HeaderValue::from_static("application/json")),
            body: Bytes::from(body),
        })
    }

    /// Decode the body as JSON. An empty body is `null`.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Decode` if the body is not JSON.
    pub fn decode(&self) -> Result<Value, DataError> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&self.body).map_err(|e| DataError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Minimal identity echoed back after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted { token: String, user: UserIdentity },
    Rejected { message: String },
}

#[derive(Clone)]
pub enum DataSource {
    Mock,
    Proxy { client: Arc<ApiClient>, login_field: LoginField },
}

impl DataSource {
    #[must_use]
    pub fn is_mock(&self) -> bool {
        matches!(self, Self::Mock)
    }

    /// Fetch a collection, relaying the backend status, content type and
    /// body bytes as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable.
    pub async fn fetch(&self, resource: Resource, token: Option<&str>) -> Result<Fetched<Passthrough>, DataError> {
        let client = match self {
            Self::Mock => return Ok(Fetched::Ready(Passthrough::json(StatusCode::OK, &resource.mock())?)),
            Self::Proxy { client, .. } => client,
        };

        match client.get(resource.path(), token).await? {
            ApiOutcome::SessionEnded(end) => Ok(Fetched::SessionEnded(end)),
            ApiOutcome::Response(response) => {
                let status = response.status();
                let content_type = response.headers().get(CONTENT_TYPE).cloned();
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| DataError::Api(ApiError::Transport(e.to_string())))?;
                Ok(Fetched::Ready(Passthrough { status, content_type, body }))
            }
        }
    }

    /// Fetch a collection for display; non-2xx becomes `DataError::Status`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport, decode, or non-success status.
    pub async fn load(&self, resource: Resource, token: Option<&str>) -> Result<Fetched<Value>, DataError> {
        match self.fetch(resource, token).await? {
            Fetched::SessionEnded(end) => Ok(Fetched::SessionEnded(end)),
            Fetched::Ready(pass) if pass.status.is_success() => Ok(Fetched::Ready(pass.decode()?)),
            Fetched::Ready(pass) => Err(DataError::Status(pass.status.as_u16())),
        }
    }

    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or a successful response
    /// carries no token.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, DataError> {
        match self {
            Self::Mock => Ok(mock_login(request)),
            Self::Proxy { client, login_field } => proxy_login(client, *login_field, request).await,
        }
    }
}

fn mock_login(request: &LoginRequest) -> LoginOutcome {
    let admin = &mock::ADMIN_ACCOUNT;
    if request.email == admin.email && request.password == admin.password {
        return LoginOutcome::Accepted {
            token: session::generate_token(),
            user: UserIdentity {
                email: admin.email.to_owned(),
                name: Some(admin.name.to_owned()),
                role: Some(admin.role.to_owned()),
            },
        };
    }
    LoginOutcome::Rejected { message: INVALID_CREDENTIALS.to_owned() }
}

async fn proxy_login(client: &ApiClient, field: LoginField, request: &LoginRequest) -> Result<LoginOutcome, DataError> {
    let mut payload = serde_json::Map::new();
    payload.insert(field.as_str().to_owned(), json!(request.email));
    payload.insert("password".to_owned(), json!(request.password));

    let response = client
        .post_public("/auth/login", &Value::Object(payload))
        .await?;
    let status = response.status();
    // Error bodies are optional; an unreadable one just means no message.
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        tracing::info!(status = status.as_u16(), "backend refused login");
        return Ok(LoginOutcome::Rejected { message: error_message(&body) });
    }

    let token = ["access_token", "token"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DataError::Decode("login response has no access token".to_owned()))?;

    Ok(LoginOutcome::Accepted {
        token: token.to_owned(),
        user: UserIdentity { email: request.email.clone(), name: None, role: None },
    })
}

/// Pull a human-readable message out of a backend error payload.
#[must_use]
pub fn error_message(body: &Value) -> String {
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(INVALID_CREDENTIALS)
        .to_owned()
}

#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;

//! Authenticated backend client.
//!
//! ARCHITECTURE
//! ============
//! Thin decorator over `reqwest`: attaches the bearer token and JSON content
//! type, then checks the response status against the configured rejection
//! set. A rejected call never reaches the caller as an error. The client
//! runs the logout slot and returns `ApiOutcome::SessionEnded` so the caller
//! can clear the cookie and redirect.
//!
//! Every other response, including 4xx/5xx outside the rejection set, is
//! handed back untouched. No retries, no caching.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use super::logout::{LogoutSlot, SessionEnd};
use crate::config::{BackendTimeouts, RejectionPolicy};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, timeout, TLS).
    #[error("backend request failed: {0}")]
    Transport(String),
}

/// What the caller gets back from an authenticated call.
#[derive(Debug)]
pub enum ApiOutcome {
    /// The backend answered with a status outside the rejection set.
    Response(reqwest::Response),
    /// The backend rejected the session; the logout slot has already run.
    SessionEnded(SessionEnd),
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    rejection: RejectionPolicy,
    logout: Arc<LogoutSlot>,
}

impl ApiClient {
    /// Build a client for `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(
        base_url: impl Into<String>,
        timeouts: BackendTimeouts,
        rejection: RejectionPolicy,
        logout: Arc<LogoutSlot>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { http, base_url, rejection, logout })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path such as `/users`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Send an authenticated request.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if no response was received.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiOutcome, ApiError> {
        let url = self.url(path);
        let response = self.dispatch(method, &url, token, body).await?;

        let status = response.status();
        if self.rejection.is_rejection(status) {
            tracing::warn!(status = status.as_u16(), %url, "backend rejected session");
            let end = self.logout.invoke().await;
            return Ok(ApiOutcome::SessionEnded(end));
        }

        Ok(ApiOutcome::Response(response))
    }

    /// `GET` with the bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if no response was received.
    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<ApiOutcome, ApiError> {
        self.send(Method::GET, path, token, None).await
    }

    /// `POST` without a credential and without rejection handling.
    ///
    /// Used for the login exchange, where 401 means bad credentials rather
    /// than an expired session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if no response was received.
    pub async fn post_public(&self, path: &str, body: &serde_json::Value) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path);
        self.dispatch(Method::POST, &url, None, Some(body))
            .await
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))
    }
}

#[cfg(test)]
#[path = "api_client_test.rs"]
mod tests;

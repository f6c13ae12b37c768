//! JSON passthrough of backend collections.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use super::auth::cookie_token;
use crate::services::backend::{Fetched, Resource};
use crate::services::session::cleared_credential_cookie;
use crate::state::AppState;

pub async fn users(State(state): State<AppState>, jar: CookieJar) -> Response {
    passthrough(&state, &jar, Resource::Users).await
}

pub async fn proofs(State(state): State<AppState>, jar: CookieJar) -> Response {
    passthrough(&state, &jar, Resource::Proofs).await
}

pub async fn statistics(State(state): State<AppState>, jar: CookieJar) -> Response {
    passthrough(&state, &jar, Resource::Statistics).await
}

/// Relay status, content type and body bytes unchanged. A rejected session
/// clears the cookie and answers 401; a transport failure is a 502.
async fn passthrough(state: &AppState, jar: &CookieJar, resource: Resource) -> Response {
    let token = cookie_token(jar);
    match state.data.fetch(resource, token.as_deref()).await {
        Ok(Fetched::Ready(pass)) => {
            let mut response = (pass.status, pass.body).into_response();
            match pass.content_type {
                Some(content_type) => response.headers_mut().insert(CONTENT_TYPE, content_type),
                None => response.headers_mut().remove(CONTENT_TYPE),
            };
            response
        }
        Ok(Fetched::SessionEnded(_)) => {
            let jar = CookieJar::new().add(cleared_credential_cookie(state.config.cookie_secure));
            (StatusCode::UNAUTHORIZED, jar, Json(json!({ "error": "Unauthorized" }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, resource = resource.label(), "backend fetch failed");
            let message = format!("Failed to fetch {}", resource.label());
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": message }))).into_response()
        }
    }
}

#[cfg(test)]
#[path = "data_test.rs"]
mod tests;

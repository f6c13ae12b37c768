//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API, the server-rendered dashboard pages and
//! static assets under a single Axum router. The session gate wraps every
//! route except `/healthz`, which is merged in after the gate layer.
//!
//! Assembling the router is also where the dashboard shell registers its
//! logout handler, so a backend rejection seen by the API client ends in a
//! redirect to login with the "session expired" notice.

pub mod auth;
pub mod data;
pub mod pages;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum_extra::extract::cookie::CookieJar;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::gate::{self, LOGIN_PATH};
use crate::services::logout::{LogoutHandler, Notice, SessionEnd};
use crate::services::session::cleared_credential_cookie;
use crate::state::AppState;

/// Handler the dashboard shell registers: back to login, with a notice.
struct SessionExpiredLogout;

#[async_trait::async_trait]
impl LogoutHandler for SessionExpiredLogout {
    async fn logout(&self) -> SessionEnd {
        tracing::info!("backend rejected session; logging out");
        SessionEnd { redirect_to: LOGIN_PATH, notice: Some(Notice::SessionExpired) }
    }
}

/// Full dashboard app: pages, JSON API and static assets behind the gate.
pub fn app(state: AppState) -> Router {
    tracing::debug!(replacing = state.logout.is_registered(), "registering logout handler");
    state.logout.register(Arc::new(SessionExpiredLogout));

    let static_dir = state.config.static_dir.clone();

    Router::new()
        .route("/", get(pages::to_landing))
        .route("/dashboard", get(pages::to_landing))
        .route("/dashboard/statistics", get(pages::statistics))
        .route("/dashboard/users", get(pages::users))
        .route("/dashboard/proofs", get(pages::proofs))
        .route("/login", get(auth::login_page).post(auth::login_form))
        .route("/logout", post(auth::logout_form))
        .route("/api/auth/login", post(auth::login_api))
        .route("/api/auth/logout", post(auth::logout_api))
        .route("/api/users", get(data::users))
        .route("/api/proofs", get(data::proofs))
        .route("/api/statistics", get(data::statistics))
        .route("/favicon.ico", get(favicon))
        .nest_service("/static", ServeDir::new(&static_dir))
        .nest_service("/images", ServeDir::new(static_dir.join("images")))
        .layer(middleware::from_fn_with_state(state.clone(), gate::session_gate))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}

/// Clear the credential cookie and follow a `SessionEnd`.
pub(crate) fn end_session(end: &SessionEnd, cookie_secure: bool) -> Response {
    let jar = CookieJar::new().add(cleared_credential_cookie(cookie_secure));
    (jar, Redirect::temporary(&end.location())).into_response()
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

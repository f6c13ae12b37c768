//! Auth routes: credential exchange and logout, as JSON and as HTML forms.

use axum::Form;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::json;

use crate::gate::{LANDING_PATH, LOGIN_PATH};
use crate::render;
use crate::services::backend::{LoginOutcome, LoginRequest};
use crate::services::logout::Notice;
use crate::services::session::{CREDENTIAL_COOKIE, cleared_credential_cookie, credential_cookie};
use crate::state::AppState;

/// Bearer token from the credential cookie, if any.
pub(crate) fn cookie_token(jar: &CookieJar) -> Option<String> {
    jar.get(CREDENTIAL_COOKIE)
        .map(Cookie::value)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

// =============================================================================
// JSON API
// =============================================================================

/// `POST /api/auth/login`: exchange credentials, set the cookie, echo the user.
pub async fn login_api(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> Response {
    match state.data.login(&body).await {
        Ok(LoginOutcome::Accepted { token, user }) => {
            tracing::info!(email = %user.email, "login accepted");
            let jar = CookieJar::new().add(credential_cookie(token.clone(), state.config.cookie_secure));
            (jar, Json(json!({ "user": user, "token": token }))).into_response()
        }
        Ok(LoginOutcome::Rejected { message }) => {
            tracing::info!(email = %body.email, "login rejected");
            (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "login exchange failed");
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": "Login service unavailable" }))).into_response()
        }
    }
}

/// `POST /api/auth/logout`: clear the cookie.
pub async fn logout_api(State(state): State<AppState>) -> Response {
    let jar = CookieJar::new().add(cleared_credential_cookie(state.config.cookie_secure));
    (jar, StatusCode::NO_CONTENT).into_response()
}

// =============================================================================
// HTML FORMS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginQuery {
    notice: Option<String>,
}

/// `GET /login`: the sign-in form, with a notice when the session ended.
pub async fn login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let notice = query.notice.as_deref().and_then(Notice::from_query);
    Html(render::login_page("", None, notice))
}

/// `POST /login`: form login; redirects to the landing page on success.
pub async fn login_form(State(state): State<AppState>, Form(form): Form<LoginRequest>) -> Response {
    match state.data.login(&form).await {
        Ok(LoginOutcome::Accepted { token, user }) => {
            tracing::info!(email = %user.email, "login accepted");
            let jar = CookieJar::new().add(credential_cookie(token, state.config.cookie_secure));
            (jar, Redirect::to(LANDING_PATH)).into_response()
        }
        Ok(LoginOutcome::Rejected { .. }) => {
            tracing::info!(email = %form.email, "login rejected");
            (StatusCode::UNAUTHORIZED, Html(render::login_page(&form.email, Some(render::LOGIN_FAILED), None))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "login exchange failed");
            (StatusCode::BAD_GATEWAY, Html(render::login_page(&form.email, Some(render::LOGIN_UNAVAILABLE), None))).into_response()
        }
    }
}

/// `POST /logout`: sidebar logout button.
pub async fn logout_form(State(state): State<AppState>) -> Response {
    let jar = CookieJar::new().add(cleared_credential_cookie(state.config.cookie_secure));
    (jar, Redirect::to(LOGIN_PATH)).into_response()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

//! Session gate: request-time guard in front of every page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs as the outermost middleware on the dashboard router. It looks only
//! at the request path and the `auth-token` cookie; it never calls the
//! backend. Whether a token is actually valid is decided by the backend on
//! the next API call, which ends the session through the logout slot.
//!
//! DESIGN
//! ======
//! `decide` is a pure function over (path, credential) so the decision table
//! can be tested without HTTP. The middleware wraps it with cookie parsing
//! and redirect construction.
//!
//! Tokens that decode as JWTs are checked for expiry only. Signatures are
//! never verified here; opaque tokens count as present.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, Validation};

use crate::services::session::{CREDENTIAL_COOKIE, cleared_credential_cookie};
use crate::state::AppState;

/// The only public page.
pub const LOGIN_PATH: &str = "/login";

/// Where authenticated users land after login.
pub const LANDING_PATH: &str = "/dashboard/statistics";

/// Path namespaces the gate never intercepts: the backend proxy, static
/// assets, images and the favicon.
pub const EXCLUDED_PREFIXES: &[&str] = &["/api", "/static", "/images", "/favicon.ico"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Continue,
    RedirectToLogin,
    RedirectToLanding,
}

/// What the gate learned from the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    Absent,
    Present,
    /// A JWT whose `exp` has passed. Treated as absent, and cleared.
    Expired,
}

impl Credential {
    #[must_use]
    pub fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

/// `true` when `path` lies in one of the excluded namespaces.
///
/// Matching is per path segment: `/api` and `/api/users` are excluded,
/// `/apiary` is not.
#[must_use]
pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

#[must_use]
pub fn is_public(path: &str) -> bool {
    path == LOGIN_PATH
}

/// Classify a raw cookie value.
#[must_use]
pub fn classify_credential(raw: Option<&str>, verify_expiry: bool) -> Credential {
    let Some(token) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Credential::Absent;
    };
    if verify_expiry && token_expired(token) {
        return Credential::Expired;
    }
    Credential::Present
}

/// The gate's decision table for a non-excluded path.
#[must_use]
pub fn decide(path: &str, credential: Credential) -> GateDecision {
    match (credential.is_present(), is_public(path)) {
        (false, false) => GateDecision::RedirectToLogin,
        (true, true) => GateDecision::RedirectToLanding,
        _ => GateDecision::Continue,
    }
}

/// Expiry-only JWT check. Anything that is not a decodable JWT is not expired.
fn token_expired(token: &str) -> bool {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_aud = false;
    validation.leeway = 0;

    match jsonwebtoken::decode::<serde_json::Value>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(_) => false,
        Err(e) => matches!(e.kind(), ErrorKind::ExpiredSignature),
    }
}

/// Redirect that keeps GET and HEAD as they are and turns anything else
/// into a GET of `target` (303), so form posts are never replayed.
pub(crate) fn redirect(method: &Method, target: &str) -> Response {
    if *method == Method::GET || *method == Method::HEAD {
        Redirect::temporary(target).into_response()
    } else {
        Redirect::to(target).into_response()
    }
}

/// Axum middleware applying the gate to every request.
pub async fn session_gate(State(state): State<AppState>, jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let method = request.method().clone();
    if is_excluded(&path) {
        return next.run(request).await;
    }

    let raw = jar.get(CREDENTIAL_COOKIE).map(Cookie::value);
    let credential = classify_credential(raw, state.config.verify_token_expiry);

    let decision = decide(&path, credential);
    tracing::debug!(%method, %path, ?credential, ?decision, "session gate");

    let response = match decision {
        GateDecision::Continue => next.run(request).await,
        GateDecision::RedirectToLogin => redirect(&method, LOGIN_PATH),
        GateDecision::RedirectToLanding => redirect(&method, LANDING_PATH),
    };

    if credential == Credential::Expired {
        tracing::info!(%path, "expired session cookie cleared");
        let jar = CookieJar::new().add(cleared_credential_cookie(state.config.cookie_secure));
        return (jar, response).into_response();
    }
    response
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;

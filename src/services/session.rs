//! Session credential cookie and mock token issuance.
//!
//! The credential is opaque to this server: it is minted by the backend (or
//! by the mock login), stored in an HttpOnly cookie and forwarded as a bearer
//! token. Nothing here decodes it.

use std::fmt::Write;

use axum_extra::extract::cookie::{Cookie, SameSite};
use rand::Rng;
use time::Duration;

/// Cookie carrying the bearer token.
pub const CREDENTIAL_COOKIE: &str = "auth-token";

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a random 32-byte hex token for mock sessions.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Cookie that stores `token` for the whole site.
#[must_use]
pub fn credential_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((CREDENTIAL_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Expired, empty cookie that removes the credential from the browser.
#[must_use]
pub fn cleared_credential_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((CREDENTIAL_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

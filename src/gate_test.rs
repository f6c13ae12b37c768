use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};

use super::*;

fn jwt_with_exp(exp: u64) -> String {
    let claims = serde_json::json!({ "sub": "admin", "exp": exp });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"backend-secret")).unwrap()
}

// =============================================================================
// decide: the decision table
// =============================================================================

#[test]
fn missing_credential_on_protected_path_redirects_to_login() {
    for path in ["/", "/dashboard", "/dashboard/users", "/dashboard/proofs", "/settings", "/login/extra"] {
        assert_eq!(decide(path, Credential::Absent), GateDecision::RedirectToLogin, "path {path}");
    }
}

#[test]
fn missing_credential_on_login_continues() {
    assert_eq!(decide(LOGIN_PATH, Credential::Absent), GateDecision::Continue);
}

#[test]
fn present_credential_on_protected_path_continues() {
    assert_eq!(decide("/dashboard/users", Credential::Present), GateDecision::Continue);
}

#[test]
fn present_credential_on_login_redirects_to_landing() {
    assert_eq!(decide(LOGIN_PATH, Credential::Present), GateDecision::RedirectToLanding);
}

#[test]
fn expired_credential_behaves_like_absent() {
    assert_eq!(decide("/dashboard/users", Credential::Expired), GateDecision::RedirectToLogin);
    assert_eq!(decide(LOGIN_PATH, Credential::Expired), GateDecision::Continue);
}

// =============================================================================
// is_excluded / is_public
// =============================================================================

#[test]
fn excluded_namespaces() {
    for path in [
        "/api",
        "/api/users",
        "/api/auth/login",
        "/static/dashboard.css",
        "/images/logo.png",
        "/favicon.ico",
    ] {
        assert!(is_excluded(path), "expected {path} excluded");
    }
}

#[test]
fn non_excluded_paths() {
    for path in ["/", "/login", "/dashboard/users", "/apiary", "/images-old", "/staticky"] {
        assert!(!is_excluded(path), "expected {path} gated");
    }
}

#[test]
fn only_exact_login_is_public() {
    assert!(is_public("/login"));
    assert!(!is_public("/login/"));
    assert!(!is_public("/Login"));
    assert!(!is_public("/dashboard/statistics"));
}

// =============================================================================
// classify_credential
// =============================================================================

#[test]
fn absent_and_blank_cookies_are_absent() {
    assert_eq!(classify_credential(None, true), Credential::Absent);
    assert_eq!(classify_credential(Some(""), true), Credential::Absent);
    assert_eq!(classify_credential(Some("   "), true), Credential::Absent);
}

#[test]
fn opaque_token_is_present() {
    assert_eq!(classify_credential(Some("abc123"), true), Credential::Present);
    assert_eq!(classify_credential(Some("mock-jwt-token"), true), Credential::Present);
}

#[test]
fn unexpired_jwt_is_present() {
    let token = jwt_with_exp(get_current_timestamp() + 3600);
    assert_eq!(classify_credential(Some(&token), true), Credential::Present);
}

#[test]
fn expired_jwt_is_expired() {
    let token = jwt_with_exp(get_current_timestamp() - 3600);
    assert_eq!(classify_credential(Some(&token), true), Credential::Expired);
}

#[test]
fn jwt_expired_seconds_ago_is_expired() {
    let token = jwt_with_exp(get_current_timestamp() - 5);
    assert_eq!(classify_credential(Some(&token), true), Credential::Expired);
}

#[test]
fn expired_jwt_is_present_when_verification_disabled() {
    let token = jwt_with_exp(get_current_timestamp() - 3600);
    assert_eq!(classify_credential(Some(&token), false), Credential::Present);
}

#[test]
fn jwt_without_exp_is_present() {
    let claims = serde_json::json!({ "sub": "admin" });
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"k")).unwrap();
    assert_eq!(classify_credential(Some(&token), true), Credential::Present);
}

// =============================================================================
// redirect
// =============================================================================

#[test]
fn get_and_head_redirects_are_temporary() {
    for method in [Method::GET, Method::HEAD] {
        let response = redirect(&method, LOGIN_PATH);
        assert_eq!(response.status(), axum::http::StatusCode::TEMPORARY_REDIRECT, "method {method}");
        assert_eq!(response.headers()[axum::http::header::LOCATION], LOGIN_PATH);
    }
}

#[test]
fn other_methods_redirect_with_see_other() {
    for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        let response = redirect(&method, LANDING_PATH);
        assert_eq!(response.status(), axum::http::StatusCode::SEE_OTHER, "method {method}");
        assert_eq!(response.headers()[axum::http::header::LOCATION], LANDING_PATH);
    }
}

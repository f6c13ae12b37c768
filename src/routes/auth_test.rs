use reqwest::header::{COOKIE, LOCATION, SET_COOKIE};
use serde_json::Value;

use super::*;
use crate::config::RejectionPolicy;
use crate::routes::app;
use crate::state::test_helpers::{no_redirect_client, spawn_server, test_app_state, test_proxy_state};

async fn spawn_app() -> String {
    spawn_server(app(test_app_state())).await
}

fn set_cookie(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

// =============================================================================
// cookie_token
// =============================================================================

#[test]
fn cookie_token_trims_and_drops_empty() {
    let jar = CookieJar::new().add(Cookie::new(CREDENTIAL_COOKIE, " abc "));
    assert_eq!(cookie_token(&jar).as_deref(), Some("abc"));

    let jar = CookieJar::new().add(Cookie::new(CREDENTIAL_COOKIE, "  "));
    assert_eq!(cookie_token(&jar), None);
    assert_eq!(cookie_token(&CookieJar::new()), None);
}

// =============================================================================
// POST /api/auth/login
// =============================================================================

#[tokio::test]
async fn api_login_accepts_mock_admin() {
    let base = spawn_app().await;
    let response = no_redirect_client()
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": "admin@example.com", "password": "admin123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie(&response);
    assert!(cookie.starts_with("auth-token="));
    assert!(cookie.contains("HttpOnly"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user"]["email"], "admin@example.com");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn api_login_rejects_wrong_password() {
    let base = spawn_app().await;
    let response = no_redirect_client()
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": "admin@example.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&response).is_empty());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid credentials" }));
}

#[tokio::test]
async fn api_login_with_unreachable_backend_is_bad_gateway() {
    let state = test_proxy_state("http://127.0.0.1:9", RejectionPolicy::default());
    let base = spawn_server(app(state)).await;
    let response = no_redirect_client()
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": "a@example.com", "password": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn api_logout_clears_cookie() {
    let base = spawn_app().await;
    let response = no_redirect_client()
        .post(format!("{base}/api/auth/logout"))
        .header(COOKIE, "auth-token=abc123")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(set_cookie(&response).contains("Max-Age=0"));
}

// =============================================================================
// HTML forms
// =============================================================================

#[tokio::test]
async fn form_login_redirects_to_landing_with_cookie() {
    let base = spawn_app().await;
    let response = no_redirect_client()
        .post(format!("{base}/login"))
        .form(&[("email", "admin@example.com"), ("password", "admin123")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[LOCATION], "/dashboard/statistics");
    assert!(set_cookie(&response).starts_with("auth-token="));
}

#[tokio::test]
async fn form_login_failure_rerenders_with_message() {
    let base = spawn_app().await;
    let response = no_redirect_client()
        .post(format!("{base}/login"))
        .form(&[("email", "admin@example.com"), ("password", "nope")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let html = response.text().await.unwrap();
    assert!(html.contains("Invalid credentials. Please try again."));
    assert!(html.contains(r#"value="admin@example.com""#));
}

#[tokio::test]
async fn form_login_with_unreachable_backend_says_unavailable() {
    let state = test_proxy_state("http://127.0.0.1:9", RejectionPolicy::default());
    let base = spawn_server(app(state)).await;
    let response = no_redirect_client()
        .post(format!("{base}/login"))
        .form(&[("email", "a@example.com"), ("password", "x")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let html = response.text().await.unwrap();
    assert!(html.contains(render::LOGIN_UNAVAILABLE));
    assert!(!html.contains("Invalid credentials"));
    assert!(html.contains(r#"value="a@example.com""#));
}

#[tokio::test]
async fn login_page_shows_session_expired_notice() {
    let base = spawn_app().await;
    let response = no_redirect_client()
        .get(format!("{base}/login?notice=session-expired"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Your session has expired. Please log in again."));
}

#[tokio::test]
async fn login_page_ignores_unknown_notice() {
    let base = spawn_app().await;
    let html = no_redirect_client()
        .get(format!("{base}/login?notice=bogus"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!html.contains("session has expired"));
}

#[tokio::test]
async fn form_logout_clears_cookie_and_redirects() {
    let base = spawn_app().await;
    let response = no_redirect_client()
        .post(format!("{base}/logout"))
        .header(COOKIE, "auth-token=abc123")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[LOCATION], "/login");
    assert!(set_cookie(&response).contains("Max-Age=0"));
}

// =============================================================================
// Gate redirects on form posts (browser follows them)
// =============================================================================

#[tokio::test]
async fn logout_without_cookie_lands_on_login_form() {
    let base = spawn_app().await;
    let response = reqwest::Client::new().post(format!("{base}/logout")).send().await.unwrap();
    assert_eq!(response.url().path(), "/login");
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(!html.contains("Invalid credentials"));
}

#[tokio::test]
async fn logout_without_cookie_is_see_other() {
    let base = spawn_app().await;
    let response = no_redirect_client().post(format!("{base}/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/login");
}

#[tokio::test]
async fn form_login_with_live_cookie_lands_on_dashboard() {
    let base = spawn_app().await;
    let response = reqwest::Client::new()
        .post(format!("{base}/login"))
        .header(COOKIE, "auth-token=abc123")
        .form(&[("email", "admin@example.com"), ("password", "admin123")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.url().path(), "/dashboard/statistics");
    assert_eq!(response.status(), StatusCode::OK);
}

//! Dashboard pages: statistics, users and proofs.
//!
//! Each page loads its collection through the data source with the cookie
//! token. A session the backend has ended turns into the logout redirect;
//! any other failure renders the page with an inline error and no data.

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::Value;

use super::auth::cookie_token;
use super::end_session;
use crate::gate::LANDING_PATH;
use crate::render;
use crate::services::backend::{Fetched, Resource};
use crate::services::records::{Proof, User, filter_proofs, filter_users, parse_list};
use crate::services::statistics::Statistics;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    search: String,
}

/// `GET /` and `GET /dashboard`.
pub async fn to_landing() -> Redirect {
    Redirect::temporary(LANDING_PATH)
}

enum Loaded {
    Data(Value),
    Ended(Response),
    Failed(String),
}

async fn load(state: &AppState, jar: &CookieJar, resource: Resource) -> Loaded {
    let token = cookie_token(jar);
    match state.data.load(resource, token.as_deref()).await {
        Ok(Fetched::Ready(value)) => Loaded::Data(value),
        Ok(Fetched::SessionEnded(end)) => Loaded::Ended(end_session(&end, state.config.cookie_secure)),
        Err(e) => {
            tracing::warn!(error = %e, resource = resource.label(), "page data unavailable");
            Loaded::Failed(format!("Failed to fetch {}", resource.label()))
        }
    }
}

/// `GET /dashboard/users?search=q`
pub async fn users(State(state): State<AppState>, jar: CookieJar, Query(query): Query<SearchQuery>) -> Response {
    match load(&state, &jar, Resource::Users).await {
        Loaded::Data(value) => {
            let users: Vec<User> = parse_list(value);
            Html(render::users_page(&filter_users(&users, &query.search), &query.search)).into_response()
        }
        Loaded::Ended(response) => response,
        Loaded::Failed(message) => Html(render::failed_page("Users", "/dashboard/users", &message)).into_response(),
    }
}

/// `GET /dashboard/proofs?search=q`
pub async fn proofs(State(state): State<AppState>, jar: CookieJar, Query(query): Query<SearchQuery>) -> Response {
    match load(&state, &jar, Resource::Proofs).await {
        Loaded::Data(value) => {
            let proofs: Vec<Proof> = parse_list(value);
            Html(render::proofs_page(&filter_proofs(&proofs, &query.search), &query.search)).into_response()
        }
        Loaded::Ended(response) => response,
        Loaded::Failed(message) => Html(render::failed_page("Proofs", "/dashboard/proofs", &message)).into_response(),
    }
}

/// `GET /dashboard/statistics`
pub async fn statistics(State(state): State<AppState>, jar: CookieJar) -> Response {
    const TITLE: &str = "Statistics";
    const ACTIVE: &str = "/dashboard/statistics";

    match load(&state, &jar, Resource::Statistics).await {
        Loaded::Data(value) => match serde_json::from_value::<Statistics>(value) {
            Ok(stats) => Html(render::statistics_page(&stats)).into_response(),
            Err(e) => {
                tracing::warn!(error = %e, "statistics payload did not decode");
                Html(render::failed_page(TITLE, ACTIVE, "Failed to fetch statistics")).into_response()
            }
        },
        Loaded::Ended(response) => response,
        Loaded::Failed(message) => Html(render::failed_page(TITLE, ACTIVE, &message)).into_response(),
    }
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;

//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers and the session gate via the
//! `State` extractor. It holds the parsed config, the data source and the
//! logout slot the dashboard shell registers into. Clone is required by
//! Axum; every field is `Arc`-wrapped or cheap to clone.

use std::sync::Arc;

use crate::config::{BackendMode, DashboardConfig};
use crate::services::api_client::{ApiClient, ApiError};
use crate::services::backend::DataSource;
use crate::services::logout::LogoutSlot;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub data: DataSource,
    pub logout: Arc<LogoutSlot>,
}

impl AppState {
    #[must_use]
    pub fn new(config: DashboardConfig, data: DataSource, logout: Arc<LogoutSlot>) -> Self {
        Self { config: Arc::new(config), data, logout }
    }

    /// Compose state from config: one logout slot, shared with the API
    /// client when proxying.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be built.
    pub fn from_config(config: DashboardConfig) -> Result<Self, ApiError> {
        let logout = Arc::new(LogoutSlot::new());
        let data = match &config.backend {
            BackendMode::Mock => DataSource::Mock,
            BackendMode::Proxy { base_url } => {
                let client = ApiClient::new(
                    base_url.clone(),
                    config.timeouts,
                    config.rejection.clone(),
                    Arc::clone(&logout),
                )?;
                tracing::debug!(base_url = client.base_url(), "backend client ready");
                DataSource::Proxy { client: Arc::new(client), login_field: config.login_field }
            }
        };
        Ok(Self::new(config, data, logout))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::config::{BackendTimeouts, LoginField, RejectionPolicy};

    /// Config with mock backend and defaults suitable for tests.
    #[must_use]
    pub fn test_config() -> DashboardConfig {
        DashboardConfig {
            port: 0,
            backend: BackendMode::Mock,
            login_field: LoginField::Email,
            rejection: RejectionPolicy::default(),
            timeouts: BackendTimeouts { request_secs: 5, connect_secs: 2 },
            cookie_secure: false,
            verify_token_expiry: true,
            static_dir: std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
        }
    }

    /// `AppState` over the mock data source.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::from_config(test_config()).expect("mock state never builds a client")
    }

    /// `AppState` proxying to `base_url`.
    #[must_use]
    pub fn test_proxy_state(base_url: &str, rejection: RejectionPolicy) -> AppState {
        let config = DashboardConfig {
            backend: BackendMode::Proxy { base_url: base_url.to_owned() },
            rejection,
            ..test_config()
        };
        AppState::from_config(config).expect("client should build")
    }

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub async fn spawn_server(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}")
    }

    /// HTTP client that reports redirects instead of following them.
    #[must_use]
    pub fn no_redirect_client() -> reqwest::Client {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("client should build")
    }
}

mod config;
mod gate;
mod render;
mod routes;
mod services;
mod state;

use config::{BackendMode, DashboardConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = DashboardConfig::from_env().expect("invalid dashboard configuration");
    let port = config.port;
    match &config.backend {
        BackendMode::Mock => tracing::warn!("BACKEND_URL not set; serving mock data"),
        BackendMode::Proxy { base_url } => {
            tracing::info!(%base_url, reject = ?config.rejection.statuses(), "proxying backend");
        }
    }

    let state = state::AppState::from_config(config).expect("backend client init failed");

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "dashboard listening");
    axum::serve(listener, app).await.expect("server failed");
}

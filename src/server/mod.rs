//! Local web UI: routes, shared state and the serve loop.

pub mod browser;
pub mod handlers;

use crate::adapters::LocalStorage;
use crate::config::settings::{default_settings_path, SettingsStore};
use crate::config::{ApiConfig, AppConfig};
use crate::core::client::ApiClient;
use crate::utils::error::Result;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<ApiClient<ApiConfig>>,
    pub settings: Arc<SettingsStore<LocalStorage>>,
}

impl AppState {
    pub fn new(api: ApiConfig, settings: SettingsStore<LocalStorage>) -> Result<Self> {
        Ok(Self {
            client: Arc::new(ApiClient::new(api)?),
            settings: Arc::new(settings),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/save-settings", post(handlers::save_settings))
        .route("/api/get-settings", get(handlers::get_settings))
        .route("/api/test-connection", get(handlers::test_connection))
        .route("/api/sources", get(handlers::sources))
        .route("/api/taxes-fees", get(handlers::taxes_fees))
        .route("/api/rooms", get(handlers::rooms))
        .route("/table", get(handlers::table))
        .route("/export/csv", get(handlers::export_csv))
        .with_state(state)
}

/// Binds the listener, optionally opens the browser, and serves until Ctrl-C.
pub async fn serve(config: AppConfig) -> Result<()> {
    let settings_path = match &config.server.settings_file {
        Some(path) => PathBuf::from(path),
        None => default_settings_path()?,
    };
    tracing::info!("⚙️ Settings file: {}", settings_path.display());

    let state = AppState::new(config.api.clone(), SettingsStore::at_path(settings_path))?;
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    let url = format!("http://{}", local_addr);
    tracing::info!("📊 Serving on {}", url);

    if config.server.open_browser {
        browser::open_after(url, Duration::from_millis(config.server.browser_delay_ms));
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("🛑 Application stopped by user");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
    }
}

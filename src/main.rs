//! RFI Dashboard Backend
//!
//! REST backend for the internal Request-for-Information dashboard: serves
//! the cached Procore RFI snapshot, persists per-RFI notes, triggers the
//! external data exporter and manages the OAuth token bundle.

mod api;
mod auth;
mod config;
mod errors;
mod exporter;
mod models;
mod oauth;
mod pages;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use exporter::Exporter;
use oauth::TokenExchanger;
use store::Store;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub exchanger: Arc<TokenExchanger>,
    pub exporter: Arc<Exporter>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RFI Dashboard Backend");
    tracing::info!("Data directory: {:?}", config.data_dir);
    tracing::info!("Exporter command: {}", config.exporter_cmd);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.refresh_key.is_none() {
        tracing::warn!("No refresh key configured (RFI_REFRESH_KEY). The exporter trigger is unauthenticated!");
    }
    if config.client_id.is_empty() || config.client_secret.is_empty() {
        tracing::warn!(
            "Procore credentials missing (PROCORE_CLIENT_ID / PROCORE_CLIENT_SECRET). Token exchange will fail."
        );
    }

    // Initialize the file store
    let store = Arc::new(Store::new(&config.data_dir));
    store.init().await?;

    match store.load_tokens().await {
        Ok(Some(bundle)) => tracing::info!("Token bundle present (obtained_at {})", bundle.obtained_at),
        Ok(None) => tracing::warn!("No token bundle on disk. Run the manual re-authorization flow before refreshing."),
        Err(e) => tracing::warn!("Could not read token bundle: {}", e),
    }

    // Create application state
    let state = AppState {
        store,
        exchanger: Arc::new(TokenExchanger::new(&config)),
        exporter: Arc::new(Exporter::new(&config.exporter_cmd)),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the refresh key for the auth layer
    let refresh_key = state.config.refresh_key.clone();

    // Exporter trigger, behind the refresh-key guard
    let guarded_routes = Router::new()
        .route("/refresh", post(api::run_exporter))
        .layer(middleware::from_fn(move |req, next| {
            auth::refresh_key_layer(refresh_key.clone(), req, next)
        }));

    // API routes
    let api_routes = Router::new()
        // RFI snapshot and notes
        .route("/rfis", get(api::list_rfis))
        .route("/rfis/{number}/note", put(api::update_note))
        .route("/last-refresh", get(api::last_refresh))
        // Token lifecycle
        .route("/exchange-token", post(api::exchange_token))
        .route("/refresh-tokens", get(api::refresh_tokens_page))
        .merge(guarded_routes);

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

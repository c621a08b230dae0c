mod config;
mod db;
mod error;
mod metrics;
mod models;
mod routes;
mod services;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::{create_pool, run_migrations, PgDocumentStore};
use crate::services::{
    loader::ChannelLoader, playlist_fetcher::HttpPlaylistFetcher, store::DocumentStore,
    views::ViewRegistry,
};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub loader: ChannelLoader,
    pub views: ViewRegistry,
    pub start_time: Instant,
}

/// HTTP routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route("/ready", get(routes::health::ready))
        .route("/live", get(routes::health::live))
        // Category endpoints
        .route("/api/categories", get(routes::categories::list_categories))
        .route(
            "/api/categories/:slug/channels",
            get(routes::categories::get_category_channels),
        )
        // View endpoints
        .route("/api/views", post(routes::views::create_view))
        .route("/api/views/:id", get(routes::views::get_view))
        .route("/api/views/:id/category", put(routes::views::navigate))
        .route("/api/views/:id/search", put(routes::views::search))
        .route("/api/views/:id/reload", post(routes::views::reload))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iptv_directory_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting IPTV Directory Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app_env);

    // Initialize PostgreSQL connection pool
    let pool = create_pool(&config).await?;
    run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    let store: Arc<dyn DocumentStore> = Arc::new(PgDocumentStore::new(pool));

    let fetcher = HttpPlaylistFetcher::new(
        &config.user_agent,
        config.fetch_timeout_ms,
        config.max_playlist_size_mb,
    )?;
    tracing::info!(
        timeout_ms = ?config.fetch_timeout_ms,
        max_mb = config.max_playlist_size_mb,
        "Playlist fetcher initialized"
    );

    let loader = ChannelLoader::new(store.clone(), Arc::new(fetcher));
    let views = ViewRegistry::new(loader.clone(), config.view_capacity);

    // Build application state
    let state = Arc::new(AppState {
        config,
        store,
        loader,
        views,
        start_time: Instant::now(),
    });

    let app = build_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

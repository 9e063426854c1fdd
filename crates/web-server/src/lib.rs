use axum::{routing::get, Router};
use configuration::Settings;
use database::{SalesRepository, SalesStore};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
// Note: Tracing is handled by the binary that calls `run_server`.

pub mod error;
pub mod handlers;
pub mod page;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub repo: SalesRepository,
}

/// Builds the dashboard router around an already opened repository.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/", get(handlers::dashboard_page))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/platforms", get(handlers::get_platforms))
        .route("/api/regions", get(handlers::get_regions))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route(
            "/api/charts/platform-sales.svg",
            get(handlers::get_platform_sales_chart),
        )
        .with_state(Arc::new(state))
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Opens the sales database, serves the dashboard until Ctrl-C, then
/// closes the database.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.server.socket_addr()?;
    let store = SalesStore::open(&settings.database.path)?;
    let repo = SalesRepository::new(store);

    let app = router(AppState { repo: repo.clone() });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Dashboard listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = repo.close() {
        tracing::warn!(error = %e, "Database handle not closed cleanly.");
    }
    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}

mod handlers;
mod state;

pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::AppError;
use crate::query::Catalog;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/tools", get(handlers::list_tools))
        .route("/api/tools/call", post(handlers::call_tool))
        .route("/api/closest", get(handlers::closest))
        .route("/api/statistics", get(handlers::statistics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until the process is stopped. The catalog is geocoded on the first
/// request that needs it.
pub async fn start(addr: SocketAddr, catalog: Catalog) -> Result<(), AppError> {
    let app = build_router(Arc::new(AppState::new(catalog)));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "property finder listening");
    axum::serve(listener, app).await?;
    Ok(())
}

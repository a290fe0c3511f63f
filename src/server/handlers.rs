use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::error::AppError;
use crate::query::{Catalog, FindClosestRequest, StatisticsReport};
use crate::tools::{self, ToolCall, ToolResponse};

use super::state::AppState;

/// Run catalog work off the async runtime; the first access geocodes and
/// sleeps between lookups.
async fn with_catalog<T, F>(state: Arc<AppState>, work: F) -> Result<T, AppError>
where
    F: FnOnce(&mut Catalog) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut catalog = state.catalog()?;
        work(&mut *catalog)
    })
    .await
    .map_err(|err| AppError::Internal(format!("catalog task failed: {}", err)))?
}

// ─── GET /health ─────────────────────────────────────────────────

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

// ─── GET /api/tools ──────────────────────────────────────────────

pub async fn list_tools() -> Json<Value> {
    Json(json!({ "tools": tools::definitions() }))
}

// ─── POST /api/tools/call ────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ToolCallBody {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ToolCallBody>,
) -> Result<Json<ToolResponse>, AppError> {
    let start = Instant::now();
    let call = ToolCall::parse(&body.name, body.arguments.as_ref())?;

    let response = with_catalog(state, move |catalog| tools::invoke(catalog, &call)).await?;

    info!(
        tool = %body.name,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "POST /api/tools/call"
    );
    Ok(Json(response))
}

// ─── GET /api/closest ────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ClosestQuery {
    pub location_type: Option<String>,
    pub max_price: Option<f64>,
    pub min_rooms: Option<f64>,
    /// Drop both bounds instead of falling back to the defaults.
    #[serde(default)]
    pub unfiltered: bool,
}

impl ClosestQuery {
    fn into_request(self) -> Result<FindClosestRequest, AppError> {
        Ok(FindClosestRequest::with_defaults(
            self.location_type.as_deref(),
            self.max_price,
            self.min_rooms,
            self.unfiltered,
        )?)
    }
}

pub async fn closest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClosestQuery>,
) -> Result<Json<Value>, AppError> {
    let start = Instant::now();
    let request = params.into_request()?;

    let report = with_catalog(state, move |catalog| {
        let finder = catalog.finder()?;
        let report = finder.find_closest(&request);
        serde_json::to_value(&report).map_err(|err| AppError::Internal(err.to_string()))
    })
    .await?;

    info!(
        location_type = request.location_type.as_str(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/closest"
    );
    Ok(Json(report))
}

// ─── GET /api/statistics ─────────────────────────────────────────

pub async fn statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatisticsReport>, AppError> {
    let report = with_catalog(state, |catalog| Ok(catalog.finder()?.statistics())).await?;
    Ok(Json(report))
}

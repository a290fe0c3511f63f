use crate::config::ConfigError;
use crate::listing::ListingError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// A caller asked for something that does not exist or sent bad parameters.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
    #[error("unknown location_type '{0}', expected one of: clinic, school, both")]
    UnknownLocationType(String),
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("listing error: {0}")]
    Listings(#[from] ListingError),
    #[error("invalid request: {0}")]
    Request(#[from] RequestError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Request(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Listings(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string(), "code": status.as_u16() }));
        (status, body).into_response()
    }
}

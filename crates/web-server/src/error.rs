use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dashboard::DashboardError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    InvalidRegion(#[from] core_types::CoreError),
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("Dashboard error: {0}")]
    Dashboard(#[from] DashboardError),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRegion(_) | AppError::Dashboard(DashboardError::InvalidRegion(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Database(_) | AppError::Dashboard(DashboardError::StoreUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the client. Store details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidRegion(e) => e.to_string(),
            AppError::Dashboard(DashboardError::InvalidRegion(e)) => e.to_string(),
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                "The sales database is unavailable".to_string()
            }
            // Already logged by the render pass.
            AppError::Dashboard(DashboardError::StoreUnavailable(_)) => {
                "The sales database is unavailable".to_string()
            }
            AppError::Task(join_err) => {
                tracing::error!(error = ?join_err, "Blocking task failed.");
                "An internal error occurred".to_string()
            }
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

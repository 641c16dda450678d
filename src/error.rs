//! Error handling module
//!
//! Provides unified error types and handling for the entire application.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("Database statement timed out after {0:?}")]
    Timeout(Duration),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[schema(value_type = String, example = "VALIDATION_ERROR")]
    pub code: &'static str,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Pool(_)
            | AppError::Timeout(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                ("DATABASE_ERROR", "A database error occurred".to_string())
            }
            AppError::Pool(e) => {
                error!("Pool error: {:?}", e);
                ("DATABASE_ERROR", "A database error occurred".to_string())
            }
            AppError::Timeout(after) => {
                error!("Database statement timed out after {:?}", after);
                ("DATABASE_ERROR", "A database error occurred".to_string())
            }
            AppError::Validation(msg) => ("VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            error: message,
            code,
        });

        (self.status(), body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper function to create a validation error
pub fn validation_error(msg: impl Into<String>) -> AppError {
    AppError::Validation(msg.into())
}

/// Helper function to create a not found error
pub fn not_found_error(msg: impl Into<String>) -> AppError {
    AppError::NotFound(msg.into())
}

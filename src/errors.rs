// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every handler returns Result<_, DomicareError>
/// Each variant maps to an HTTP status code and a stable error code
#[derive(Error, Debug)]
pub enum DomicareError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Payment provider error: {0}")]
    PaymentError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl DomicareError {
    /// Stable machine-readable code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            DomicareError::NotFound(_) => "NOT_FOUND",
            DomicareError::AlreadyExists(_) => "ALREADY_EXISTS",
            DomicareError::DatabaseError(_) => "DATABASE_ERROR",
            DomicareError::InvalidInput(_) => "INVALID_INPUT",
            DomicareError::ValidationError(_) => "VALIDATION_ERROR",
            DomicareError::InvalidTransition { .. } => "INVALID_TRANSITION",
            DomicareError::Unauthorized(_) => "UNAUTHORIZED",
            DomicareError::Forbidden(_) => "FORBIDDEN",
            DomicareError::PaymentError(_) => "PAYMENT_ERROR",
            DomicareError::StorageError(_) => "STORAGE_ERROR",
            DomicareError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            DomicareError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

/// Convert DomicareError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for DomicareError {
    fn error_response(&self) -> HttpResponse {
        // Internal details stay in the logs
        let message = match self {
            DomicareError::DatabaseError(_) | DomicareError::InternalError(_) => {
                "Internal server error".to_string()
            }
            DomicareError::StorageError(_) => "Could not store or read the file".to_string(),
            other => other.to_string(),
        };

        let body = json!({
            "error": {
                "code": self.code(),
                "message": message,
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            DomicareError::NotFound(_) => StatusCode::NOT_FOUND,
            DomicareError::AlreadyExists(_) => StatusCode::CONFLICT,
            DomicareError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DomicareError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomicareError::ValidationError(_) => StatusCode::BAD_REQUEST,
            DomicareError::InvalidTransition { .. } => StatusCode::CONFLICT,
            DomicareError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            DomicareError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomicareError::PaymentError(_) => StatusCode::BAD_GATEWAY,
            DomicareError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DomicareError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            DomicareError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for DomicareError {
    fn from(e: sqlx::Error) -> Self {
        log::error!("Database error: {}", e);
        DomicareError::DatabaseError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for DomicareError {
    fn from(e: validator::ValidationErrors) -> Self {
        DomicareError::ValidationError(e.to_string())
    }
}

/// Render actix extractor failures (bad JSON, bad query string, bad path)
/// in the same JSON envelope as every other error
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    DomicareError::InvalidInput(err.to_string()).into()
}

pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    DomicareError::InvalidInput(err.to_string()).into()
}

pub fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    DomicareError::InvalidInput(err.to_string()).into()
}

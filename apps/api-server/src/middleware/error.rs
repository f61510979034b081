//! Error handling - maps failures to `{"error": ...}` JSON responses.

use std::fmt;
use std::time::Duration;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use leaderboard_core::DomainError;
use leaderboard_shared::ErrorResponse;

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    MethodNotAllowed,
    TooManyRequests { retry_after: Duration },
    /// `reason` is what the client sees; `detail` is only logged.
    Internal { reason: &'static str, detail: String },
}

impl AppError {
    pub fn internal(reason: &'static str, detail: impl fmt::Display) -> Self {
        AppError::Internal {
            reason,
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::TooManyRequests { retry_after } => {
                write!(f, "Too many submissions, retry after {:?}", retry_after)
            }
            AppError::Internal { reason, detail } => write!(f, "{}: {}", reason, detail),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(reason) => {
                HttpResponse::BadRequest().json(ErrorResponse::new(reason.as_str()))
            }
            AppError::MethodNotAllowed => {
                HttpResponse::MethodNotAllowed().json(ErrorResponse::method_not_allowed())
            }
            AppError::TooManyRequests { retry_after } => HttpResponse::TooManyRequests()
                .insert_header(("Retry-After", retry_after_secs(*retry_after).to_string()))
                .json(ErrorResponse::too_many_submissions()),
            AppError::Internal { reason, detail } => {
                tracing::error!(error = %detail, "{}", reason);
                HttpResponse::InternalServerError().json(ErrorResponse::new(*reason))
            }
        }
    }
}

/// Whole seconds, rounded up, never below one.
fn retry_after_secs(wait: Duration) -> u128 {
    wait.as_millis().div_ceil(1000).max(1)
}

// Conversion from submit pipeline errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidPayload | DomainError::InvalidScoreRange => {
                AppError::BadRequest(err.to_string())
            }
            DomainError::RateLimited { retry_after } => AppError::TooManyRequests { retry_after },
            DomainError::Store(e) => AppError::internal("Server error", e),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

//! API error types with structured JSON responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::ai::AiError;
use crate::facilities::FacilityError;
use crate::store::StoreError;

/// Structured error response body for the front end.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Rate limit exceeded")]
    RateLimited { retry_after: u64 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Upstream service failed: {0}")]
    Upstream(String),
    #[error("Upstream service timed out")]
    UpstreamTimeout,
    #[error("AI assistant unavailable")]
    AiUnavailable,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::RateLimited { retry_after } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                format!("Rate limit exceeded. Retry after {retry_after}s"),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Upstream(detail) => {
                tracing::warn!(detail, "Upstream service failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM",
                    "The analysis service could not complete the request. Please try again later."
                        .to_string(),
                )
            }
            ApiError::UpstreamTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "UPSTREAM_TIMEOUT",
                "The analysis service took too long to respond".to_string(),
            ),
            ApiError::AiUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI_UNAVAILABLE",
                "The AI assistant is not configured".to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::RateLimited { retry_after } = &self {
            if let Ok(val) = axum::http::HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert("Retry-After", val);
            }
        }
        response
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::InvalidReminder(e) => ApiError::BadRequest(e.to_string()),
            StoreError::LockPoisoned => ApiError::Internal("store lock poisoned".into()),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::UnsupportedImage(_) | AiError::EmptyMedicationName => {
                ApiError::BadRequest(err.to_string())
            }
            AiError::Timeout(_) => ApiError::UpstreamTimeout,
            AiError::NotConfigured => ApiError::AiUnavailable,
            AiError::Store(e) => e.into(),
            AiError::OllamaConnection(_)
            | AiError::OllamaError { .. }
            | AiError::HttpClient(_)
            | AiError::ResponseParsing(_)
            | AiError::MalformedResponse(_) => ApiError::Upstream(err.to_string()),
        }
    }
}

impl From<FacilityError> for ApiError {
    fn from(err: FacilityError) -> Self {
        match err {
            FacilityError::InvalidCoordinates { .. }
            | FacilityError::InvalidRadius(_)
            | FacilityError::EmptyQuery => ApiError::BadRequest(err.to_string()),
            FacilityError::Timeout(_) => ApiError::UpstreamTimeout,
            _ => ApiError::Upstream(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("blocking task failed: {err}"))
    }
}

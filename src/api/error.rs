//! API error type and its JSON rendering

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::error::TriageError;

/// Where clients are sent when their session is missing or expired
pub const LOGIN_REDIRECT: &str = "/login";

/// API error type that converts to HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    /// Error raised by the service, identity or store layers
    #[error(transparent)]
    Triage(#[from] TriageError),

    /// Body could not be parsed as the expected JSON document
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl ApiError {
    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Triage(err) => match err {
                TriageError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                TriageError::Unauthenticated | TriageError::InvalidCredentials => {
                    StatusCode::UNAUTHORIZED
                }
                TriageError::Forbidden(_) => StatusCode::FORBIDDEN,
                TriageError::NotFound { .. } => StatusCode::NOT_FOUND,
                TriageError::Conflict(_) => StatusCode::CONFLICT,
                TriageError::Persistence(_)
                | TriageError::Io(_)
                | TriageError::Arrow(_)
                | TriageError::Parquet(_) => StatusCode::SERVICE_UNAVAILABLE,
                TriageError::Json(_) | TriageError::Credential(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Machine-readable error code
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedBody(_) => "VALIDATION_ERROR",
            Self::Triage(err) => match err {
                TriageError::Validation { .. } => "VALIDATION_ERROR",
                TriageError::Unauthenticated => "UNAUTHENTICATED",
                TriageError::InvalidCredentials => "INVALID_CREDENTIALS",
                TriageError::Forbidden(_) => "FORBIDDEN",
                TriageError::NotFound { .. } => "NOT_FOUND",
                TriageError::Conflict(_) => "CONFLICT",
                TriageError::Persistence(_)
                | TriageError::Io(_)
                | TriageError::Arrow(_)
                | TriageError::Parquet(_) => "SERVICE_UNAVAILABLE",
                TriageError::Json(_) | TriageError::Credential(_) => "INTERNAL_ERROR",
            },
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Triage(err) if err.is_retryable())
    }

    /// Message shown to clients; server-side failures are not echoed
    fn public_message(&self) -> String {
        match self {
            Self::MalformedBody(_) => self.to_string(),
            Self::Triage(err) => match err {
                TriageError::Validation { message, .. } => message.clone(),
                TriageError::Forbidden(message) | TriageError::Conflict(message) => {
                    message.clone()
                }
                TriageError::Unauthenticated
                | TriageError::InvalidCredentials
                | TriageError::NotFound { .. } => err.to_string(),
                _ if err.is_retryable() => {
                    "Storage is temporarily unavailable, please try again".to_string()
                }
                _ => "Internal error".to_string(),
            },
        }
    }
}

/// JSON error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Field that failed validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Whether the same request may be retried unchanged
    pub retryable: bool,
    /// Page the client should navigate to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("API error: {self}");
        } else {
            log::debug!("API error: {self}");
        }

        let field = match &self {
            Self::Triage(TriageError::Validation { field, .. }) => Some(field.clone()),
            _ => None,
        };
        let redirect = match &self {
            Self::Triage(TriageError::Unauthenticated) => Some(LOGIN_REDIRECT),
            _ => None,
        };

        let body = ErrorResponse {
            code: self.error_code(),
            message: self.public_message(),
            field,
            retryable: self.retryable(),
            redirect,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

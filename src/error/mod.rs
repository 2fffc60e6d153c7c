//! Error handling for the triage service.
//!
//! The rule evaluator itself never fails; these errors belong to the
//! orchestration boundary (validation, persistence, identity).

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for triage operations
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    /// A required field is missing or malformed
    #[error("Validation error on `{field}`: {message}")]
    Validation {
        /// Name of the offending field
        field: String,
        /// Human readable explanation
        message: String,
    },

    /// No valid session for the caller
    #[error("Authentication required")]
    Unauthenticated,

    /// Credentials were supplied but did not match any account
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The caller is authenticated but may not perform the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Requested entity does not exist (or is not visible to the caller)
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. "PatientRecord"
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// Uniqueness constraint violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The record store could not complete the operation
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Error opening or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error converting records to or from Arrow
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error reading or writing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error serializing or deserializing JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Credential hashing failure
    #[error("Credential error: {0}")]
    Credential(String),
}

impl TriageError {
    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not found error for a patient record
    #[must_use]
    pub fn record_not_found(id: u64) -> Self {
        Self::NotFound {
            entity: "PatientRecord",
            id: id.to_string(),
        }
    }

    /// Create a persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Whether the client may retry the same request unchanged
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::Io(_) | Self::Arrow(_) | Self::Parquet(_)
        )
    }
}

/// Result type for triage operations
pub type Result<T> = std::result::Result<T, TriageError>;

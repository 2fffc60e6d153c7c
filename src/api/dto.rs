//! Request and response bodies of the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::assessment::RawAssessmentForm;
use crate::models::user::Principal;

/// Body of `POST /api/register`'s success response
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub ok: bool,
    pub message: String,
}

/// Body of `POST /api/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Email, phone number or username
    #[serde(default, alias = "email", alias = "username")]
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

/// Issued session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: Principal,
}

/// Body of `POST /api/patients`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    /// Client-generated key; repeating it returns the first stored record
    #[serde(default)]
    pub submission_id: Option<String>,
    #[serde(flatten)]
    pub form: RawAssessmentForm,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

//! Axum request handlers
//!
//! Each authenticated handler resolves the caller's `Principal` from the
//! bearer token first and passes it to the service explicitly.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};

use super::dto::{
    CreateAssessmentRequest, HealthResponse, LoginRequest, LoginResponse, RegisterResponse,
};
use super::error::ApiResult;
use super::state::AppState;
use crate::error::TriageError;
use crate::identity::memory::REGISTERED_MESSAGE;
use crate::models::assessment::RawAssessmentForm;
use crate::models::record::{PatientRecord, PatientRecordUpdate};
use crate::models::result::DiagnosisResult;
use crate::models::user::Registration;
use crate::service::DashboardStats;

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/register`
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Registration>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(registration) = body?;
    state.identity().register(registration).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            ok: true,
            message: REGISTERED_MESSAGE.to_string(),
        }),
    ))
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = body?;
    let principal = state
        .identity()
        .authenticate(&request.identifier, &request.password)
        .await?;
    let session = state.start_session(principal)?;
    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: session.principal,
    }))
}

/// `POST /api/logout`
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    state.principal(&headers)?;
    state.end_session(&headers)?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/assess`: evaluate without saving
pub async fn preview_assessment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RawAssessmentForm>, JsonRejection>,
) -> ApiResult<Json<DiagnosisResult>> {
    state.principal(&headers)?;
    let Json(form) = body?;
    Ok(Json(state.patients().preview(&form)?))
}

/// `GET /api/patients`
pub async fn list_patients(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<PatientRecord>>> {
    let principal = state.principal(&headers)?;
    Ok(Json(state.patients().list(&principal).await?))
}

/// `POST /api/patients`
pub async fn create_patient(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateAssessmentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PatientRecord>)> {
    let principal = state.principal(&headers)?;
    let Json(request) = body?;
    let record = state
        .patients()
        .create(&principal, &request.form, request.submission_id)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/patients/:id`
pub async fn get_patient(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<PatientRecord>> {
    let principal = state.principal(&headers)?;
    let id = parse_record_id(&id)?;
    Ok(Json(state.patients().get(&principal, id).await?))
}

/// `PUT /api/patients/:id`
pub async fn update_patient(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<PatientRecordUpdate>, JsonRejection>,
) -> ApiResult<Json<PatientRecord>> {
    let principal = state.principal(&headers)?;
    let id = parse_record_id(&id)?;
    let Json(update) = body?;
    Ok(Json(state.patients().update(&principal, id, &update).await?))
}

/// `DELETE /api/patients/:id`
pub async fn delete_patient(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let principal = state.principal(&headers)?;
    let id = parse_record_id(&id)?;
    state.patients().delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/dashboard-stats`
pub async fn dashboard_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<DashboardStats>> {
    let principal = state.principal(&headers)?;
    Ok(Json(state.patients().dashboard_stats(&principal).await?))
}

/// Ids that are not numbers cannot name a record
fn parse_record_id(raw: &str) -> Result<u64, TriageError> {
    raw.parse().map_err(|_| TriageError::NotFound {
        entity: "PatientRecord",
        id: raw.to_string(),
    })
}

//! JSON HTTP API
//!
//! ## Endpoints
//!
//! - `POST /api/register` - Create a clinician account
//! - `POST /api/login` - Exchange credentials for a bearer token
//! - `POST /api/logout` - Revoke the current token
//! - `POST /api/assess` - Evaluate a form without saving it
//! - `GET /api/patients` - Records visible to the caller, newest first
//! - `POST /api/patients` - Evaluate and store a new assessment
//! - `GET /api/patients/:id` - One record
//! - `PUT /api/patients/:id` - Edit a record and re-evaluate it
//! - `DELETE /api/patients/:id` - Delete a record
//! - `GET /api/dashboard-stats` - Record and diagnosis counts
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::AppState;

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/assess", post(handlers::preview_assessment))
        .route(
            "/api/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route(
            "/api/patients/:id",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .route("/api/dashboard-stats", get(handlers::dashboard_stats))
        .with_state(state)
}

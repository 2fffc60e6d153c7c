//! Decision support for triaging febrile patients.
//!
//! A pure rule evaluator maps vitals, warning signs and blood counts to a
//! referral decision and a probable bacterial or viral diagnosis. Around it
//! sit a record store with Parquet snapshots, clinician identity, a
//! role-aware service layer and a JSON HTTP API.

pub mod algorithm;
pub mod api;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod service;
pub mod store;
pub mod utils;

// Core types
pub use config::AppConfig;
pub use error::{Result, TriageError};
pub use models::{
    Diagnosis, DiagnosisResult, PatientAssessmentInput, PatientRecord, PatientRecordUpdate,
    Principal, RawAssessmentForm,
};

// Evaluator
pub use algorithm::triage::{assess, evaluate, evaluate_batch, reevaluate_records};

// Collaborators
pub use identity::{IdentityProvider, InMemoryIdentityProvider};
pub use service::{DashboardStats, PatientService};
pub use store::{InMemoryRecordStore, RecordStore};

// HTTP API
pub use api::{AppState, create_router};

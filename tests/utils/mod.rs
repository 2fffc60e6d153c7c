use std::sync::Arc;

use chrono::NaiveDate;
use fever_triage::identity::PasswordHashing;
use fever_triage::models::{NumericInput, Principal, RawAssessmentForm, Role};
use fever_triage::{AppConfig, AppState, InMemoryIdentityProvider, InMemoryRecordStore};

/// Administrator credentials used by test states
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-secret";

/// Fixed evaluation date
#[must_use]
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 19).unwrap()
}

/// Form with demographics filled in and the given lab values
#[must_use]
pub fn form(
    leukocyte: f64,
    neutrophil: f64,
    lymphocyte: f64,
    crp: Option<f64>,
    fever_days: f64,
) -> RawAssessmentForm {
    RawAssessmentForm {
        name: "Putri".to_string(),
        gender: "Female".to_string(),
        date_of_birth: "2018-05-02".to_string(),
        oxygen_saturation: Some(NumericInput::Number(98.0)),
        leukocyte_count: Some(NumericInput::Number(leukocyte)),
        neutrophil_count: Some(NumericInput::Number(neutrophil)),
        lymphocyte_count: Some(NumericInput::Number(lymphocyte)),
        crp_level: crp.map(NumericInput::Number),
        fever_duration: Some(NumericInput::Number(fever_days)),
        ..RawAssessmentForm::default()
    }
}

/// Viral-shaped labs, short fever
#[must_use]
pub fn viral_form() -> RawAssessmentForm {
    form(8500.0, 5500.0, 2000.0, None, 3.0)
}

/// Bacterial-shaped labs, long fever
#[must_use]
pub fn bacterial_form() -> RawAssessmentForm {
    form(12_000.0, 8000.0, 2000.0, Some(45.0), 7.0)
}

#[must_use]
pub fn clinician(user_id: &str) -> Principal {
    Principal {
        user_id: user_id.to_string(),
        username: user_id.to_string(),
        display_name: format!("Dr. {user_id}"),
        role: Role::User,
    }
}

#[must_use]
pub fn administrator() -> Principal {
    Principal {
        user_id: "admin-user-01".to_string(),
        username: ADMIN_USERNAME.to_string(),
        display_name: "Administrator".to_string(),
        role: Role::Administrator,
    }
}

/// Application state with an in-memory store and a configured administrator
#[must_use]
pub fn test_state() -> AppState {
    let identity = InMemoryIdentityProvider::new(PasswordHashing::low_cost())
        .with_admin(ADMIN_USERNAME, ADMIN_PASSWORD)
        .unwrap();
    AppState::new(
        AppConfig::default(),
        Arc::new(InMemoryRecordStore::new()),
        Arc::new(identity),
    )
}

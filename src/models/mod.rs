//! Domain models for febrile triage
//!
//! Assessment inputs, evaluator results, persisted records and the
//! identities that own them.

pub mod assessment;
pub mod record;
pub mod result;
pub mod types;
pub mod user;

pub use assessment::{
    EmergencyFlags, LabValues, NumericInput, PatientAssessmentInput, RawAssessmentForm,
    WarningFlags, WarningSign, age_on,
};
pub use record::{NewPatientRecord, OwnerFilter, PatientRecord, PatientRecordUpdate};
pub use result::DiagnosisResult;
pub use types::{Diagnosis, Gender, Role};
pub use user::{Principal, Registration, Session, User};

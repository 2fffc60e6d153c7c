//! Patient record models
//!
//! A `PatientRecord` is the persisted aggregate of one assessment: the
//! normalized input, the evaluator's result and record metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::assessment::{NumericInput, PatientAssessmentInput, deserialize_present};
use crate::models::result::DiagnosisResult;

/// Persisted patient record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    /// Store-assigned identifier
    pub id: u64,
    /// Owning user; `None` only for records imported before ownership existed
    pub owner_id: Option<String>,
    /// Client idempotency key of the create request
    pub submission_id: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
    /// Normalized assessment input
    #[serde(flatten)]
    pub assessment: PatientAssessmentInput,
    /// Evaluator output for `assessment`
    #[serde(flatten)]
    pub result: DiagnosisResult,
}

impl PatientRecord {
    /// Whether `user_id` owns this record
    #[must_use]
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id.as_deref() == Some(user_id)
    }
}

/// A record that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatientRecord {
    pub owner_id: Option<String>,
    pub submission_id: Option<String>,
    pub assessment: PatientAssessmentInput,
    pub result: DiagnosisResult,
}

/// Which records a listing should return
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerFilter {
    /// Every record (administrators)
    All,
    /// Records owned by one user
    Owner(String),
}

impl OwnerFilter {
    /// Whether `record` passes this filter
    #[must_use]
    pub fn matches(&self, record: &PatientRecord) -> bool {
        match self {
            Self::All => true,
            Self::Owner(owner) => record.is_owned_by(owner),
        }
    }
}

/// Typed partial update of a patient record
///
/// Only clinician-entered fields can change. Derived fields (age, NLCR,
/// diagnosis, recommendation, confidence figures) are recomputed from the
/// edited record and are rejected here as unknown fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatientRecordUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,

    #[serde(default)]
    pub pulse_weak: Option<bool>,
    #[serde(default)]
    pub consciousness_poor: Option<bool>,
    /// `null` clears the measurement
    #[serde(default, deserialize_with = "deserialize_present")]
    pub oxygen_saturation: Option<NumericInput>,

    #[serde(default)]
    pub nausea: Option<bool>,
    #[serde(default)]
    pub vomiting: Option<bool>,
    #[serde(default)]
    pub loss_of_appetite: Option<bool>,
    #[serde(default)]
    pub severe_bleeding: Option<bool>,
    #[serde(default)]
    pub respiratory_problems: Option<bool>,
    #[serde(default)]
    pub seizure: Option<bool>,
    #[serde(default)]
    pub severe_dehydration: Option<bool>,
    #[serde(default)]
    pub shock_sign: Option<bool>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub leukocyte_count: Option<NumericInput>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub neutrophil_count: Option<NumericInput>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub lymphocyte_count: Option<NumericInput>,
    /// `null` or `""` marks CRP as not tested
    #[serde(default, deserialize_with = "deserialize_present")]
    pub crp_level: Option<NumericInput>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub fever_duration: Option<NumericInput>,
}

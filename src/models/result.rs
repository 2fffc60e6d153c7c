//! Diagnosis result model

use serde::{Deserialize, Serialize};

use crate::models::types::Diagnosis;

/// Outcome of the rule evaluator for one assessment
///
/// Immutable once produced; records carry it verbatim and replace it
/// wholesale when their clinical fields are edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    /// Neutrophil-to-lymphocyte count ratio, two decimals
    pub nlcr_result: f64,
    /// Triage outcome
    pub diagnosis: Diagnosis,
    /// Clinician-facing advice
    pub recommendation: String,
    /// Sensitivity of the rule in percent; absent for emergency referrals
    pub sensitivity: Option<f64>,
    /// Specificity of the rule in percent; absent for emergency referrals
    pub specificity: Option<f64>,
    /// Reasons for hospital referral, in evaluation order
    pub referral_reasons: Vec<String>,
    /// True when emergency vitals replaced the lab-based diagnosis
    pub referral_overrides_diagnosis: bool,
}

impl DiagnosisResult {
    /// Whether the patient should be sent to a hospital
    #[must_use]
    pub fn needs_referral(&self) -> bool {
        self.referral_overrides_diagnosis || !self.referral_reasons.is_empty()
    }
}

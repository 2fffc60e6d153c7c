//! Clinician-facing recommendation text

use crate::models::types::Diagnosis;

pub const BACTERIAL_ADVICE: &str =
    "Consider antibiotic therapy with appropriate dosage based on patient weight and condition.";
pub const VIRAL_ADVICE: &str =
    "Provide symptomatic treatment (e.g., paracetamol) and supplements. Avoid antibiotics.";
pub const INCONCLUSIVE_ADVICE: &str =
    "Clinical judgment required. Consider additional tests or consultation.";
pub const EMERGENCY_ADVICE: &str = "Patient shows signs requiring immediate hospital care.";

/// Fixed advice for a diagnosis
#[must_use]
pub const fn advice_for(diagnosis: Diagnosis) -> &'static str {
    match diagnosis {
        Diagnosis::BacterialInfection => BACTERIAL_ADVICE,
        Diagnosis::ViralInfection => VIRAL_ADVICE,
        Diagnosis::Inconclusive => INCONCLUSIVE_ADVICE,
        Diagnosis::EmergencyReferral => EMERGENCY_ADVICE,
    }
}

/// Compose the recommendation for a diagnosis and its referral reasons
///
/// Reasons are appended as a referral clause unless the diagnosis already is
/// an emergency referral.
#[must_use]
pub fn compose_recommendation<S: AsRef<str>>(diagnosis: Diagnosis, reasons: &[S]) -> String {
    let advice = advice_for(diagnosis);
    if reasons.is_empty() || diagnosis == Diagnosis::EmergencyReferral {
        return advice.to_string();
    }

    let listed = reasons.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
    format!(
        "{advice} Also, due to warning/emergency sign(s): {listed}, please refer the patient to the nearest hospital."
    )
}

use fever_triage::algorithm::triage::{assess, compute_nlcr, evaluate};
use fever_triage::models::{Diagnosis, NumericInput, RawAssessmentForm};

use crate::utils::{bacterial_form, form, today, viral_form};

#[test]
fn test_viral_short_fever() {
    let (input, result) = assess(&viral_form(), today()).unwrap();
    assert_eq!(input.age, 7);
    assert_eq!(result.nlcr_result, 2.75);
    assert_eq!(result.diagnosis, Diagnosis::ViralInfection);
    assert_eq!(result.sensitivity, Some(94.3));
    assert_eq!(result.specificity, Some(76.9));
    assert!(result.referral_reasons.is_empty());
    assert_eq!(
        result.recommendation,
        "Provide symptomatic treatment (e.g., paracetamol) and supplements. Avoid antibiotics."
    );
}

#[test]
fn test_bacterial_long_fever() {
    let (_, result) = assess(&bacterial_form(), today()).unwrap();
    assert_eq!(result.nlcr_result, 4.0);
    assert_eq!(result.diagnosis, Diagnosis::BacterialInfection);
    assert_eq!(result.sensitivity, Some(96.6));
    assert_eq!(result.specificity, Some(89.2));
}

#[test]
fn test_weak_pulse_overrides_labs() {
    let mut raw = viral_form();
    raw.pulse_weak = true;
    let (_, result) = assess(&raw, today()).unwrap();

    assert_eq!(result.diagnosis, Diagnosis::EmergencyReferral);
    assert_eq!(result.referral_reasons, vec!["Weak pulse (Nadi lemah)".to_string()]);
    assert!(result.referral_overrides_diagnosis);
    assert_eq!(
        result.recommendation,
        "Patient shows signs requiring immediate hospital care."
    );
}

#[test]
fn test_zero_lymphocytes() {
    let (_, result) = assess(&form(9000.0, 500.0, 0.0, None, 2.0), today()).unwrap();
    assert_eq!(result.nlcr_result, 0.0);
    assert_eq!(compute_nlcr(500.0, -1.0), 0.0);
}

#[test]
fn test_leukocyte_boundary() {
    let (_, at) = assess(&form(10_000.0, 3000.0, 2000.0, None, 2.0), today()).unwrap();
    assert_eq!(at.diagnosis, Diagnosis::ViralInfection);

    let (_, above) = assess(&form(10_001.0, 3000.0, 2000.0, None, 2.0), today()).unwrap();
    assert_eq!(above.diagnosis, Diagnosis::BacterialInfection);
}

#[test]
fn test_nlcr_boundary_is_bacterial() {
    let (_, result) = assess(&form(9000.0, 3530.0, 1000.0, None, 2.0), today()).unwrap();
    assert_eq!(result.nlcr_result, 3.53);
    assert_eq!(result.diagnosis, Diagnosis::BacterialInfection);
}

#[test]
fn test_evaluation_is_idempotent() {
    let (input, _) = assess(&bacterial_form(), today()).unwrap();
    let first = serde_json::to_vec(&evaluate(&input)).unwrap();
    let second = serde_json::to_vec(&evaluate(&input)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_string_form_from_json() {
    let raw: RawAssessmentForm = serde_json::from_value(serde_json::json!({
        "name": "Rudi",
        "gender": "m",
        "dateOfBirth": "2015-01-01",
        "oxygenSaturation": "",
        "nausea": true,
        "leukocyteCount": "8500",
        "neutrophilCount": "5500",
        "lymphocyteCount": "2000",
        "crpLevel": null,
        "feverDuration": "3"
    }))
    .unwrap();
    assert_eq!(raw.crp_level, None);
    assert_eq!(raw.leukocyte_count, Some(NumericInput::Text("8500".into())));

    let (input, result) = assess(&raw, today()).unwrap();
    assert_eq!(input.emergency.oxygen_saturation, None);
    assert_eq!(result.diagnosis, Diagnosis::ViralInfection);
    assert_eq!(result.referral_reasons, vec!["Nausea (Mual)".to_string()]);
    assert!(result.recommendation.contains("Nausea (Mual)"));
}

#[test]
fn test_missing_name_is_rejected() {
    let mut raw = viral_form();
    raw.name = "  ".into();
    assert!(assess(&raw, today()).is_err());
}

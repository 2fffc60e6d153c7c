//! Diagnostic rule evaluator
//!
//! Wires the referral collector, NLCR calculator, classifier and
//! recommendation composer into one pure function. Every caller in the crate
//! (record creation, record edits, the CLI, batch evaluation) goes through
//! `evaluate`.

use chrono::NaiveDate;
use rayon::prelude::*;

use super::classifier::classify;
use super::nlcr::compute_nlcr;
use super::normalize::normalize_form;
use super::recommendation::compose_recommendation;
use super::referral::{collect_referral_reasons, emergency_gate};
use crate::error::Result;
use crate::models::assessment::{PatientAssessmentInput, RawAssessmentForm, age_on};
use crate::models::record::PatientRecord;
use crate::models::result::DiagnosisResult;

/// Evaluate a normalized assessment
#[must_use]
pub fn evaluate(input: &PatientAssessmentInput) -> DiagnosisResult {
    let reasons = collect_referral_reasons(&input.emergency, &input.warnings);
    let emergency = emergency_gate(&input.emergency);
    let labs = &input.labs;

    let nlcr = compute_nlcr(labs.neutrophil_count, labs.lymphocyte_count);
    let classification = classify(
        labs.leukocyte_count,
        nlcr,
        labs.crp_level,
        labs.fever_duration,
        emergency,
    );

    DiagnosisResult {
        nlcr_result: nlcr,
        diagnosis: classification.diagnosis,
        recommendation: compose_recommendation(classification.diagnosis, &reasons),
        sensitivity: classification.confidence.map(|c| c.sensitivity),
        specificity: classification.confidence.map(|c| c.specificity),
        referral_reasons: reasons.into_iter().map(str::to_string).collect(),
        referral_overrides_diagnosis: emergency,
    }
}

/// Normalize a submitted form and evaluate it
pub fn assess(
    form: &RawAssessmentForm,
    today: NaiveDate,
) -> Result<(PatientAssessmentInput, DiagnosisResult)> {
    let input = normalize_form(form, today)?;
    let result = evaluate(&input);
    Ok((input, result))
}

/// Evaluate many assessments in parallel, preserving input order
#[must_use]
pub fn evaluate_batch(inputs: &[PatientAssessmentInput]) -> Vec<DiagnosisResult> {
    inputs.par_iter().map(evaluate).collect()
}

/// Re-derive age on `today` and re-run the rules for stored records
///
/// Clinician-entered values and record metadata are left untouched.
pub fn reevaluate_records(records: &mut [PatientRecord], today: NaiveDate) {
    for record in records.iter_mut() {
        let assessment = &mut record.assessment;
        assessment.age = age_on(assessment.date_of_birth, today);
    }
    let inputs: Vec<PatientAssessmentInput> =
        records.iter().map(|r| r.assessment.clone()).collect();
    for (record, result) in records.iter_mut().zip(evaluate_batch(&inputs)) {
        record.result = result;
    }
}

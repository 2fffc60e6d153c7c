//! Bacterial vs. viral classification
//!
//! One rule set, applied everywhere:
//! bacterial when leukocytes > 10 000/µL, NLCR ≥ 3.53 or CRP ≥ 40 mg/L.
//! Confidence figures come from a fixed reference table keyed on fever
//! duration; they describe the rule, not the patient.

use crate::models::types::Diagnosis;

/// Leukocyte count above which infection is called bacterial (strict)
pub const LEUKOCYTE_THRESHOLD: f64 = 10_000.0;
/// NLCR at or above which infection is called bacterial
pub const NLCR_THRESHOLD: f64 = 3.53;
/// CRP (mg/L) at or above which infection is called bacterial
pub const CRP_THRESHOLD: f64 = 40.0;
/// Last fever day that belongs to the short-fever bucket
pub const SHORT_FEVER_MAX_DAYS: u32 = 5;

/// Sensitivity and specificity of the rule, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Confidence {
    pub sensitivity: f64,
    pub specificity: f64,
}

/// Reference figures for fever of at most five days
pub const SHORT_FEVER_CONFIDENCE: Confidence = Confidence {
    sensitivity: 94.3,
    specificity: 76.9,
};

/// Reference figures for fever longer than five days
pub const LONG_FEVER_CONFIDENCE: Confidence = Confidence {
    sensitivity: 96.6,
    specificity: 89.2,
};

/// Classifier output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub diagnosis: Diagnosis,
    /// `None` when emergency referral bypassed the lab rule
    pub confidence: Option<Confidence>,
}

/// Look up the confidence figures for a fever duration
#[must_use]
pub const fn confidence_for(fever_days: u32) -> Confidence {
    if fever_days <= SHORT_FEVER_MAX_DAYS {
        SHORT_FEVER_CONFIDENCE
    } else {
        LONG_FEVER_CONFIDENCE
    }
}

/// Bacterial criterion
#[must_use]
pub fn is_bacterial(leukocyte: f64, nlcr: f64, crp: Option<f64>) -> bool {
    leukocyte > LEUKOCYTE_THRESHOLD
        || nlcr >= NLCR_THRESHOLD
        || crp.is_some_and(|c| c >= CRP_THRESHOLD)
}

/// Viral criterion, the complement of the bacterial one on finite inputs
#[must_use]
pub fn is_viral(leukocyte: f64, nlcr: f64, crp: Option<f64>) -> bool {
    !is_bacterial(leukocyte, nlcr, crp)
        && leukocyte <= LEUKOCYTE_THRESHOLD
        && nlcr < NLCR_THRESHOLD
        && crp.is_none_or(|c| c < CRP_THRESHOLD)
}

/// Classify an assessment
///
/// `emergency` short-circuits the lab rule entirely. Otherwise exactly one of
/// bacterial, viral or inconclusive is returned; inconclusive is only
/// reachable with non-finite lab values, which the normalizer filters out.
#[must_use]
pub fn classify(
    leukocyte: f64,
    nlcr: f64,
    crp: Option<f64>,
    fever_days: u32,
    emergency: bool,
) -> Classification {
    if emergency {
        return Classification {
            diagnosis: Diagnosis::EmergencyReferral,
            confidence: None,
        };
    }

    let diagnosis = if is_bacterial(leukocyte, nlcr, crp) {
        Diagnosis::BacterialInfection
    } else if is_viral(leukocyte, nlcr, crp) {
        Diagnosis::ViralInfection
    } else {
        Diagnosis::Inconclusive
    };

    Classification {
        diagnosis,
        confidence: Some(confidence_for(fever_days)),
    }
}

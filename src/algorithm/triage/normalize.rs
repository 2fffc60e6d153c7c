//! Numeric normalization of submitted form values
//!
//! Normalization never fails on numbers: anything that is not a finite
//! number becomes "absent" and the call site picks the default. Only the
//! demographic fields the record cannot exist without are validated.

use chrono::{DateTime, NaiveDate};

use crate::error::{Result, TriageError};
use crate::models::assessment::{
    EmergencyFlags, LabValues, NumericInput, PatientAssessmentInput, RawAssessmentForm, age_on,
};
use crate::models::types::Gender;

/// Coerce a submitted value into a finite number
///
/// Returns `None` for null, blank strings, unparsable strings and
/// non-finite values (`"inf"`, `"NaN"`).
#[must_use]
pub fn normalize(value: &NumericInput) -> Option<f64> {
    let parsed = match value {
        NumericInput::Number(n) => Some(*n),
        NumericInput::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                text.parse::<f64>().ok()
            }
        }
        NumericInput::Null => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Normalize an optional field; an omitted field is absent
#[must_use]
pub fn normalize_opt(value: Option<&NumericInput>) -> Option<f64> {
    value.and_then(normalize)
}

/// Normalize a mandatory field, substituting `default` when absent
#[must_use]
pub fn normalize_or(value: Option<&NumericInput>, default: f64) -> f64 {
    normalize_opt(value).unwrap_or(default)
}

/// Normalize a whole-number count such as fever days
///
/// Absent and negative values become 0, fractions are truncated.
#[must_use]
pub fn normalize_count(value: Option<&NumericInput>) -> u32 {
    normalize_opt(value).map_or(0, |n| n.max(0.0).trunc() as u32)
}

/// Validate a patient name
pub fn parse_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TriageError::validation("name", "Name is required"));
    }
    Ok(name.to_string())
}

/// Parse a date of birth given as `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date_of_birth(raw: &str, today: NaiveDate) -> Result<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(TriageError::validation("dateOfBirth", "Date of birth is required"));
    }

    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .ok_or_else(|| TriageError::validation("dateOfBirth", "Date of birth is invalid"))?;

    if date > today {
        return Err(TriageError::validation(
            "dateOfBirth",
            "Date of birth cannot be in the future",
        ));
    }
    Ok(date)
}

/// Turn a submitted form into typed evaluator input
///
/// Age is always derived from the date of birth on `today`.
pub fn normalize_form(form: &RawAssessmentForm, today: NaiveDate) -> Result<PatientAssessmentInput> {
    let name = parse_name(&form.name)?;
    let gender: Gender = form.gender.parse()?;
    let date_of_birth = parse_date_of_birth(&form.date_of_birth, today)?;

    Ok(PatientAssessmentInput {
        name,
        age: age_on(date_of_birth, today),
        gender,
        date_of_birth,
        emergency: EmergencyFlags {
            pulse_weak: form.pulse_weak,
            consciousness_poor: form.consciousness_poor,
            oxygen_saturation: normalize_opt(form.oxygen_saturation.as_ref()),
        },
        warnings: form.warnings,
        labs: LabValues {
            leukocyte_count: normalize_or(form.leukocyte_count.as_ref(), 0.0),
            neutrophil_count: normalize_or(form.neutrophil_count.as_ref(), 0.0),
            lymphocyte_count: normalize_or(form.lymphocyte_count.as_ref(), 0.0),
            crp_level: normalize_opt(form.crp_level.as_ref()),
            fever_duration: normalize_count(form.fever_duration.as_ref()),
        },
    })
}

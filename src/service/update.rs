//! Applying typed partial updates to stored assessments

use chrono::NaiveDate;

use crate::algorithm::triage::normalize::{
    normalize, normalize_count, parse_date_of_birth, parse_name,
};
use crate::error::Result;
use crate::models::assessment::{PatientAssessmentInput, WarningSign, age_on};
use crate::models::record::PatientRecordUpdate;
use crate::models::types::Gender;

/// Apply `update` to `current`, producing the edited assessment
///
/// Omitted fields keep their value. An explicit `null` clears optional
/// measurements (SpO₂, CRP) and resets required lab values to 0. Age is
/// re-derived from the (possibly edited) date of birth on `today`.
pub fn apply_update(
    current: &PatientAssessmentInput,
    update: &PatientRecordUpdate,
    today: NaiveDate,
) -> Result<PatientAssessmentInput> {
    let mut next = current.clone();

    if let Some(name) = &update.name {
        next.name = parse_name(name)?;
    }
    if let Some(gender) = &update.gender {
        next.gender = gender.parse::<Gender>()?;
    }
    if let Some(dob) = &update.date_of_birth {
        next.date_of_birth = parse_date_of_birth(dob, today)?;
    }
    next.age = age_on(next.date_of_birth, today);

    if let Some(flag) = update.pulse_weak {
        next.emergency.pulse_weak = flag;
    }
    if let Some(flag) = update.consciousness_poor {
        next.emergency.consciousness_poor = flag;
    }
    if let Some(value) = &update.oxygen_saturation {
        next.emergency.oxygen_saturation = normalize(value);
    }

    for sign in WarningSign::ALL {
        if let Some(flag) = warning_update(update, sign) {
            *next.warnings.flag_mut(sign) = flag;
        }
    }

    let labs = &mut next.labs;
    if let Some(value) = &update.leukocyte_count {
        labs.leukocyte_count = normalize(value).unwrap_or(0.0);
    }
    if let Some(value) = &update.neutrophil_count {
        labs.neutrophil_count = normalize(value).unwrap_or(0.0);
    }
    if let Some(value) = &update.lymphocyte_count {
        labs.lymphocyte_count = normalize(value).unwrap_or(0.0);
    }
    if let Some(value) = &update.crp_level {
        labs.crp_level = normalize(value);
    }
    if let Some(value) = &update.fever_duration {
        labs.fever_duration = normalize_count(Some(value));
    }

    Ok(next)
}

const fn warning_update(update: &PatientRecordUpdate, sign: WarningSign) -> Option<bool> {
    match sign {
        WarningSign::Nausea => update.nausea,
        WarningSign::Vomiting => update.vomiting,
        WarningSign::LossOfAppetite => update.loss_of_appetite,
        WarningSign::SevereBleeding => update.severe_bleeding,
        WarningSign::RespiratoryProblems => update.respiratory_problems,
        WarningSign::Seizure => update.seizure,
        WarningSign::SevereDehydration => update.severe_dehydration,
        WarningSign::ShockSign => update.shock_sign,
    }
}

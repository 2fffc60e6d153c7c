//! Assessment input models
//!
//! `RawAssessmentForm` is what a form or API client submits: every number may
//! arrive as a string, an empty string or null. `PatientAssessmentInput` is the
//! normalized, typed shape the rule evaluator works on.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::types::Gender;

/// A numeric field as submitted by a client
///
/// Forms send numbers as strings (often empty), JSON clients send numbers or
/// null. The normalizer turns all of these into `Option<f64>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    /// A JSON number
    Number(f64),
    /// A textual number such as `"12.5"` or `""`
    Text(String),
    /// Explicit JSON null
    Null,
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Serde helper keeping an explicit `null` as `Some(NumericInput::Null)`.
///
/// Combined with `#[serde(default)]` this separates "field omitted" (`None`)
/// from "field cleared" (`Some(Null)`).
pub fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<NumericInput>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    NumericInput::deserialize(deserializer).map(Some)
}

/// Warning signs that call for hospital referral, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningSign {
    /// Nausea
    Nausea,
    /// Vomiting
    Vomiting,
    /// No appetite
    LossOfAppetite,
    /// Severe bleeding
    SevereBleeding,
    /// Severe respiratory problems
    RespiratoryProblems,
    /// Seizures
    Seizure,
    /// Severe dehydration
    SevereDehydration,
    /// Signs of shock
    ShockSign,
}

impl WarningSign {
    /// All warning signs in their declared order
    pub const ALL: [Self; 8] = [
        Self::Nausea,
        Self::Vomiting,
        Self::LossOfAppetite,
        Self::SevereBleeding,
        Self::RespiratoryProblems,
        Self::Seizure,
        Self::SevereDehydration,
        Self::ShockSign,
    ];

    /// Bilingual label surfaced to the clinician
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nausea => "Nausea (Mual)",
            Self::Vomiting => "Vomiting (Muntah)",
            Self::LossOfAppetite => "No appetite (Tidak nafsu makan)",
            Self::SevereBleeding => "Severe bleeding (Pendarahan hebat)",
            Self::RespiratoryProblems => {
                "Severe respiratory problems (Masalah pernapasan yang parah)"
            }
            Self::Seizure => "Seizures (Kejang)",
            Self::SevereDehydration => "Severe dehydration (Dehidrasi yang parah)",
            Self::ShockSign => "Shock signs (Tanda-tanda syok)",
        }
    }
}

/// Emergency vitals block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyFlags {
    /// Weak pulse on palpation
    #[serde(default)]
    pub pulse_weak: bool,
    /// Reduced level of consciousness
    #[serde(default)]
    pub consciousness_poor: bool,
    /// SpO2 in percent; `None` when not measured
    #[serde(default)]
    pub oxygen_saturation: Option<f64>,
}

/// Warning signs block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningFlags {
    #[serde(default)]
    pub nausea: bool,
    #[serde(default)]
    pub vomiting: bool,
    #[serde(default)]
    pub loss_of_appetite: bool,
    #[serde(default)]
    pub severe_bleeding: bool,
    #[serde(default)]
    pub respiratory_problems: bool,
    #[serde(default)]
    pub seizure: bool,
    #[serde(default)]
    pub severe_dehydration: bool,
    #[serde(default)]
    pub shock_sign: bool,
}

impl WarningFlags {
    /// Whether a given warning sign is present
    #[must_use]
    pub const fn is_set(&self, sign: WarningSign) -> bool {
        match sign {
            WarningSign::Nausea => self.nausea,
            WarningSign::Vomiting => self.vomiting,
            WarningSign::LossOfAppetite => self.loss_of_appetite,
            WarningSign::SevereBleeding => self.severe_bleeding,
            WarningSign::RespiratoryProblems => self.respiratory_problems,
            WarningSign::Seizure => self.seizure,
            WarningSign::SevereDehydration => self.severe_dehydration,
            WarningSign::ShockSign => self.shock_sign,
        }
    }

    /// Mutable access to the flag for a given warning sign
    pub fn flag_mut(&mut self, sign: WarningSign) -> &mut bool {
        match sign {
            WarningSign::Nausea => &mut self.nausea,
            WarningSign::Vomiting => &mut self.vomiting,
            WarningSign::LossOfAppetite => &mut self.loss_of_appetite,
            WarningSign::SevereBleeding => &mut self.severe_bleeding,
            WarningSign::RespiratoryProblems => &mut self.respiratory_problems,
            WarningSign::Seizure => &mut self.seizure,
            WarningSign::SevereDehydration => &mut self.severe_dehydration,
            WarningSign::ShockSign => &mut self.shock_sign,
        }
    }
}

/// Blood test results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabValues {
    /// Leukocytes, cells/µL
    pub leukocyte_count: f64,
    /// Neutrophils, cells/µL
    pub neutrophil_count: f64,
    /// Lymphocytes, cells/µL
    pub lymphocyte_count: f64,
    /// C-reactive protein, mg/L; `None` when not tested
    pub crp_level: Option<f64>,
    /// Days of fever
    pub fever_duration: u32,
}

/// Normalized input of one assessment session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAssessmentInput {
    /// Patient name, never empty
    pub name: String,
    /// Age in whole years, derived from `date_of_birth`
    pub age: u32,
    /// Patient gender
    pub gender: Gender,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Emergency vitals
    #[serde(flatten)]
    pub emergency: EmergencyFlags,
    /// Warning signs
    #[serde(flatten)]
    pub warnings: WarningFlags,
    /// Lab values
    #[serde(flatten)]
    pub labs: LabValues,
}

/// Assessment form exactly as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAssessmentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    #[serde(default)]
    pub date_of_birth: String,

    #[serde(default)]
    pub pulse_weak: bool,
    #[serde(default)]
    pub consciousness_poor: bool,
    #[serde(default)]
    pub oxygen_saturation: Option<NumericInput>,

    #[serde(flatten)]
    pub warnings: WarningFlags,

    #[serde(default)]
    pub leukocyte_count: Option<NumericInput>,
    #[serde(default)]
    pub neutrophil_count: Option<NumericInput>,
    #[serde(default)]
    pub lymphocyte_count: Option<NumericInput>,
    #[serde(default)]
    pub crp_level: Option<NumericInput>,
    #[serde(default)]
    pub fever_duration: Option<NumericInput>,
}

/// Age in completed years on `today`; 0 for birth dates in the future
#[must_use]
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

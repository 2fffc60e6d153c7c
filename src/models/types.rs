//! Common domain type definitions
//!
//! Enumerations shared by assessments, records and the identity layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TriageError;

/// Gender of a patient or clinician
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male gender
    Male,
    /// Female gender
    Female,
}

impl Gender {
    /// Canonical label used in records and exports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            _ => Err(TriageError::validation("gender", "Gender is required")),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Triage outcome of a febrile assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Diagnosis {
    /// Most probable bacterial infection
    #[serde(rename = "Bacterial Infection")]
    BacterialInfection,
    /// Most probable viral infection
    #[serde(rename = "Viral Infection")]
    ViralInfection,
    /// Lab values do not support either call
    #[serde(rename = "Inconclusive")]
    Inconclusive,
    /// Emergency vitals override any lab-based call
    #[serde(rename = "Emergency Referral")]
    EmergencyReferral,
}

impl Diagnosis {
    /// All outcomes, in declaration order
    pub const ALL: [Self; 4] = [
        Self::BacterialInfection,
        Self::ViralInfection,
        Self::Inconclusive,
        Self::EmergencyReferral,
    ];

    /// Label shown to clinicians and stored with records
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BacterialInfection => "Bacterial Infection",
            Self::ViralInfection => "Viral Infection",
            Self::Inconclusive => "Inconclusive",
            Self::EmergencyReferral => "Emergency Referral",
        }
    }
}

impl FromStr for Diagnosis {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TriageError::validation("diagnosis", format!("unknown diagnosis: {s}")))
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Access level of an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Clinician who owns the records they create
    User,
    /// Sees and deletes every record, cannot run assessments
    Administrator,
}

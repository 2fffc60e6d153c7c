//! Dashboard statistics

use itertools::Itertools;
use serde::Serialize;

use crate::models::record::PatientRecord;
use crate::models::types::Diagnosis;

/// Number of records with one diagnosis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisCount {
    pub diagnosis: Diagnosis,
    pub count: usize,
}

/// Summary shown on the clinician dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub patient_count: usize,
    /// Most frequent diagnosis first; ties ordered by label
    pub diagnosis_counts: Vec<DiagnosisCount>,
}

impl DashboardStats {
    /// Summarize `records`
    #[must_use]
    pub fn from_records(records: &[PatientRecord]) -> Self {
        let diagnosis_counts = records
            .iter()
            .map(|record| record.result.diagnosis)
            .counts()
            .into_iter()
            .map(|(diagnosis, count)| DiagnosisCount { diagnosis, count })
            .sorted_by(|a, b| {
                b.count
                    .cmp(&a.count)
                    .then_with(|| a.diagnosis.label().cmp(b.diagnosis.label()))
            })
            .collect();

        Self {
            patient_count: records.len(),
            diagnosis_counts,
        }
    }
}

//! Parquet persistence of patient records
//!
//! Records are flattened into `RecordRow`, converted to an Arrow
//! `RecordBatch` with `serde_arrow` and written with the Parquet
//! `ArrowWriter`. The same format backs the store snapshot and the CLI export.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use arrow::datatypes::FieldRef;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, NaiveDate, Utc};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::{Deserialize, Serialize};
use serde_arrow::schema::{SchemaLike, TracingOptions};

use crate::error::{Result, TriageError};
use crate::models::assessment::{EmergencyFlags, LabValues, PatientAssessmentInput, WarningFlags};
use crate::models::record::PatientRecord;
use crate::models::result::DiagnosisResult;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Flat, column-friendly form of a `PatientRecord`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: u64,
    pub owner_id: Option<String>,
    pub submission_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,

    pub name: String,
    pub age: u32,
    pub gender: String,
    pub date_of_birth: String,

    pub pulse_weak: bool,
    pub consciousness_poor: bool,
    pub oxygen_saturation: Option<f64>,

    pub nausea: bool,
    pub vomiting: bool,
    pub loss_of_appetite: bool,
    pub severe_bleeding: bool,
    pub respiratory_problems: bool,
    pub seizure: bool,
    pub severe_dehydration: bool,
    pub shock_sign: bool,

    pub leukocyte_count: f64,
    pub neutrophil_count: f64,
    pub lymphocyte_count: f64,
    pub crp_level: Option<f64>,
    pub fever_duration: u32,

    pub nlcr_result: f64,
    pub diagnosis: String,
    pub recommendation: String,
    pub sensitivity: Option<f64>,
    pub specificity: Option<f64>,
    pub referral_reasons: Vec<String>,
    pub referral_overrides_diagnosis: bool,
}

impl From<&PatientRecord> for RecordRow {
    fn from(record: &PatientRecord) -> Self {
        let a = &record.assessment;
        let r = &record.result;
        Self {
            id: record.id,
            owner_id: record.owner_id.clone(),
            submission_id: record.submission_id.clone(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
            name: a.name.clone(),
            age: a.age,
            gender: a.gender.to_string(),
            date_of_birth: a.date_of_birth.format("%Y-%m-%d").to_string(),
            pulse_weak: a.emergency.pulse_weak,
            consciousness_poor: a.emergency.consciousness_poor,
            oxygen_saturation: a.emergency.oxygen_saturation,
            nausea: a.warnings.nausea,
            vomiting: a.warnings.vomiting,
            loss_of_appetite: a.warnings.loss_of_appetite,
            severe_bleeding: a.warnings.severe_bleeding,
            respiratory_problems: a.warnings.respiratory_problems,
            seizure: a.warnings.seizure,
            severe_dehydration: a.warnings.severe_dehydration,
            shock_sign: a.warnings.shock_sign,
            leukocyte_count: a.labs.leukocyte_count,
            neutrophil_count: a.labs.neutrophil_count,
            lymphocyte_count: a.labs.lymphocyte_count,
            crp_level: a.labs.crp_level,
            fever_duration: a.labs.fever_duration,
            nlcr_result: r.nlcr_result,
            diagnosis: r.diagnosis.to_string(),
            recommendation: r.recommendation.clone(),
            sensitivity: r.sensitivity,
            specificity: r.specificity,
            referral_reasons: r.referral_reasons.clone(),
            referral_overrides_diagnosis: r.referral_overrides_diagnosis,
        }
    }
}

impl TryFrom<RecordRow> for PatientRecord {
    type Error = TriageError;

    fn try_from(row: RecordRow) -> Result<Self> {
        let timestamp = |field: &str, value: &str| {
            DateTime::parse_from_rfc3339(value)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| TriageError::validation(field, format!("record {}: {e}", row.id)))
        };
        let created_at = timestamp("created_at", &row.created_at)?;
        let updated_at = timestamp("updated_at", &row.updated_at)?;
        let date_of_birth = NaiveDate::parse_from_str(&row.date_of_birth, "%Y-%m-%d")
            .map_err(|e| TriageError::validation("date_of_birth", format!("record {}: {e}", row.id)))?;

        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            submission_id: row.submission_id,
            created_at,
            updated_at,
            assessment: PatientAssessmentInput {
                name: row.name,
                age: row.age,
                gender: row.gender.parse()?,
                date_of_birth,
                emergency: EmergencyFlags {
                    pulse_weak: row.pulse_weak,
                    consciousness_poor: row.consciousness_poor,
                    oxygen_saturation: row.oxygen_saturation,
                },
                warnings: WarningFlags {
                    nausea: row.nausea,
                    vomiting: row.vomiting,
                    loss_of_appetite: row.loss_of_appetite,
                    severe_bleeding: row.severe_bleeding,
                    respiratory_problems: row.respiratory_problems,
                    seizure: row.seizure,
                    severe_dehydration: row.severe_dehydration,
                    shock_sign: row.shock_sign,
                },
                labs: LabValues {
                    leukocyte_count: row.leukocyte_count,
                    neutrophil_count: row.neutrophil_count,
                    lymphocyte_count: row.lymphocyte_count,
                    crp_level: row.crp_level,
                    fever_duration: row.fever_duration,
                },
            },
            result: DiagnosisResult {
                nlcr_result: row.nlcr_result,
                diagnosis: row.diagnosis.parse()?,
                recommendation: row.recommendation,
                sensitivity: row.sensitivity,
                specificity: row.specificity,
                referral_reasons: row.referral_reasons,
                referral_overrides_diagnosis: row.referral_overrides_diagnosis,
            },
        })
    }
}

/// Arrow fields of the record table
pub fn record_fields() -> Result<Vec<FieldRef>> {
    Vec::<FieldRef>::from_type::<RecordRow>(TracingOptions::default())
        .map_err(|e| TriageError::persistence(format!("Schema generation error: {e}")))
}

/// Convert records to a single `RecordBatch`
pub fn records_to_batch(records: &[PatientRecord]) -> Result<RecordBatch> {
    let fields = record_fields()?;
    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    serde_arrow::to_record_batch(&fields, &rows)
        .map_err(|e| TriageError::persistence(format!("Serialization error: {e}")))
}

/// Convert a `RecordBatch` back into records
pub fn batch_to_records(batch: &RecordBatch) -> Result<Vec<PatientRecord>> {
    let rows: Vec<RecordRow> = serde_arrow::from_record_batch(batch)
        .map_err(|e| TriageError::persistence(format!("Failed to deserialize: {e}")))?;
    rows.into_iter().map(PatientRecord::try_from).collect()
}

/// Write records to a Parquet file
///
/// The file is written next to its destination and renamed into place, so
/// readers never observe a half-written snapshot.
pub fn write_records(path: &Path, records: &[PatientRecord]) -> Result<()> {
    log_operation_start("Writing patient records to", path);
    let batch = records_to_batch(records)?;

    let staging = staging_path(path);
    let file = File::create(&staging)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    fs::rename(&staging, path)?;

    log_operation_complete("wrote", path, records.len(), None);
    Ok(())
}

/// Read records from a Parquet file
pub fn read_records(path: &Path) -> Result<Vec<PatientRecord>> {
    log_operation_start("Reading patient records from", path);
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        records.extend(batch_to_records(&batch?)?);
    }

    log_operation_complete("read", path, records.len(), None);
    Ok(records)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

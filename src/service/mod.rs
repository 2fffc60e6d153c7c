//! Patient record orchestration
//!
//! `PatientService` is the only writer of patient records. It normalizes
//! submitted forms, runs the evaluator, enforces ownership and talks to the
//! `RecordStore`. The caller's `Principal` is passed explicitly to every
//! operation.

pub mod stats;
pub mod update;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::algorithm::triage::{assess, evaluate};
use crate::error::{Result, TriageError};
use crate::models::assessment::RawAssessmentForm;
use crate::models::record::{NewPatientRecord, OwnerFilter, PatientRecord, PatientRecordUpdate};
use crate::models::result::DiagnosisResult;
use crate::models::user::Principal;
use crate::store::RecordStore;
use crate::utils::logging::log_assessment;

pub use stats::{DashboardStats, DiagnosisCount};
pub use update::apply_update;

/// Create, read, edit and delete patient records on behalf of a principal
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn RecordStore>,
}

impl PatientService {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    fn owner_filter(principal: &Principal) -> OwnerFilter {
        if principal.is_admin() {
            OwnerFilter::All
        } else {
            OwnerFilter::Owner(principal.user_id.clone())
        }
    }

    /// Evaluate a form without storing anything
    pub fn preview(&self, form: &RawAssessmentForm) -> Result<DiagnosisResult> {
        let (_, result) = assess(form, Self::today())?;
        Ok(result)
    }

    /// Evaluate a form and store it as a record owned by `principal`
    ///
    /// A non-empty `submission_id` that `principal` already used returns the
    /// stored record instead of creating a second one.
    pub async fn create(
        &self,
        principal: &Principal,
        form: &RawAssessmentForm,
        submission_id: Option<String>,
    ) -> Result<PatientRecord> {
        if principal.is_admin() {
            return Err(TriageError::Forbidden(
                "Administrators cannot create assessments".to_string(),
            ));
        }

        let submission_id = submission_id
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if let Some(key) = &submission_id {
            if let Some(existing) = self.store.find_by_submission(&principal.user_id, key).await? {
                log::info!("Record {} returned for repeated submission", existing.id);
                return Ok(existing);
            }
        }

        let (assessment, result) = assess(form, Self::today())?;
        let record = self
            .store
            .create(NewPatientRecord {
                owner_id: Some(principal.user_id.clone()),
                submission_id,
                assessment,
                result,
            })
            .await?;

        log_assessment(
            "created",
            record.id,
            record.result.diagnosis,
            record.result.referral_reasons.len(),
        );
        Ok(record)
    }

    /// Record `id`, if `principal` may see it
    ///
    /// Records owned by someone else are reported as not found.
    pub async fn get(&self, principal: &Principal, id: u64) -> Result<PatientRecord> {
        self.store
            .get(id)
            .await?
            .filter(|record| Self::owner_filter(principal).matches(record))
            .ok_or_else(|| TriageError::record_not_found(id))
    }

    /// Records visible to `principal`, newest first
    pub async fn list(&self, principal: &Principal) -> Result<Vec<PatientRecord>> {
        self.store.list(&Self::owner_filter(principal)).await
    }

    /// Apply a partial update and re-evaluate the record
    ///
    /// The update is merged into the latest stored version inside the store's
    /// write step, so concurrent partial updates of one record all survive.
    pub async fn update(
        &self,
        principal: &Principal,
        id: u64,
        update: &PatientRecordUpdate,
    ) -> Result<PatientRecord> {
        let filter = Self::owner_filter(principal);
        let today = Self::today();
        let edit = move |current: &PatientRecord| -> Result<PatientRecord> {
            if !filter.matches(current) {
                return Err(TriageError::record_not_found(id));
            }
            let mut record = current.clone();
            record.assessment = apply_update(&record.assessment, update, today)?;
            record.result = evaluate(&record.assessment);
            record.updated_at = Utc::now();
            Ok(record)
        };

        let record = self.store.update_with(id, Box::new(edit)).await?;
        log_assessment(
            "updated",
            record.id,
            record.result.diagnosis,
            record.result.referral_reasons.len(),
        );
        Ok(record)
    }

    /// Delete record `id`
    pub async fn delete(&self, principal: &Principal, id: u64) -> Result<()> {
        self.get(principal, id).await?;
        self.store.delete(id).await?;
        log::info!("Record {id} deleted by {}", principal.user_id);
        Ok(())
    }

    /// Dashboard statistics over the records visible to `principal`
    pub async fn dashboard_stats(&self, principal: &Principal) -> Result<DashboardStats> {
        let records = self.list(principal).await?;
        Ok(DashboardStats::from_records(&records))
    }
}

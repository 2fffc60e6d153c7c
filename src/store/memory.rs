//! In-memory record store with optional Parquet snapshot

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use rustc_hash::FxHashMap;
use tokio::sync::Mutex;

use super::{RecordEdit, RecordStore, StoreFuture};
use crate::error::{Result, TriageError};
use crate::models::record::{NewPatientRecord, OwnerFilter, PatientRecord};
use crate::utils::io::{read_records, write_records};
use crate::utils::logging::log_warning;

#[derive(Debug, Clone, Default)]
struct StoreState {
    records: BTreeMap<u64, PatientRecord>,
    next_id: u64,
    /// (owner, submission id) -> record id
    submissions: FxHashMap<(String, String), u64>,
}

impl StoreState {
    fn from_records(records: Vec<PatientRecord>) -> Self {
        let mut state = Self::default();
        for record in records {
            state.next_id = state.next_id.max(record.id);
            state.index_submission(&record);
            state.records.insert(record.id, record);
        }
        state
    }

    fn index_submission(&mut self, record: &PatientRecord) {
        if let (Some(owner), Some(key)) = (&record.owner_id, &record.submission_id) {
            self.submissions.insert((owner.clone(), key.clone()), record.id);
        }
    }

    fn submission(&self, owner: &str, key: &str) -> Option<&PatientRecord> {
        self.submissions
            .get(&(owner.to_string(), key.to_string()))
            .and_then(|id| self.records.get(id))
    }
}

/// Record store kept in memory
///
/// Reads take a `std::sync::RwLock` briefly and never hold it across an
/// `.await`. Mutations are serialized by an async mutex: each one works on a
/// copy of the state, writes the snapshot (when configured) and only then
/// publishes the copy, so a failed snapshot write leaves the store unchanged.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    state: RwLock<StoreState>,
    write_gate: Mutex<()>,
    snapshot: Option<PathBuf>,
}

impl InMemoryRecordStore {
    /// Create an empty store without a snapshot file
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`, without a snapshot file
    #[must_use]
    pub fn from_records(records: Vec<PatientRecord>) -> Self {
        Self {
            state: RwLock::new(StoreState::from_records(records)),
            ..Self::default()
        }
    }

    /// Create a store persisted to a Parquet snapshot at `path`
    ///
    /// Existing records are loaded from `path` if the file exists.
    pub fn with_snapshot(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            read_records(&path)?
        } else {
            log_warning("No snapshot yet, starting with an empty store", Some(&path));
            Vec::new()
        };

        Ok(Self {
            state: RwLock::new(StoreState::from_records(records)),
            write_gate: Mutex::new(()),
            snapshot: Some(path),
        })
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| TriageError::persistence("Record store lock poisoned"))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| TriageError::persistence("Record store lock poisoned"))
    }

    async fn mutate<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut StoreState) -> Result<T> + Send,
        T: Send,
    {
        let _gate = self.write_gate.lock().await;
        let mut next = self.read_state()?.clone();
        let output = apply(&mut next)?;

        if let Some(path) = &self.snapshot {
            let path = path.clone();
            let records: Vec<PatientRecord> = next.records.values().cloned().collect();
            tokio::task::spawn_blocking(move || write_records(&path, &records))
                .await
                .map_err(|e| TriageError::persistence(format!("Snapshot task failed: {e}")))?
                .map_err(|e| {
                    log::error!("Failed to write record snapshot: {e}");
                    TriageError::persistence(format!("Failed to write record snapshot: {e}"))
                })?;
        }

        *self.write_state()? = next;
        Ok(output)
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create<'a>(&'a self, record: NewPatientRecord) -> StoreFuture<'a, PatientRecord> {
        Box::pin(async move {
            let now = Utc::now();
            self.mutate(move |state| {
                if let (Some(owner), Some(key)) = (&record.owner_id, &record.submission_id) {
                    if let Some(existing) = state.submission(owner, key) {
                        return Ok(existing.clone());
                    }
                }

                state.next_id += 1;
                let stored = PatientRecord {
                    id: state.next_id,
                    owner_id: record.owner_id,
                    submission_id: record.submission_id,
                    created_at: now,
                    updated_at: now,
                    assessment: record.assessment,
                    result: record.result,
                };
                state.index_submission(&stored);
                state.records.insert(stored.id, stored.clone());
                Ok(stored)
            })
            .await
        })
    }

    fn get<'a>(&'a self, id: u64) -> StoreFuture<'a, Option<PatientRecord>> {
        Box::pin(async move { Ok(self.read_state()?.records.get(&id).cloned()) })
    }

    fn update_with<'a>(&'a self, id: u64, edit: RecordEdit<'a>) -> StoreFuture<'a, PatientRecord> {
        Box::pin(async move {
            self.mutate(move |state| {
                let current = state
                    .records
                    .get_mut(&id)
                    .ok_or_else(|| TriageError::record_not_found(id))?;
                let record = edit(current)?;
                current.assessment = record.assessment;
                current.result = record.result;
                current.updated_at = record.updated_at.max(current.created_at);
                Ok(current.clone())
            })
            .await
        })
    }

    fn delete<'a>(&'a self, id: u64) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            self.mutate(move |state| {
                let removed = state
                    .records
                    .remove(&id)
                    .ok_or_else(|| TriageError::record_not_found(id))?;
                if let (Some(owner), Some(key)) = (removed.owner_id, removed.submission_id) {
                    state.submissions.remove(&(owner, key));
                }
                Ok(())
            })
            .await
        })
    }

    fn list<'a>(&'a self, filter: &'a OwnerFilter) -> StoreFuture<'a, Vec<PatientRecord>> {
        Box::pin(async move {
            let mut records: Vec<PatientRecord> = self
                .read_state()?
                .records
                .values()
                .filter(|record| filter.matches(record))
                .cloned()
                .collect();
            records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(records)
        })
    }

    fn find_by_submission<'a>(
        &'a self,
        owner_id: &'a str,
        submission_id: &'a str,
    ) -> StoreFuture<'a, Option<PatientRecord>> {
        Box::pin(async move {
            Ok(self
                .read_state()?
                .submission(owner_id, submission_id)
                .cloned())
        })
    }

    fn reassign_unowned<'a>(&'a self, owner_id: &'a str) -> StoreFuture<'a, usize> {
        Box::pin(async move {
            let owner = owner_id.to_string();
            let changed = self
                .mutate(move |state| {
                    let mut changed = Vec::new();
                    for record in state.records.values_mut() {
                        if record.owner_id.is_none() {
                            record.owner_id = Some(owner.clone());
                            changed.push(record.clone());
                        }
                    }
                    for record in &changed {
                        state.index_submission(record);
                    }
                    Ok(changed.len())
                })
                .await?;
            if changed > 0 {
                log::info!("Assigned {changed} unowned records to {owner_id}");
            }
            Ok(changed)
        })
    }
}

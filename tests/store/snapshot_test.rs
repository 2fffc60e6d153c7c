use std::sync::Arc;

use fever_triage::models::{Diagnosis, NumericInput, OwnerFilter, PatientRecordUpdate};
use fever_triage::service::PatientService;
use fever_triage::utils::io::{read_records, write_records};
use fever_triage::{InMemoryRecordStore, RecordStore};

use crate::utils::{bacterial_form, clinician, viral_form};

#[tokio::test]
async fn test_service_writes_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patients.parquet");
    let dokter = clinician("usr_a");

    let store = Arc::new(InMemoryRecordStore::with_snapshot(&path).unwrap());
    let service = PatientService::new(store);
    let viral = service.create(&dokter, &viral_form(), Some("k1".into())).await.unwrap();
    let bacterial = service.create(&dokter, &bacterial_form(), None).await.unwrap();
    service.delete(&dokter, viral.id).await.unwrap();

    let on_disk = read_records(&path).unwrap();
    assert_eq!(on_disk, vec![bacterial.clone()]);

    let reopened = InMemoryRecordStore::with_snapshot(&path).unwrap();
    let records = reopened.list(&OwnerFilter::All).await.unwrap();
    assert_eq!(records, vec![bacterial]);
}

#[tokio::test]
async fn test_unowned_import_is_backfilled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.parquet");

    let service = PatientService::new(Arc::new(InMemoryRecordStore::new()));
    let mut record = service
        .create(&clinician("usr_a"), &viral_form(), None)
        .await
        .unwrap();
    record.owner_id = None;
    write_records(&path, &[record]).unwrap();

    let imported = InMemoryRecordStore::with_snapshot(&path).unwrap();
    assert!(
        imported
            .list(&OwnerFilter::Owner("usr_b".into()))
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(imported.reassign_unowned("usr_b").await.unwrap(), 1);

    let reread = read_records(&path).unwrap();
    assert_eq!(reread[0].owner_id.as_deref(), Some("usr_b"));
}

#[tokio::test]
async fn test_unwritable_snapshot_leaves_store_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("patients.parquet");
    let store = Arc::new(InMemoryRecordStore::with_snapshot(&path).unwrap());
    let service = PatientService::new(store.clone());

    let err = service
        .create(&clinician("usr_a"), &viral_form(), None)
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(store.list(&OwnerFilter::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_duplicate_submissions_store_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patients.parquet");
    let store = Arc::new(InMemoryRecordStore::with_snapshot(&path).unwrap());
    let service = PatientService::new(store.clone());
    let dokter = clinician("usr_a");
    let form = viral_form();

    let attempts = (0..8).map(|_| service.create(&dokter, &form, Some("double-click".into())));
    let records = futures::future::join_all(attempts).await;

    let ids: Vec<u64> = records.into_iter().map(|r| r.unwrap().id).collect();
    assert!(ids.iter().all(|id| *id == ids[0]));
    assert_eq!(store.list(&OwnerFilter::All).await.unwrap().len(), 1);
    assert_eq!(read_records(&path).unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_partial_updates_both_survive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patients.parquet");
    let store = Arc::new(InMemoryRecordStore::with_snapshot(&path).unwrap());
    let service = PatientService::new(store.clone());
    let dokter = clinician("usr_a");
    let record = service.create(&dokter, &viral_form(), None).await.unwrap();
    assert_eq!(record.result.diagnosis, Diagnosis::ViralInfection);

    let crp = PatientRecordUpdate {
        crp_level: Some(NumericInput::Number(45.0)),
        ..PatientRecordUpdate::default()
    };
    let nausea = PatientRecordUpdate {
        nausea: Some(true),
        ..PatientRecordUpdate::default()
    };
    let (first, second) = tokio::join!(
        service.update(&dokter, record.id, &crp),
        service.update(&dokter, record.id, &nausea),
    );
    first.unwrap();
    second.unwrap();

    let stored = service.get(&dokter, record.id).await.unwrap();
    assert_eq!(stored.assessment.labs.crp_level, Some(45.0));
    assert!(stored.assessment.warnings.nausea);
    assert_eq!(stored.result.diagnosis, Diagnosis::BacterialInfection);

    let persisted = read_records(&path).unwrap();
    assert_eq!(persisted, vec![stored]);
}

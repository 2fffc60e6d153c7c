use std::sync::Arc;

use fever_triage::models::{Diagnosis, NumericInput, PatientRecordUpdate};
use fever_triage::service::PatientService;
use fever_triage::{InMemoryRecordStore, TriageError};

use crate::utils::{administrator, bacterial_form, clinician, viral_form};

fn service() -> PatientService {
    PatientService::new(Arc::new(InMemoryRecordStore::new()))
}

#[tokio::test]
async fn test_create_evaluates_and_owns() {
    let service = service();
    let dokter = clinician("usr_a");

    let record = service.create(&dokter, &bacterial_form(), None).await.unwrap();
    assert_eq!(record.owner_id.as_deref(), Some("usr_a"));
    assert_eq!(record.result.diagnosis, Diagnosis::BacterialInfection);
    assert_eq!(record.assessment.labs.crp_level, Some(45.0));
}

#[tokio::test]
async fn test_repeated_submission_returns_first_record() {
    let service = service();
    let dokter = clinician("usr_a");
    let key = Some("form-7f3a".to_string());

    let first = service.create(&dokter, &viral_form(), key.clone()).await.unwrap();
    let second = service.create(&dokter, &viral_form(), key).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(service.list(&dokter).await.unwrap().len(), 1);

    // blank keys do not deduplicate
    service.create(&dokter, &viral_form(), Some("  ".into())).await.unwrap();
    service.create(&dokter, &viral_form(), Some("  ".into())).await.unwrap();
    assert_eq!(service.list(&dokter).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_administrator_cannot_create() {
    let service = service();
    let result = service.create(&administrator(), &viral_form(), None).await;
    assert!(matches!(result, Err(TriageError::Forbidden(_))));
}

#[tokio::test]
async fn test_other_clinicians_records_are_not_found() {
    let service = service();
    let owner = clinician("usr_a");
    let other = clinician("usr_b");
    let record = service.create(&owner, &viral_form(), None).await.unwrap();

    assert!(matches!(
        service.get(&other, record.id).await,
        Err(TriageError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete(&other, record.id).await,
        Err(TriageError::NotFound { .. })
    ));
    assert!(matches!(
        service
            .update(&other, record.id, &PatientRecordUpdate::default())
            .await,
        Err(TriageError::NotFound { .. })
    ));
    assert!(service.list(&other).await.unwrap().is_empty());

    // administrators see and delete everything
    assert_eq!(service.get(&administrator(), record.id).await.unwrap().id, record.id);
    service.delete(&administrator(), record.id).await.unwrap();
    assert!(service.list(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_recomputes_derived_fields() {
    let service = service();
    let dokter = clinician("usr_a");
    let record = service.create(&dokter, &viral_form(), None).await.unwrap();
    assert_eq!(record.result.diagnosis, Diagnosis::ViralInfection);

    let update = PatientRecordUpdate {
        crp_level: Some(NumericInput::Number(60.0)),
        ..PatientRecordUpdate::default()
    };
    let updated = service.update(&dokter, record.id, &update).await.unwrap();
    assert_eq!(updated.result.diagnosis, Diagnosis::BacterialInfection);
    assert_eq!(updated.created_at, record.created_at);
    assert!(updated.updated_at >= record.updated_at);

    let update = PatientRecordUpdate {
        shock_sign: Some(true),
        ..PatientRecordUpdate::default()
    };
    let updated = service.update(&dokter, record.id, &update).await.unwrap();
    assert_eq!(updated.result.diagnosis, Diagnosis::BacterialInfection);
    assert_eq!(
        updated.result.referral_reasons,
        vec!["Shock signs (Tanda-tanda syok)".to_string()]
    );
    assert!(!updated.result.referral_overrides_diagnosis);

    let update = PatientRecordUpdate {
        oxygen_saturation: Some(NumericInput::Text("90".into())),
        ..PatientRecordUpdate::default()
    };
    let updated = service.update(&dokter, record.id, &update).await.unwrap();
    assert_eq!(updated.result.diagnosis, Diagnosis::EmergencyReferral);
    assert_eq!(updated.result.sensitivity, None);
    assert_eq!(updated.assessment.labs.crp_level, Some(60.0));
}

#[tokio::test]
async fn test_dashboard_stats_by_role() {
    let service = service();
    let a = clinician("usr_a");
    let b = clinician("usr_b");
    service.create(&a, &viral_form(), None).await.unwrap();
    service.create(&a, &viral_form(), None).await.unwrap();
    service.create(&a, &bacterial_form(), None).await.unwrap();
    service.create(&b, &bacterial_form(), None).await.unwrap();

    let mine = service.dashboard_stats(&a).await.unwrap();
    assert_eq!(mine.patient_count, 3);
    assert_eq!(mine.diagnosis_counts[0].diagnosis, Diagnosis::ViralInfection);
    assert_eq!(mine.diagnosis_counts[0].count, 2);
    assert_eq!(mine.diagnosis_counts[1].diagnosis, Diagnosis::BacterialInfection);

    let global = service.dashboard_stats(&administrator()).await.unwrap();
    assert_eq!(global.patient_count, 4);
    // 2 and 2: ties are ordered by label
    assert_eq!(global.diagnosis_counts[0].diagnosis, Diagnosis::BacterialInfection);
    assert_eq!(global.diagnosis_counts[1].diagnosis, Diagnosis::ViralInfection);
}

#[tokio::test]
async fn test_list_is_newest_first() {
    let service = service();
    let dokter = clinician("usr_a");
    let first = service.create(&dokter, &viral_form(), None).await.unwrap();
    let second = service.create(&dokter, &bacterial_form(), None).await.unwrap();

    let ids: Vec<u64> = service
        .list(&dokter)
        .await
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

mod common;

use jiff::Timestamp;

use aura_core::keys;
use aura_core::models::evidence::{DOCUMENT, Evidence, IMAGE};
use aura_entities::error::EntityError;

use common::{PNG_BYTES, seeded_entities};

fn lab(id: &str) -> Evidence {
    Evidence {
        id: id.to_string(),
        name: "CBC panel".to_string(),
        kind: "lab".to_string(),
        url: "#lab".to_string(),
        date: Timestamp::constant(1_717_232_400, 0),
        analysis: None,
        media_type: None,
    }
}

#[tokio::test]
async fn add_then_remove_restores_evidence() {
    let (_mem, entities) = seeded_entities().await;
    let patients = &entities.patients;
    let before = patients.get("p-1").await.unwrap().clinical_record.evidence;

    let updated = patients.add_evidence("p-1", lab("ev-lab")).await.unwrap();
    assert_eq!(updated.clinical_record.evidence.len(), before.len() + 1);

    let removed = patients.remove_evidence("p-1", "ev-lab").await.unwrap();
    assert_eq!(removed.id, "ev-lab");

    let after = patients.get("p-1").await.unwrap().clinical_record.evidence;
    assert_eq!(after, before);
}

#[tokio::test]
async fn duplicate_evidence_id_is_rejected() {
    let (_mem, entities) = seeded_entities().await;
    entities.patients.add_evidence("p-2", lab("ev-dup")).await.unwrap();

    let err = entities.patients.add_evidence("p-2", lab("ev-dup")).await.unwrap_err();
    assert!(matches!(err, EntityError::BadRequest(_)));

    let patient = entities.patients.get("p-2").await.unwrap();
    assert_eq!(patient.clinical_record.evidence.len(), 1);
}

#[tokio::test]
async fn unknown_evidence_and_patient_are_not_found() {
    let (_mem, entities) = seeded_entities().await;

    let err = entities.patients.remove_evidence("p-1", "nope").await.unwrap_err();
    assert!(matches!(err, EntityError::NotFound(ref m) if m == "evidence not found"));

    let err = entities.patients.add_evidence("p-999", lab("x")).await.unwrap_err();
    assert!(matches!(err, EntityError::NotFound(ref m) if m == "patient not found"));
}

#[tokio::test]
async fn concurrent_adds_keep_every_sibling() {
    let (_mem, entities) = seeded_entities().await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let patients = entities.patients.clone();
        handles.push(tokio::spawn(async move {
            patients.add_evidence("p-4", lab(&format!("ev-{i}"))).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let patient = entities.patients.get("p-4").await.unwrap();
    assert_eq!(patient.clinical_record.evidence.len(), 8);
}

#[tokio::test]
async fn document_evidence_defaults() {
    let (_mem, entities) = seeded_entities().await;

    let item = entities
        .patients
        .create_document_evidence("p-1", None, None)
        .await
        .unwrap();
    assert_eq!(item.name, "Clinical Document");
    assert_eq!(item.kind, DOCUMENT);
    assert!(item.analysis.is_none());

    let err = entities
        .patients
        .create_document_evidence("p-1", Some("scan"), Some(IMAGE))
        .await
        .unwrap_err();
    assert!(matches!(err, EntityError::BadRequest(_)));
}

#[tokio::test]
async fn image_upload_stores_blob_and_analysis() {
    let (_mem, entities) = seeded_entities().await;

    let item = entities
        .patients
        .attach_image("p-5", "chest.png", "image/png", PNG_BYTES)
        .await
        .unwrap();
    assert_eq!(item.kind, IMAGE);
    assert_eq!(item.media_type.as_deref(), Some("image/png"));
    assert!(!item.analysis.as_deref().unwrap_or_default().is_empty());
    assert_eq!(item.url, format!("/api/patients/p-5/evidence/{}/image", item.id));

    let (media_type, bytes) = entities.patients.evidence_image("p-5", &item.id).await.unwrap();
    assert_eq!(media_type, "image/png");
    assert_eq!(bytes, PNG_BYTES);
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let (_mem, entities) = seeded_entities().await;

    let err = entities
        .patients
        .attach_image("p-5", "notes.txt", "text/plain", b"hello")
        .await
        .unwrap_err();
    assert!(matches!(err, EntityError::BadRequest(_)));
}

#[tokio::test]
async fn upload_to_missing_patient_leaves_no_blob() {
    let (mem, entities) = seeded_entities().await;
    let writes = mem.write_count().await;

    let err = entities
        .patients
        .attach_image("p-404", "chest.png", "image/png", PNG_BYTES)
        .await
        .unwrap_err();
    assert!(matches!(err, EntityError::NotFound(_)));
    assert_eq!(mem.write_count().await, writes);
}

#[tokio::test]
async fn reanalyze_keeps_blob_and_refreshes_analysis() {
    let (_mem, entities) = seeded_entities().await;
    let item = entities
        .patients
        .attach_image("p-6", "knee.jpg", "image/jpeg", PNG_BYTES)
        .await
        .unwrap();

    let updated = entities
        .patients
        .reanalyze_evidence("p-6", &item.id)
        .await
        .unwrap();
    assert_eq!(updated.id, item.id);
    assert_eq!(updated.url, item.url);
    assert!(!updated.analysis.as_deref().unwrap_or_default().is_empty());

    let (_, bytes) = entities.patients.evidence_image("p-6", &item.id).await.unwrap();
    assert_eq!(bytes, PNG_BYTES);
}

#[tokio::test]
async fn reanalyze_rejects_documents() {
    let (_mem, entities) = seeded_entities().await;
    let doc = entities
        .patients
        .create_document_evidence("p-6", Some("Discharge summary"), None)
        .await
        .unwrap();

    let err = entities
        .patients
        .reanalyze_evidence("p-6", &doc.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EntityError::BadRequest(_)));
}

#[tokio::test]
async fn deleting_image_evidence_deletes_its_blob() {
    let (_mem, entities) = seeded_entities().await;
    let item = entities
        .patients
        .attach_image("p-7", "scan.png", "image/png", PNG_BYTES)
        .await
        .unwrap();

    let removed = entities.patients.delete_evidence("p-7", &item.id).await.unwrap();
    assert_eq!(removed.id, item.id);

    let blob = entities
        .patients
        .store()
        .blobs("p-7")
        .unwrap()
        .get_blob(&keys::evidence_image(&item.id))
        .await
        .unwrap();
    assert!(blob.is_none());

    let patient = entities.patients.get("p-7").await.unwrap();
    assert!(patient.evidence(&item.id).is_none());
}

use aura_assist::respond::{fallback_image_analysis, generate_record_aware_response};
use aura_core::models::patient::{Diagnosis, Patient, PatientStatus, Vitals};

fn patient() -> Patient {
    Patient {
        id: "p-7".to_string(),
        mrn: "MRN-100006".to_string(),
        name: "Leon Kennedy".to_string(),
        age: 29,
        status: PatientStatus::Urgent,
        primary_diagnosis: Diagnosis {
            code: "M54.5".to_string(),
            description: "Low back pain".to_string(),
        },
        ..Patient::default()
    }
}

#[test]
fn status_question_reports_status() {
    let reply = generate_record_aware_response(Some(&patient()), "status?");
    assert!(reply.contains("Urgent"));
    assert!(reply.starts_with("Leon"));
}

#[test]
fn responder_is_deterministic() {
    let p = patient();
    for q in ["status?", "any labs?", "what meds?", "hello"] {
        assert_eq!(
            generate_record_aware_response(Some(&p), q),
            generate_record_aware_response(Some(&p), q)
        );
    }
}

#[test]
fn routes_by_keyword() {
    let mut p = patient();
    assert!(generate_record_aware_response(Some(&p), "What is his BP?").contains("No vitals"));

    p.clinical_record.vitals.push(Vitals {
        bp: "120/80".to_string(),
        hr: 64,
        temp: 36.6,
        spo2: 99,
        weight: 80.0,
        recorded_at: jiff::Timestamp::UNIX_EPOCH,
    });
    assert!(generate_record_aware_response(Some(&p), "latest vitals").contains("120/80"));
    assert!(
        generate_record_aware_response(Some(&p), "current medications")
            .contains("no active medications")
    );
    assert!(generate_record_aware_response(Some(&p), "diagnosis code").contains("M54.5"));
    assert!(generate_record_aware_response(Some(&p), "any imaging?").contains("No labs"));
}

#[test]
fn short_keywords_match_whole_words_only() {
    // "bp" inside another word must not route to vitals.
    let reply = generate_record_aware_response(Some(&patient()), "subpoena");
    assert!(reply.contains("MRN-100006"));
}

#[test]
fn unknown_question_gets_summary() {
    let reply = generate_record_aware_response(Some(&patient()), "tell me everything");
    assert!(reply.contains("Leon Kennedy"));
    assert!(reply.contains("Low back pain"));
}

#[test]
fn no_patient_is_still_non_empty() {
    assert!(!generate_record_aware_response(None, "status?").is_empty());
}

#[test]
fn image_fallback_is_non_empty_and_stable() {
    let a = fallback_image_analysis("scan.png", "image/png", 2048);
    assert!(a.contains("scan.png"));
    assert!(a.contains("2.0 KB"));
    assert_eq!(a, fallback_image_analysis("scan.png", "image/png", 2048));
}

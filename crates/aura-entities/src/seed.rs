//! Bootstrap data for an empty deployment.
//!
//! Generated deterministically so every fresh deployment (and every test)
//! starts from identical records.

use jiff::Timestamp;

use aura_core::models::chat::{ChatBoard, ChatMessage};
use aura_core::models::patient::{
    ClinicalRecord, Diagnosis, Gender, HistoryStatus, MedicalHistoryItem, Patient, PatientStatus,
    Treatment, TreatmentStatus, Vitals,
};
use aura_core::models::user::User;

pub const PATIENT_COUNT: usize = 50;

// 2024-06-01T09:00:00Z
const SEED_EPOCH_SECONDS: i64 = 1_717_232_400;

const FIRST_NAMES: &[&str] = &[
    "Jill", "Chris", "Leon", "Claire", "Albert", "Ada", "Barry", "Rebecca", "Hunk", "Carlos",
    "Sherry", "William", "Annette", "Nicholai", "Mikhail", "Tyrell", "Murphy", "Brad", "Marvin",
    "Robert",
];

const LAST_NAMES: &[&str] = &[
    "Valentine", "Redfield", "Kennedy", "Wesker", "Wong", "Burton", "Chambers", "Oliveira",
    "Birkin", "Ginovaef", "Viktor", "Patrick", "Seeker", "Vickers", "Branagh", "Kendo", "Frost",
    "Forest", "Speyer", "Coen",
];

const DIAGNOSES: &[(&str, &str)] = &[
    ("J06.9", "Acute upper respiratory infection, unspecified"),
    ("I10", "Essential (primary) hypertension"),
    ("E11.9", "Type 2 diabetes mellitus without complications"),
    ("M54.5", "Low back pain"),
    ("F41.1", "Generalized anxiety disorder"),
    ("Z00.00", "Encounter for general adult medical examination"),
    ("N39.0", "Urinary tract infection, site not specified"),
    ("K21.9", "Gastro-esophageal reflux disease without esophagitis"),
    ("G43.909", "Migraine, unspecified, not intractable"),
    ("M17.11", "Unilateral primary osteoarthritis, right knee"),
];

const MEDICATIONS: &[(&str, &str)] = &[
    ("Amoxicillin", "500mg three times daily"),
    ("Lisinopril", "10mg daily"),
    ("Metformin", "500mg twice daily"),
    ("Naproxen", "250mg as needed"),
    ("Sertraline", "50mg daily"),
    ("Multivitamin", "1 tablet daily"),
    ("Nitrofurantoin", "100mg twice daily"),
    ("Omeprazole", "20mg daily"),
    ("Sumatriptan", "50mg as needed"),
    ("Acetaminophen", "650mg every 6 hours"),
];

const STATUSES: &[PatientStatus] = &[
    PatientStatus::Stable,
    PatientStatus::Stable,
    PatientStatus::Stable,
    PatientStatus::Observation,
    PatientStatus::Observation,
    PatientStatus::Urgent,
    PatientStatus::Discharged,
];

const CHRONIC_CONDITIONS: &[&str] = &["Asthma", "Hyperlipidemia", "Hypothyroidism", "Eczema"];

fn at(offset_seconds: i64) -> Timestamp {
    Timestamp::constant(SEED_EPOCH_SECONDS - offset_seconds, 0)
}

fn pick<T: Copy>(items: &[T], i: usize, stride: usize, shift: usize) -> T {
    items[(i * stride + shift) % items.len()]
}

pub fn patients() -> Vec<Patient> {
    (0..PATIENT_COUNT).map(patient).collect()
}

fn patient(i: usize) -> Patient {
    let id = format!("p-{}", i + 1);
    let first = pick(FIRST_NAMES, i, 7, 0);
    let last = pick(LAST_NAMES, i, 11, 3);
    let diagnosis = (i * 3) % DIAGNOSES.len();
    let (code, description) = DIAGNOSES[diagnosis];
    let (medication, dosage) = MEDICATIONS[diagnosis];
    let visit_offset = ((i * 37) % 30) as i64 * 86_400 + ((i * 5) % 24) as i64 * 3_600;
    let last_visit = at(visit_offset);

    let mut history = vec![MedicalHistoryItem {
        condition: description.to_string(),
        date: last_visit.strftime("%Y-%m-%d").to_string(),
        status: HistoryStatus::UnderTreatment,
    }];
    if i % 3 == 0 {
        history.push(MedicalHistoryItem {
            condition: pick(CHRONIC_CONDITIONS, i, 1, 0).to_string(),
            date: format!("{}-03-15", 2010 + (i % 12)),
            status: HistoryStatus::Chronic,
        });
    }

    Patient {
        mrn: format!("MRN-{}", 100_000 + i),
        name: format!("{first} {last}"),
        age: 20 + ((i * 13) % 60) as u32,
        gender: if i % 2 == 0 { Gender::Female } else { Gender::Male },
        status: pick(STATUSES, i, 5, 1),
        last_visit,
        primary_diagnosis: Diagnosis {
            code: code.to_string(),
            description: description.to_string(),
        },
        ssn: format!("XXX-XX-{}", 1000 + i),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        phone: format!("(555) {}-{}", 100 + (i * 97) % 900, 1000 + (i * 7919) % 9000),
        avatar_url: format!("https://i.pravatar.cc/150?u={id}"),
        clinical_record: ClinicalRecord {
            history,
            medications: vec![Treatment {
                id: format!("t-{}", i + 1),
                name: medication.to_string(),
                start_date: last_visit.strftime("%Y-%m-%d").to_string(),
                dosage: dosage.to_string(),
                status: TreatmentStatus::Active,
            }],
            vitals: vec![Vitals {
                bp: format!("{}/{}", 110 + (i * 7) % 40, 70 + (i * 3) % 25),
                hr: 60 + ((i * 11) % 40) as u32,
                temp: 36.4 + ((i * 3) % 15) as f64 / 10.0,
                spo2: 94 + ((i * 5) % 6) as u32,
                weight: 55.0 + ((i * 17) % 45) as f64,
                recorded_at: last_visit,
            }],
            evidence: Vec::new(),
        },
        id,
    }
}

pub fn users() -> Vec<User> {
    [("u1", "Dr. Thorne"), ("u2", "Nurse Okafor"), ("u3", "Dr. Reyes")]
        .into_iter()
        .map(|(id, name)| User {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn chat_boards() -> Vec<ChatBoard> {
    let opened = at(3_600).as_millisecond();
    vec![
        ChatBoard {
            id: "c1".to_string(),
            title: "Care Team: Patient p-1".to_string(),
            patient_id: Some("p-1".to_string()),
            messages: vec![ChatMessage {
                id: "m-seed-1".to_string(),
                chat_id: "c1".to_string(),
                user_id: "u1".to_string(),
                text: "Opening a thread for this patient's follow-up.".to_string(),
                ts: opened,
            }],
        },
        ChatBoard {
            id: "c2".to_string(),
            title: "Rounds Handoff".to_string(),
            patient_id: None,
            messages: Vec::new(),
        },
        ChatBoard {
            id: "c3".to_string(),
            title: "Care Team: Patient p-3".to_string(),
            patient_id: Some("p-3".to_string()),
            messages: Vec::new(),
        },
    ]
}

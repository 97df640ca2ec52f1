use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::matching::directory::{DirectoryError, DoctorDirectory, StaticDoctorDirectory};
use crate::matching::domain::{
    ConsultationMode, DoctorId, DoctorProfile, DoctorRecord, PatientProfile, PatientRecord,
    Severity,
};
use crate::matching::evaluation::{ScoreEvaluator, ScoringConfig};
use crate::matching::ranking::Ranker;
use crate::matching::service::RecommendationService;

pub(super) fn patient() -> PatientProfile {
    PatientProfile {
        primary_issue: "ADHD".to_string(),
        severity: Severity::Medium,
        preferred_language: "English".to_string(),
        consultation_mode: ConsultationMode::Offline,
        budget: 700.0,
    }
}

pub(super) fn patient_record() -> PatientRecord {
    PatientRecord {
        primary_issue: Some("ADHD".to_string()),
        severity: Some("medium".to_string()),
        preferred_language: Some("English".to_string()),
        consultation_mode: Some("Offline".to_string()),
        budget: Some(700.0),
    }
}

/// Matches the scenario patient on specialization, language and mode.
pub(super) fn matching_doctor(id: &str, fee: f64, rating: f64) -> DoctorProfile {
    DoctorProfile {
        doctor_id: Some(DoctorId(id.to_string())),
        name: format!("Dr. {id}"),
        specializations: vec!["ADHD".to_string()],
        bio: None,
        languages: vec!["English".to_string()],
        consultation_modes: BTreeSet::from([ConsultationMode::Offline]),
        fee,
        rating,
    }
}

pub(super) fn doctor_record(id: &str, fee: f64, rating: f64) -> DoctorRecord {
    DoctorRecord {
        doctor_id: Some(id.to_string()),
        name: Some(format!("Dr. {id}")),
        specializations: Some(vec!["ADHD".to_string()]),
        bio: None,
        languages: Some(vec!["English".to_string()]),
        consultation_modes: Some(vec!["offline".to_string()]),
        fee: Some(fee),
        rating: Some(rating),
        malformed: None,
    }
}

pub(super) fn evaluator() -> ScoreEvaluator {
    ScoreEvaluator::default()
}

pub(super) fn ranker() -> Ranker {
    Ranker::default()
}

pub(super) fn ids(outcome: &crate::matching::ranking::RankingOutcome) -> Vec<String> {
    outcome
        .recommendations
        .iter()
        .map(|recommendation| {
            recommendation
                .doctor
                .doctor_id
                .as_ref()
                .map(|id| id.0.clone())
                .unwrap_or_default()
        })
        .collect()
}

pub(super) fn service_with(
    records: Vec<DoctorRecord>,
) -> RecommendationService<StaticDoctorDirectory> {
    RecommendationService::new(
        Arc::new(StaticDoctorDirectory::new(records)),
        ScoringConfig::default(),
    )
    .expect("default config is valid")
}

/// Counts lookups so tests can prove the directory was never consulted.
#[derive(Default)]
pub(super) struct CountingDirectory {
    pub(super) calls: AtomicUsize,
}

impl DoctorDirectory for CountingDirectory {
    fn doctors(&self) -> Result<Vec<DoctorRecord>, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![doctor_record("D1", 650.0, 9.4)])
    }
}

pub(super) struct UnavailableDirectory;

impl DoctorDirectory for UnavailableDirectory {
    fn doctors(&self) -> Result<Vec<DoctorRecord>, DirectoryError> {
        Err(DirectoryError::Unavailable("key-value store offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

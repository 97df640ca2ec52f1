use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::common::*;
use crate::matching::domain::ProfileError;
use crate::matching::evaluation::ScoringConfig;
use crate::matching::service::{RecommendationError, RecommendationService};

#[test]
fn recommend_ranks_directory_records() {
    let service = service_with(vec![
        doctor_record("D1", 750.0, 9.4),
        doctor_record("D2", 650.0, 9.4),
        doctor_record("D3", 650.0, 6.0),
    ]);

    let outcome = service
        .recommend(patient_record(), None)
        .expect("recommendation succeeds");

    assert_eq!(ids(&outcome), vec!["D2", "D1"]);
    assert_eq!(outcome.recommendations[0].breakdown.final_score(), 99.4);
}

#[test]
fn explicit_top_n_overrides_service_default() {
    let service = service_with(vec![
        doctor_record("D1", 650.0, 9.0),
        doctor_record("D2", 650.0, 8.0),
        doctor_record("D3", 650.0, 7.0),
    ])
    .with_default_top_n(1);

    assert_eq!(service.default_top_n(), 1);
    let default = service.recommend(patient_record(), None).expect("ranks");
    assert_eq!(default.recommendations.len(), 1);
    let explicit = service.recommend(patient_record(), Some(3)).expect("ranks");
    assert_eq!(explicit.recommendations.len(), 3);
}

#[test]
fn invalid_patient_fails_before_directory_lookup() {
    let directory = Arc::new(CountingDirectory::default());
    let service = RecommendationService::new(directory.clone(), ScoringConfig::default())
        .expect("valid config");
    let mut record = patient_record();
    record.severity = Some("urgent".to_string());

    let error = service
        .recommend(record, None)
        .expect_err("unknown severity is rejected");

    assert!(matches!(
        error,
        RecommendationError::InvalidPatient(ProfileError::UnknownSeverity(ref value)) if value == "urgent"
    ));
    assert_eq!(directory.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn directory_failures_surface_to_the_caller() {
    let service = RecommendationService::new(Arc::new(UnavailableDirectory), ScoringConfig::default())
        .expect("valid config");

    let error = service
        .recommend(patient_record(), None)
        .expect_err("directory offline");

    assert!(matches!(error, RecommendationError::Directory(_)));
}

#[test]
fn rejects_invalid_scoring_config() {
    let mut config = ScoringConfig::default();
    config.rating_scale = 0.0;

    assert!(RecommendationService::new(Arc::new(UnavailableDirectory), config).is_err());
}

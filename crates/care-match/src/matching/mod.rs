//! Patient-to-doctor matching: intake validation, weighted scoring and deterministic ranking.
//!
//! The evaluator and ranker are pure; directories and the HTTP router are the plumbing that
//! feeds them records and hands their output to callers.

pub mod directory;
pub mod domain;
pub mod evaluation;
pub mod ranking;
pub mod report;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use directory::{
    load_patient_record, CsvDoctorDirectory, DirectoryError, DoctorDirectory,
    JsonDoctorDirectory, StaticDoctorDirectory,
};
pub use domain::{
    ConsultationMode, DoctorId, DoctorProfile, DoctorRecord, PatientProfile, PatientRecord,
    ProfileError, Severity,
};
pub use evaluation::{
    BudgetPolicy, Criterion, CriterionWeights, EvaluationError, ProfileSubject, ScoreBreakdown,
    ScoreComponent, ScoreEvaluator, ScoringConfig, ScoringConfigError, SeverityMultipliers,
};
pub use ranking::{
    EmptyCandidateSet, Ranker, RankingError, RankingOutcome, Recommendation, SkippedCandidate,
    DEFAULT_TOP_N,
};
pub use report::{BreakdownView, RecommendationReport, RecommendationView};
pub use router::{recommendation_router, RecommendationRequest};
pub use service::{RecommendationError, RecommendationService};

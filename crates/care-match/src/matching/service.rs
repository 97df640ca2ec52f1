use std::sync::Arc;

use tracing::info;

use super::directory::{DirectoryError, DoctorDirectory};
use super::domain::{PatientProfile, PatientRecord, ProfileError};
use super::evaluation::{ScoreEvaluator, ScoringConfig, ScoringConfigError};
use super::ranking::{Ranker, RankingError, RankingOutcome, DEFAULT_TOP_N};

/// Service composing a doctor directory with the ranker.
pub struct RecommendationService<D> {
    directory: Arc<D>,
    ranker: Arc<Ranker>,
    default_top_n: usize,
}

impl<D> RecommendationService<D>
where
    D: DoctorDirectory + 'static,
{
    pub fn new(directory: Arc<D>, config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        let ranker = Ranker::new(ScoreEvaluator::new(config)?);
        Ok(Self::with_ranker(directory, ranker))
    }

    pub fn with_ranker(directory: Arc<D>, ranker: Ranker) -> Self {
        Self {
            directory,
            ranker: Arc::new(ranker),
            default_top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_default_top_n(mut self, top_n: usize) -> Self {
        self.default_top_n = top_n;
        self
    }

    pub fn default_top_n(&self) -> usize {
        self.default_top_n
    }

    /// Validates the patient, loads the roster and ranks it.
    ///
    /// An invalid patient fails before the directory is consulted.
    pub fn recommend(
        &self,
        patient: PatientRecord,
        top_n: Option<usize>,
    ) -> Result<RankingOutcome, RecommendationError> {
        let patient =
            PatientProfile::try_from(patient).map_err(RecommendationError::InvalidPatient)?;
        let doctors = self.directory.doctors()?;
        let top_n = top_n.unwrap_or(self.default_top_n);

        info!(
            primary_issue = %patient.primary_issue,
            severity = patient.severity.label(),
            candidates = doctors.len(),
            top_n,
            "ranking doctors for patient"
        );

        Ok(self.ranker.rank(&patient, &doctors, top_n)?)
    }
}

/// Error raised by the recommendation service.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("invalid patient profile: {0}")]
    InvalidPatient(#[source] ProfileError),
    #[error(transparent)]
    Ranking(#[from] RankingError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

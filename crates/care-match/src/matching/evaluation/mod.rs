mod config;
mod rules;

pub use config::{
    BudgetPolicy, CriterionWeights, ScoringConfig, ScoringConfigError, SeverityMultipliers,
};

use std::fmt;

use super::domain::{DoctorProfile, PatientProfile, ProfileError};
use serde::{Deserialize, Serialize};

/// Stateless evaluator applying a validated [`ScoringConfig`] to one patient/doctor pair.
#[derive(Debug, Clone)]
pub struct ScoreEvaluator {
    config: ScoringConfig,
}

impl ScoreEvaluator {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn validate_patient(&self, patient: &PatientProfile) -> Result<(), EvaluationError> {
        patient
            .validate()
            .map_err(|source| EvaluationError::InvalidProfile {
                subject: ProfileSubject::Patient,
                source,
            })
    }

    pub fn validate_doctor(&self, doctor: &DoctorProfile) -> Result<(), EvaluationError> {
        doctor
            .validate(self.config.rating_scale)
            .map_err(|source| EvaluationError::InvalidProfile {
                subject: ProfileSubject::Doctor,
                source,
            })
    }

    /// Scores one doctor for one patient. Pure: no I/O and no shared state.
    pub fn evaluate(
        &self,
        patient: &PatientProfile,
        doctor: &DoctorProfile,
    ) -> Result<ScoreBreakdown, EvaluationError> {
        self.validate_patient(patient)?;
        self.validate_doctor(doctor)?;
        Ok(rules::score_pair(patient, doctor, &self.config))
    }
}

impl Default for ScoreEvaluator {
    fn default() -> Self {
        Self {
            config: ScoringConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSubject {
    Patient,
    Doctor,
}

impl fmt::Display for ProfileSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileSubject::Patient => f.write_str("patient"),
            ProfileSubject::Doctor => f.write_str("doctor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("invalid {subject} profile: {source}")]
    InvalidProfile {
        subject: ProfileSubject,
        source: ProfileError,
    },
}

/// The five scored criteria, in breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Specialization,
    Language,
    Availability,
    Budget,
    Rating,
}

impl Criterion {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Specialization,
            Self::Language,
            Self::Availability,
            Self::Budget,
            Self::Rating,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Specialization => "Specialization",
            Self::Language => "Language",
            Self::Availability => "Availability",
            Self::Budget => "Budget",
            Self::Rating => "Rating",
        }
    }
}

/// Discrete contribution to a score, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub criterion: Criterion,
    pub score: f64,
    pub max: f64,
    pub notes: String,
}

/// Per-criterion scores plus their sum.
///
/// Only built from the five components, so `final_score` is always their exact sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    specialization: f64,
    language: f64,
    availability: f64,
    budget: f64,
    rating: f64,
    final_score: f64,
    components: Vec<ScoreComponent>,
}

impl ScoreBreakdown {
    pub(crate) fn from_components(
        specialization: ScoreComponent,
        language: ScoreComponent,
        availability: ScoreComponent,
        budget: ScoreComponent,
        rating: ScoreComponent,
    ) -> Self {
        let final_score = specialization.score
            + language.score
            + availability.score
            + budget.score
            + rating.score;

        Self {
            specialization: specialization.score,
            language: language.score,
            availability: availability.score,
            budget: budget.score,
            rating: rating.score,
            final_score,
            components: vec![specialization, language, availability, budget, rating],
        }
    }

    pub fn specialization(&self) -> f64 {
        self.specialization
    }

    pub fn language(&self) -> f64 {
        self.language
    }

    pub fn availability(&self) -> f64 {
        self.availability
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn final_score(&self) -> f64 {
        self.final_score
    }

    pub fn score(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Specialization => self.specialization,
            Criterion::Language => self.language,
            Criterion::Availability => self.availability,
            Criterion::Budget => self.budget,
            Criterion::Rating => self.rating,
        }
    }

    pub fn components(&self) -> &[ScoreComponent] {
        &self.components
    }
}

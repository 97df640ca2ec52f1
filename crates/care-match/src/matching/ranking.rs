use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{DoctorProfile, DoctorRecord, PatientProfile, ProfileError};
use super::evaluation::{EvaluationError, ProfileSubject, ScoreBreakdown, ScoreEvaluator};

/// Number of recommendations returned when the caller does not ask for a specific count.
pub const DEFAULT_TOP_N: usize = 2;

/// Scores every candidate, orders them with the tie-break chain and keeps the top N.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    evaluator: ScoreEvaluator,
}

impl Ranker {
    pub fn new(evaluator: ScoreEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &ScoreEvaluator {
        &self.evaluator
    }

    /// Ranks untrusted doctor records. Records that fail validation are skipped and reported.
    pub fn rank(
        &self,
        patient: &PatientProfile,
        doctors: &[DoctorRecord],
        top_n: usize,
    ) -> Result<RankingOutcome, RankingError> {
        let candidates = doctors
            .iter()
            .map(|record| (record.label(), DoctorProfile::try_from(record)));
        self.rank_candidates(patient, candidates, top_n)
    }

    /// Ranks doctor profiles that were built in code rather than parsed from records.
    pub fn rank_profiles(
        &self,
        patient: &PatientProfile,
        doctors: &[DoctorProfile],
        top_n: usize,
    ) -> Result<RankingOutcome, RankingError> {
        let candidates = doctors
            .iter()
            .map(|doctor| (doctor.label(), Ok(doctor.clone())));
        self.rank_candidates(patient, candidates, top_n)
    }

    fn rank_candidates<I>(
        &self,
        patient: &PatientProfile,
        candidates: I,
        top_n: usize,
    ) -> Result<RankingOutcome, RankingError>
    where
        I: IntoIterator<Item = (String, Result<DoctorProfile, ProfileError>)>,
    {
        self.evaluator
            .validate_patient(patient)
            .map_err(RankingError::InvalidPatient)?;

        let mut scored = Vec::new();
        let mut skipped = Vec::new();
        let mut candidates_supplied = 0;

        for (candidate_index, (label, parsed)) in candidates.into_iter().enumerate() {
            candidates_supplied += 1;

            let evaluated = parsed
                .map_err(|source| EvaluationError::InvalidProfile {
                    subject: ProfileSubject::Doctor,
                    source,
                })
                .and_then(|doctor| {
                    self.evaluator
                        .evaluate(patient, &doctor)
                        .map(|breakdown| (doctor, breakdown))
                });

            match evaluated {
                Ok((doctor, breakdown)) => {
                    debug!(
                        candidate_index,
                        doctor = %label,
                        final_score = breakdown.final_score(),
                        "scored candidate"
                    );
                    scored.push(ScoredCandidate {
                        candidate_index,
                        doctor,
                        breakdown,
                    });
                }
                Err(error) => {
                    warn!(candidate_index, doctor = %label, %error, "skipping invalid candidate");
                    skipped.push(SkippedCandidate {
                        candidate_index,
                        label,
                        reason: error.to_string(),
                    });
                }
            }
        }

        let candidates_scored = scored.len();

        // Stable: candidates tied on every key keep their input order.
        scored.sort_by(compare_candidates);
        scored.truncate(top_n);

        let recommendations: Vec<Recommendation> = scored
            .into_iter()
            .enumerate()
            .map(|(offset, candidate)| Recommendation {
                position: offset + 1,
                candidate_index: candidate.candidate_index,
                doctor: candidate.doctor,
                breakdown: candidate.breakdown,
            })
            .collect();

        info!(
            candidates_supplied,
            candidates_scored,
            skipped = skipped.len(),
            returned = recommendations.len(),
            "ranking complete"
        );

        Ok(RankingOutcome {
            recommendations,
            skipped,
            candidates_supplied,
            candidates_scored,
        })
    }
}

struct ScoredCandidate {
    candidate_index: usize,
    doctor: DoctorProfile,
    breakdown: ScoreBreakdown,
}

/// Final score, then specialization, then rating component (all descending), then fee ascending.
/// Exact comparisons only; no epsilon.
fn compare_candidates(left: &ScoredCandidate, right: &ScoredCandidate) -> Ordering {
    descending(left.breakdown.final_score(), right.breakdown.final_score())
        .then_with(|| {
            descending(
                left.breakdown.specialization(),
                right.breakdown.specialization(),
            )
        })
        .then_with(|| descending(left.breakdown.rating(), right.breakdown.rating()))
        .then_with(|| ascending(left.doctor.fee, right.doctor.fee))
}

fn descending(left: f64, right: f64) -> Ordering {
    right.partial_cmp(&left).unwrap_or(Ordering::Equal)
}

fn ascending(left: f64, right: f64) -> Ordering {
    left.partial_cmp(&right).unwrap_or(Ordering::Equal)
}

/// One ranked doctor with the breakdown that placed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// 1-based rank in the returned list.
    pub position: usize,
    /// Index of the doctor in the candidate sequence handed to the ranker.
    pub candidate_index: usize,
    pub doctor: DoctorProfile,
    pub breakdown: ScoreBreakdown,
}

/// A candidate excluded from ranking because its profile was invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedCandidate {
    pub candidate_index: usize,
    pub label: String,
    pub reason: String,
}

/// Why a ranking produced no recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCandidateSet {
    NoCandidatesSupplied,
    NoValidCandidates,
}

impl EmptyCandidateSet {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoCandidatesSupplied => "no doctor candidates were supplied",
            Self::NoValidCandidates => "no supplied doctor passed validation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingOutcome {
    pub recommendations: Vec<Recommendation>,
    pub skipped: Vec<SkippedCandidate>,
    pub candidates_supplied: usize,
    pub candidates_scored: usize,
}

impl RankingOutcome {
    pub fn empty_reason(&self) -> Option<EmptyCandidateSet> {
        if self.candidates_supplied == 0 {
            Some(EmptyCandidateSet::NoCandidatesSupplied)
        } else if self.candidates_scored == 0 {
            Some(EmptyCandidateSet::NoValidCandidates)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankingError {
    #[error("ranking aborted: {0}")]
    InvalidPatient(#[source] EvaluationError),
}

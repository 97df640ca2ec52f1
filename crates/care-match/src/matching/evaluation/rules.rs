use super::super::domain::{normalize, DoctorProfile, PatientProfile};
use super::config::{BudgetPolicy, ScoringConfig};
use super::{Criterion, ScoreBreakdown, ScoreComponent};

pub(crate) fn score_pair(
    patient: &PatientProfile,
    doctor: &DoctorProfile,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    ScoreBreakdown::from_components(
        score_specialization(patient, doctor, config),
        score_language(patient, doctor, config),
        score_availability(patient, doctor, config),
        score_budget(patient, doctor, config),
        score_rating(doctor, config),
    )
}

#[derive(Debug, Clone, PartialEq)]
enum SpecializationMatch {
    Exact(String),
    Related(String),
    Unrelated,
}

fn match_specialization(
    patient: &PatientProfile,
    doctor: &DoctorProfile,
    config: &ScoringConfig,
) -> SpecializationMatch {
    let issue = normalize(&patient.primary_issue);

    if let Some(exact) = doctor
        .specializations
        .iter()
        .find(|specialization| normalize(specialization) == issue)
    {
        return SpecializationMatch::Exact(exact.clone());
    }

    if let Some(overlap) = doctor.specializations.iter().find(|specialization| {
        let specialization = normalize(specialization);
        !specialization.is_empty()
            && (specialization.contains(&issue) || issue.contains(&specialization))
    }) {
        return SpecializationMatch::Related(format!("overlaps '{overlap}'"));
    }

    let mut text = doctor.specializations.join(" ");
    if let Some(bio) = &doctor.bio {
        text.push(' ');
        text.push_str(bio);
    }
    let text = text.to_lowercase();

    config
        .keywords_for(&issue)
        .iter()
        .find(|keyword| text.contains(&normalize(keyword)))
        .map(|keyword| SpecializationMatch::Related(format!("keyword '{keyword}'")))
        .unwrap_or(SpecializationMatch::Unrelated)
}

fn score_specialization(
    patient: &PatientProfile,
    doctor: &DoctorProfile,
    config: &ScoringConfig,
) -> ScoreComponent {
    let max = config.weights.specialization;
    let multiplier = config
        .severity_multipliers
        .for_severity(patient.severity);

    let (base, detail) = match match_specialization(patient, doctor, config) {
        SpecializationMatch::Exact(name) => (max, format!("exact match on '{name}'")),
        SpecializationMatch::Related(reason) => {
            (config.related_match_score, format!("related match, {reason}"))
        }
        SpecializationMatch::Unrelated => (
            0.0,
            format!("no specialization related to '{}'", patient.primary_issue),
        ),
    };

    let score = bounded(base * multiplier, max);
    ScoreComponent {
        criterion: Criterion::Specialization,
        score,
        max,
        notes: format!(
            "{detail}; base {base:.1} x {multiplier} ({} severity)",
            patient.severity.label()
        ),
    }
}

fn score_language(
    patient: &PatientProfile,
    doctor: &DoctorProfile,
    config: &ScoringConfig,
) -> ScoreComponent {
    let max = config.weights.language;
    let (score, notes) = if doctor.speaks(&patient.preferred_language) {
        (max, format!("speaks {}", patient.preferred_language))
    } else {
        (
            config.language_mismatch_credit,
            format!("does not speak {}", patient.preferred_language),
        )
    };

    ScoreComponent {
        criterion: Criterion::Language,
        score: bounded(score, max),
        max,
        notes,
    }
}

fn score_availability(
    patient: &PatientProfile,
    doctor: &DoctorProfile,
    config: &ScoringConfig,
) -> ScoreComponent {
    let max = config.weights.availability;
    let mode = patient.consultation_mode;
    let (score, notes) = if doctor.offers(mode) {
        (max, format!("offers {} consultations", mode.label()))
    } else {
        (0.0, format!("no {} consultations", mode.label()))
    };

    ScoreComponent {
        criterion: Criterion::Availability,
        score,
        max,
        notes,
    }
}

fn score_budget(
    patient: &PatientProfile,
    doctor: &DoctorProfile,
    config: &ScoringConfig,
) -> ScoreComponent {
    let max = config.weights.budget;
    let (fee, budget) = (doctor.fee, patient.budget);

    let (score, notes) = if fee <= budget {
        (max, format!("fee {fee:.2} within budget {budget:.2}"))
    } else {
        let score = match config.budget_policy {
            BudgetPolicy::HardCutoff => 0.0,
            BudgetPolicy::LinearDecay { tolerance } => {
                let band = budget * tolerance;
                if band > 0.0 {
                    max * (1.0 - (fee - budget) / band)
                } else {
                    0.0
                }
            }
        };
        (score, format!("fee {fee:.2} exceeds budget {budget:.2}"))
    };

    ScoreComponent {
        criterion: Criterion::Budget,
        score: bounded(score, max),
        max,
        notes,
    }
}

fn score_rating(doctor: &DoctorProfile, config: &ScoringConfig) -> ScoreComponent {
    let max = config.weights.rating;
    let score = bounded(doctor.rating * (max / config.rating_scale), max);

    ScoreComponent {
        criterion: Criterion::Rating,
        score,
        max,
        notes: format!("rated {} of {}", doctor.rating, config.rating_scale),
    }
}

fn bounded(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(max)
}

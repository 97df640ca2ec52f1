use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::super::domain::{normalize, Severity};
use super::Criterion;

/// Scoring rubric: criterion maxima, severity multipliers and partial-credit policies.
///
/// The evaluator only ever reads this value, so several rubrics can be compared side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: CriterionWeights,
    pub severity_multipliers: SeverityMultipliers,
    /// Base specialization score for a related (non-exact) match, before the severity multiplier.
    pub related_match_score: f64,
    /// Credit awarded when the doctor does not speak the preferred language.
    pub language_mismatch_credit: f64,
    pub budget_policy: BudgetPolicy,
    /// Upper bound of the doctor rating scale (10, or 5 for five-star data).
    pub rating_scale: f64,
    /// Lower-cased issue name to keywords that indicate a related specialization.
    pub issue_keywords: BTreeMap<String, Vec<String>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: CriterionWeights::default(),
            severity_multipliers: SeverityMultipliers::default(),
            related_match_score: 30.0,
            language_mismatch_credit: 0.0,
            budget_policy: BudgetPolicy::default(),
            rating_scale: 10.0,
            issue_keywords: default_issue_keywords(),
        }
    }
}

impl ScoringConfig {
    /// Reads a JSON rubric; omitted fields keep their defaults.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScoringConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: ScoringConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let mut total = 0.0;
        for criterion in Criterion::ordered() {
            let weight = self.weights.max_for(criterion);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoringConfigError::InvalidWeight { criterion, weight });
            }
            total += weight;
        }
        if total > 100.0 {
            return Err(ScoringConfigError::WeightTotal { total });
        }

        let multipliers = &self.severity_multipliers;
        let ordered = Severity::ordered().map(|severity| multipliers.for_severity(severity));
        if ordered.iter().any(|value| !value.is_finite() || *value < 0.0)
            || ordered.windows(2).any(|pair| pair[0] > pair[1])
        {
            return Err(ScoringConfigError::MultiplierOrder {
                low: multipliers.low,
                medium: multipliers.medium,
                high: multipliers.high,
            });
        }

        if !(0.0..=self.weights.specialization).contains(&self.related_match_score) {
            return Err(ScoringConfigError::OutOfBounds {
                field: "related_match_score",
                value: self.related_match_score,
            });
        }
        if !(0.0..=self.weights.language).contains(&self.language_mismatch_credit) {
            return Err(ScoringConfigError::OutOfBounds {
                field: "language_mismatch_credit",
                value: self.language_mismatch_credit,
            });
        }
        if !self.rating_scale.is_finite() || self.rating_scale <= 0.0 {
            return Err(ScoringConfigError::OutOfBounds {
                field: "rating_scale",
                value: self.rating_scale,
            });
        }
        if let BudgetPolicy::LinearDecay { tolerance } = self.budget_policy {
            if !tolerance.is_finite() || tolerance <= 0.0 {
                return Err(ScoringConfigError::OutOfBounds {
                    field: "budget_policy.tolerance",
                    value: tolerance,
                });
            }
        }

        Ok(())
    }

    pub(crate) fn keywords_for(&self, issue: &str) -> &[String] {
        let issue = normalize(issue);
        self.issue_keywords
            .iter()
            .find(|(key, _)| normalize(key) == issue)
            .map(|(_, keywords)| keywords.as_slice())
            .unwrap_or(&[])
    }
}

/// Maximum points per criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriterionWeights {
    pub specialization: f64,
    pub language: f64,
    pub availability: f64,
    pub budget: f64,
    pub rating: f64,
}

impl CriterionWeights {
    pub fn max_for(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Specialization => self.specialization,
            Criterion::Language => self.language,
            Criterion::Availability => self.availability,
            Criterion::Budget => self.budget,
            Criterion::Rating => self.rating,
        }
    }

    pub fn total(&self) -> f64 {
        Criterion::ordered()
            .iter()
            .map(|criterion| self.max_for(*criterion))
            .sum()
    }
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            specialization: 40.0,
            language: 20.0,
            availability: 15.0,
            budget: 15.0,
            rating: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityMultipliers {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl SeverityMultipliers {
    pub fn for_severity(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
        }
    }
}

impl Default for SeverityMultipliers {
    fn default() -> Self {
        Self {
            low: 0.7,
            medium: 1.0,
            high: 1.3,
        }
    }
}

/// How the budget criterion treats a fee above the patient's budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BudgetPolicy {
    /// Any fee above budget scores zero.
    HardCutoff,
    /// Score falls linearly to zero at `budget * (1 + tolerance)`.
    LinearDecay { tolerance: f64 },
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        BudgetPolicy::LinearDecay { tolerance: 0.5 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("weight for {} must be a non-negative number (found {weight})", .criterion.label())]
    InvalidWeight { criterion: Criterion, weight: f64 },
    #[error("criterion weights sum to {total}, above the 100 point scale")]
    WeightTotal { total: f64 },
    #[error("severity multipliers must satisfy 0 <= low <= medium <= high (found {low}/{medium}/{high})")]
    MultiplierOrder { low: f64, medium: f64, high: f64 },
    #[error("`{field}` out of bounds (found {value})")]
    OutOfBounds { field: &'static str, value: f64 },
    #[error("failed to read scoring config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scoring config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_issue_keywords() -> BTreeMap<String, Vec<String>> {
    [
        (
            "postpartum anxiety",
            &["postpartum", "maternal", "after childbirth", "pregnancy"][..],
        ),
        ("anxiety", &["anxiety", "panic", "stress", "cbt"][..]),
        ("adhd", &["adhd", "attention", "hyperactivity", "child"][..]),
        (
            "addiction",
            &["addiction", "alcohol", "drug", "rehabilitation"][..],
        ),
        (
            "workplace stress",
            &["workplace", "burnout", "executive", "professional"][..],
        ),
    ]
    .into_iter()
    .map(|(issue, keywords)| {
        (
            issue.to_string(),
            keywords.iter().map(|keyword| keyword.to_string()).collect(),
        )
    })
    .collect()
}

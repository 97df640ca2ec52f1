use serde::Serialize;

use super::evaluation::ScoreComponent;
use super::ranking::{EmptyCandidateSet, RankingOutcome, Recommendation, SkippedCandidate};

#[derive(Debug, Clone, Serialize)]
pub struct BreakdownView {
    pub specialization: f64,
    pub language: f64,
    pub availability: f64,
    pub budget: f64,
    pub rating: f64,
    pub final_score: f64,
    pub components: Vec<ScoreComponent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    pub name: String,
    pub specializations: Vec<String>,
    pub languages: Vec<String>,
    pub consultation_modes: Vec<&'static str>,
    pub fee: f64,
    pub rating: f64,
    pub breakdown: BreakdownView,
}

impl From<&Recommendation> for RecommendationView {
    fn from(recommendation: &Recommendation) -> Self {
        let doctor = &recommendation.doctor;
        let breakdown = &recommendation.breakdown;

        Self {
            position: recommendation.position,
            doctor_id: doctor.doctor_id.as_ref().map(|id| id.0.clone()),
            name: doctor.name.clone(),
            specializations: doctor.specializations.clone(),
            languages: doctor.languages.clone(),
            consultation_modes: doctor
                .consultation_modes
                .iter()
                .map(|mode| mode.label())
                .collect(),
            fee: doctor.fee,
            rating: doctor.rating,
            breakdown: BreakdownView {
                specialization: breakdown.specialization(),
                language: breakdown.language(),
                availability: breakdown.availability(),
                budget: breakdown.budget(),
                rating: breakdown.rating(),
                final_score: breakdown.final_score(),
                components: breakdown.components().to_vec(),
            },
        }
    }
}

/// Caller-facing summary of a ranking call.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub recommendations: Vec<RecommendationView>,
    pub skipped: Vec<SkippedCandidate>,
    pub candidates_supplied: usize,
    pub candidates_scored: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_reason: Option<EmptyCandidateSet>,
}

impl RecommendationReport {
    pub fn from_outcome(outcome: &RankingOutcome) -> Self {
        Self {
            recommendations: outcome
                .recommendations
                .iter()
                .map(RecommendationView::from)
                .collect(),
            skipped: outcome.skipped.clone(),
            candidates_supplied: outcome.candidates_supplied,
            candidates_scored: outcome.candidates_scored,
            empty_reason: outcome.empty_reason(),
        }
    }

    /// Console listing with one decimal place per score.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "Recommended Doctors (Top {})\n",
            self.recommendations.len()
        );

        if let Some(reason) = self.empty_reason {
            out.push_str(&format!("\nNo recommendations: {}\n", reason.label()));
        }

        for view in &self.recommendations {
            out.push_str(&format!("\n{}. {}\n", view.position, view.name));
            if let Some(id) = &view.doctor_id {
                out.push_str(&format!("   Doctor ID      : {id}\n"));
            }
            out.push_str(&format!(
                "   Specialization : {}\n",
                view.specializations.join(", ")
            ));
            out.push_str(&format!("   Rating         : {}\n", view.rating));
            out.push_str(&format!("   Fee            : {:.2}\n", view.fee));
            out.push_str(&format!(
                "   Availability   : {}\n",
                view.consultation_modes.join(", ")
            ));
            out.push_str("   Score Breakdown:\n");
            for component in &view.breakdown.components {
                out.push_str(&format!(
                    "     - {:<15}: {:.1} / {:.0}\n",
                    component.criterion.label(),
                    component.score,
                    component.max
                ));
            }
            out.push_str(&format!(
                "   Final Score    : {:.1}/100\n",
                view.breakdown.final_score
            ));
        }

        if !self.skipped.is_empty() {
            out.push_str(&format!("\nSkipped candidates ({})\n", self.skipped.len()));
            for skipped in &self.skipped {
                out.push_str(&format!(
                    "- #{} {}: {}\n",
                    skipped.candidate_index, skipped.label, skipped.reason
                ));
            }
        }

        out
    }
}

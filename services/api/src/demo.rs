use crate::infra::{load_scoring_config, sample_patient, ConfiguredDirectory};
use care_match::error::AppError;
use care_match::matching::{
    load_patient_record, PatientRecord, RecommendationReport, RecommendationService, DEFAULT_TOP_N,
};
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Patient JSON file
    #[arg(long)]
    pub(crate) patient: PathBuf,
    /// Doctor roster (.csv or .json). Defaults to the bundled sample roster.
    #[arg(long)]
    pub(crate) doctors: Option<PathBuf>,
    /// Number of recommendations to return
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub(crate) top_n: usize,
    /// Optional JSON file overriding the default scoring weights
    #[arg(long)]
    pub(crate) scoring_config: Option<PathBuf>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Primary issue for the sample patient (defaults to ADHD)
    #[arg(long)]
    pub(crate) issue: Option<String>,
    /// Severity for the sample patient: low, medium or high
    #[arg(long)]
    pub(crate) severity: Option<String>,
    /// Budget for the sample patient
    #[arg(long)]
    pub(crate) budget: Option<f64>,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        patient,
        doctors,
        top_n,
        scoring_config,
        json,
    } = args;

    let patient = load_patient_record(&patient)?;
    let directory = ConfiguredDirectory::from_path(doctors.as_deref());
    let source = directory.source_label();
    let report = recommend(directory, patient, top_n, scoring_config)?;

    let output = if json {
        render_json(&report)?
    } else {
        render_text(&report, &source)
    };
    print!("{output}");
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        issue,
        severity,
        budget,
    } = args;

    let mut patient = sample_patient();
    if issue.is_some() {
        patient.primary_issue = issue;
    }
    if severity.is_some() {
        patient.severity = severity;
    }
    if budget.is_some() {
        patient.budget = budget;
    }

    println!("Care match demo");
    println!(
        "Patient: {} ({} severity) | {} | {} | budget {:.2}",
        patient.primary_issue.as_deref().unwrap_or("-"),
        patient.severity.as_deref().unwrap_or("-"),
        patient.preferred_language.as_deref().unwrap_or("-"),
        patient.consultation_mode.as_deref().unwrap_or("-"),
        patient.budget.unwrap_or_default()
    );

    let directory = ConfiguredDirectory::from_path(None);
    let source = directory.source_label();
    let report = recommend(directory, patient, DEFAULT_TOP_N, None)?;
    print!("{}", render_text(&report, &source));
    Ok(())
}

fn recommend(
    directory: ConfiguredDirectory,
    patient: PatientRecord,
    top_n: usize,
    scoring_config: Option<PathBuf>,
) -> Result<RecommendationReport, AppError> {
    let scoring = load_scoring_config(scoring_config.as_ref())?;
    let service = RecommendationService::new(Arc::new(directory), scoring)?;
    let outcome = service.recommend(patient, Some(top_n))?;
    Ok(RecommendationReport::from_outcome(&outcome))
}

/// Machine-readable output: the report and nothing else.
fn render_json(report: &RecommendationReport) -> Result<String, AppError> {
    let mut rendered = serde_json::to_string_pretty(report)
        .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
    rendered.push('\n');
    Ok(rendered)
}

fn render_text(report: &RecommendationReport, source: &str) -> String {
    format!(
        "Generated {}\nRanked {} of {} doctors from {source}\n{}",
        Local::now().format("%Y-%m-%d %H:%M"),
        report.candidates_scored,
        report.candidates_supplied,
        report.render_text()
    )
}

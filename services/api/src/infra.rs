use care_match::matching::{
    CsvDoctorDirectory, DirectoryError, DoctorDirectory, DoctorRecord, JsonDoctorDirectory,
    PatientRecord, ScoringConfig, ScoringConfigError, StaticDoctorDirectory,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Directory selected from configuration: a file on disk or the bundled sample roster.
#[derive(Debug, Clone)]
pub(crate) enum ConfiguredDirectory {
    Json(JsonDoctorDirectory),
    Csv(CsvDoctorDirectory),
    Sample(StaticDoctorDirectory),
}

impl ConfiguredDirectory {
    /// `.csv` files use the CSV reader; any other path is read as JSON.
    pub(crate) fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(path) if is_csv(path) => Self::Csv(CsvDoctorDirectory::new(path)),
            Some(path) => Self::Json(JsonDoctorDirectory::new(path)),
            None => Self::Sample(StaticDoctorDirectory::new(sample_doctors())),
        }
    }

    pub(crate) fn source_label(&self) -> String {
        match self {
            Self::Json(directory) => directory.path().display().to_string(),
            Self::Csv(directory) => directory.path().display().to_string(),
            Self::Sample(_) => "bundled sample roster".to_string(),
        }
    }
}

impl DoctorDirectory for ConfiguredDirectory {
    fn doctors(&self) -> Result<Vec<DoctorRecord>, DirectoryError> {
        match self {
            Self::Json(directory) => directory.doctors(),
            Self::Csv(directory) => directory.doctors(),
            Self::Sample(directory) => directory.doctors(),
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

pub(crate) fn load_scoring_config(path: Option<&PathBuf>) -> Result<ScoringConfig, ScoringConfigError> {
    match path {
        Some(path) => ScoringConfig::from_path(path),
        None => Ok(ScoringConfig::default()),
    }
}

pub(crate) fn sample_patient() -> PatientRecord {
    PatientRecord {
        primary_issue: Some("ADHD".to_string()),
        severity: Some("medium".to_string()),
        preferred_language: Some("English".to_string()),
        consultation_mode: Some("offline".to_string()),
        budget: Some(700.0),
    }
}

pub(crate) fn sample_doctors() -> Vec<DoctorRecord> {
    vec![
        sample_doctor(
            "D-101",
            "Dr. Asha Rao",
            &["ADHD"],
            "Adult attention and focus clinic.",
            &["English", "Hindi"],
            "both",
            650.0,
            9.4,
        ),
        sample_doctor(
            "D-102",
            "Dr. Vikram Shah",
            &["Anxiety", "Panic Disorder"],
            "CBT for worry, panic and stress.",
            &["English"],
            "online",
            500.0,
            8.1,
        ),
        sample_doctor(
            "D-103",
            "Dr. Meera Iyer",
            &["Child Psychiatry"],
            "Hyperactivity and attention difficulties in young people.",
            &["Marathi", "English"],
            "offline",
            900.0,
            9.0,
        ),
        sample_doctor(
            "D-104",
            "Dr. Kabir Menon",
            &["Depression", "Mood Disorders"],
            "Long-term care for low mood.",
            &["English", "Malayalam"],
            "both",
            750.0,
            8.7,
        ),
        sample_doctor(
            "D-105",
            "Dr. Farah Qureshi",
            &["Insomnia"],
            "Sleep medicine and circadian health.",
            &["Hindi", "Urdu"],
            "online",
            400.0,
            7.9,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn sample_doctor(
    id: &str,
    name: &str,
    specializations: &[&str],
    bio: &str,
    languages: &[&str],
    availability: &str,
    fee: f64,
    rating: f64,
) -> DoctorRecord {
    DoctorRecord {
        doctor_id: Some(id.to_string()),
        name: Some(name.to_string()),
        specializations: Some(specializations.iter().map(|s| s.to_string()).collect()),
        bio: Some(bio.to_string()),
        languages: Some(languages.iter().map(|s| s.to_string()).collect()),
        consultation_modes: Some(vec![availability.to_string()]),
        fee: Some(fee),
        rating: Some(rating),
        malformed: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_reader_from_extension() {
        assert!(matches!(
            ConfiguredDirectory::from_path(Some(Path::new("roster.CSV"))),
            ConfiguredDirectory::Csv(_)
        ));
        assert!(matches!(
            ConfiguredDirectory::from_path(Some(Path::new("roster.json"))),
            ConfiguredDirectory::Json(_)
        ));
        assert!(matches!(
            ConfiguredDirectory::from_path(None),
            ConfiguredDirectory::Sample(_)
        ));
    }

    #[test]
    fn sample_roster_is_valid() {
        let doctors = ConfiguredDirectory::from_path(None)
            .doctors()
            .expect("sample roster loads");
        assert_eq!(doctors.len(), 5);
    }
}

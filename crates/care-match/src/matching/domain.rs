use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier wrapper for doctors supplied by a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoctorId(pub String);

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Condition severity reported by the patient; drives the specialization multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Medium, Self::High]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Severity {
    type Err = ProfileError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ProfileError::UnknownSeverity(raw.trim().to_string())),
        }
    }
}

/// How a consultation takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsultationMode {
    Online,
    Offline,
}

impl ConsultationMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl FromStr for ConsultationMode {
    type Err = ProfileError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            _ => Err(ProfileError::UnknownConsultationMode(raw.trim().to_string())),
        }
    }
}

/// Field-domain violations detected while turning intake records into profiles.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` must not be blank")]
    BlankField(&'static str),
    #[error("field `{0}` must list at least one value")]
    EmptyList(&'static str),
    #[error("unknown severity '{0}' (expected low, medium or high)")]
    UnknownSeverity(String),
    #[error("unknown consultation mode '{0}' (expected online or offline)")]
    UnknownConsultationMode(String),
    #[error("field `{field}` must be a finite number")]
    NonFiniteAmount { field: &'static str },
    #[error("field `{field}` must not be negative (found {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("rating {rating} outside the 0-{scale} scale")]
    RatingOutOfRange { rating: f64, scale: f64 },
}

/// Untrusted patient payload as it arrives from a file or API request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(default)]
    pub primary_issue: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub consultation_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub budget: Option<f64>,
}

/// Untrusted doctor payload supplied by a [`DoctorDirectory`](super::DoctorDirectory).
///
/// Accepts the single-value shapes used by older exports: `specialization` for
/// `specializations` and `availability` (including `"both"`) for `consultation_modes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub doctor_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "specialization", deserialize_with = "one_or_many")]
    pub specializations: Option<Vec<String>>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub languages: Option<Vec<String>>,
    #[serde(default, alias = "availability", deserialize_with = "one_or_many")]
    pub consultation_modes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub fee: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub rating: Option<f64>,
    /// Decode failure for a source row whose values had the wrong shape.
    #[serde(skip)]
    pub malformed: Option<String>,
}

impl DoctorRecord {
    /// Placeholder for a source row that could not be decoded; validation rejects it.
    pub fn malformed(
        doctor_id: Option<String>,
        name: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            doctor_id,
            name,
            malformed: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Best-effort identifier used when reporting a record that failed validation.
    pub fn label(&self) -> String {
        non_blank(self.doctor_id.as_deref())
            .or_else(|| non_blank(self.name.as_deref()))
            .unwrap_or("<unnamed doctor>")
            .to_string()
    }
}

/// Validated patient profile, immutable for the duration of a ranking call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientProfile {
    pub primary_issue: String,
    pub severity: Severity,
    pub preferred_language: String,
    pub consultation_mode: ConsultationMode,
    pub budget: f64,
}

impl PatientProfile {
    pub fn validate(&self) -> Result<(), ProfileError> {
        require_text("primary_issue", &self.primary_issue)?;
        require_text("preferred_language", &self.preferred_language)?;
        require_amount("budget", self.budget)
    }
}

impl TryFrom<PatientRecord> for PatientProfile {
    type Error = ProfileError;

    fn try_from(record: PatientRecord) -> Result<Self, Self::Error> {
        let profile = PatientProfile {
            primary_issue: required(record.primary_issue, "primary_issue")?,
            severity: required(record.severity, "severity")?.parse()?,
            preferred_language: required(record.preferred_language, "preferred_language")?,
            consultation_mode: required(record.consultation_mode, "consultation_mode")?.parse()?,
            budget: record.budget.ok_or(ProfileError::MissingField("budget"))?,
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// Validated doctor profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorProfile {
    pub doctor_id: Option<DoctorId>,
    pub name: String,
    pub specializations: Vec<String>,
    pub bio: Option<String>,
    pub languages: Vec<String>,
    pub consultation_modes: BTreeSet<ConsultationMode>,
    pub fee: f64,
    pub rating: f64,
}

impl DoctorProfile {
    pub fn label(&self) -> String {
        match &self.doctor_id {
            Some(id) => format!("{} ({id})", self.name),
            None => self.name.clone(),
        }
    }

    pub fn speaks(&self, language: &str) -> bool {
        let wanted = normalize(language);
        self.languages
            .iter()
            .any(|spoken| normalize(spoken) == wanted)
    }

    pub fn offers(&self, mode: ConsultationMode) -> bool {
        self.consultation_modes.contains(&mode)
    }

    /// Checks every field domain, including the rating against the active rating scale.
    pub fn validate(&self, rating_scale: f64) -> Result<(), ProfileError> {
        require_text("name", &self.name)?;
        require_list("specializations", &self.specializations)?;
        require_list("languages", &self.languages)?;
        if self.consultation_modes.is_empty() {
            return Err(ProfileError::EmptyList("consultation_modes"));
        }
        require_amount("fee", self.fee)?;
        require_amount("rating", self.rating)?;
        if self.rating > rating_scale {
            return Err(ProfileError::RatingOutOfRange {
                rating: self.rating,
                scale: rating_scale,
            });
        }
        Ok(())
    }
}

impl TryFrom<&DoctorRecord> for DoctorProfile {
    type Error = ProfileError;

    fn try_from(record: &DoctorRecord) -> Result<Self, Self::Error> {
        if let Some(reason) = &record.malformed {
            return Err(ProfileError::Malformed(reason.clone()));
        }
        let name = required(record.name.clone(), "name")?;
        let specializations = required_list(record.specializations.as_deref(), "specializations")?;
        let languages = required_list(record.languages.as_deref(), "languages")?;
        let consultation_modes = parse_modes(
            record
                .consultation_modes
                .as_deref()
                .ok_or(ProfileError::MissingField("consultation_modes"))?,
        )?;
        let fee = record.fee.ok_or(ProfileError::MissingField("fee"))?;
        let rating = record.rating.ok_or(ProfileError::MissingField("rating"))?;
        require_amount("fee", fee)?;
        require_amount("rating", rating)?;

        Ok(DoctorProfile {
            doctor_id: non_blank(record.doctor_id.as_deref()).map(|id| DoctorId(id.to_string())),
            name,
            specializations,
            bio: non_blank(record.bio.as_deref()).map(str::to_string),
            languages,
            consultation_modes,
            fee,
            rating,
        })
    }
}

impl TryFrom<DoctorRecord> for DoctorProfile {
    type Error = ProfileError;

    fn try_from(record: DoctorRecord) -> Result<Self, Self::Error> {
        DoctorProfile::try_from(&record)
    }
}

/// Parses consultation modes; `"both"` expands to online and offline.
pub fn parse_modes(values: &[String]) -> Result<BTreeSet<ConsultationMode>, ProfileError> {
    let mut modes = BTreeSet::new();
    for value in values {
        if value.trim().eq_ignore_ascii_case("both") {
            modes.insert(ConsultationMode::Online);
            modes.insert(ConsultationMode::Offline);
        } else {
            modes.insert(value.parse()?);
        }
    }
    if modes.is_empty() {
        return Err(ProfileError::EmptyList("consultation_modes"));
    }
    Ok(modes)
}

pub(crate) fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ProfileError> {
    let value = value.ok_or(ProfileError::MissingField(field))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProfileError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

fn required_list(values: Option<&[String]>, field: &'static str) -> Result<Vec<String>, ProfileError> {
    let values = values.ok_or(ProfileError::MissingField(field))?;
    let cleaned: Vec<String> = values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    require_list(field, &cleaned)?;
    Ok(cleaned)
}

fn require_text(field: &'static str, value: &str) -> Result<(), ProfileError> {
    if value.trim().is_empty() {
        Err(ProfileError::BlankField(field))
    } else {
        Ok(())
    }
}

fn require_list(field: &'static str, values: &[String]) -> Result<(), ProfileError> {
    if values.iter().all(|value| value.trim().is_empty()) {
        Err(ProfileError::EmptyList(field))
    } else {
        Ok(())
    }
}

fn require_amount(field: &'static str, value: f64) -> Result<(), ProfileError> {
    if !value.is_finite() {
        return Err(ProfileError::NonFiniteAmount { field });
    }
    if value < 0.0 {
        return Err(ProfileError::NegativeAmount { field, value });
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

/// Accepts numbers or numeric strings (key-value exports store everything as text).
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawAmount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawAmount::Number(value)) => Ok(Some(value)),
        Some(RawAmount::Text(raw)) if raw.trim().is_empty() => Ok(None),
        Some(RawAmount::Text(raw)) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("'{raw}' is not a number"))),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Integer(i64),
    Text(String),
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<RawText>::deserialize(deserializer)?.map(|raw| match raw {
            RawText::Integer(value) => value.to_string(),
            RawText::Text(value) => value,
        }),
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<OneOrMany>::deserialize(deserializer)?.map(|raw| match raw {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parsing_is_case_insensitive_but_strict() {
        assert_eq!(" Medium ".parse::<Severity>(), Ok(Severity::Medium));
        assert_eq!("HIGH".parse::<Severity>(), Ok(Severity::High));
        assert_eq!(
            "critical".parse::<Severity>(),
            Err(ProfileError::UnknownSeverity("critical".to_string()))
        );
    }

    #[test]
    fn both_expands_to_every_consultation_mode() {
        let modes = parse_modes(&["Both".to_string()]).expect("modes parse");
        assert!(modes.contains(&ConsultationMode::Online));
        assert!(modes.contains(&ConsultationMode::Offline));
    }

    #[test]
    fn doctor_record_accepts_legacy_single_value_fields() {
        let record: DoctorRecord = serde_json::from_str(
            r#"{
                "doctor_id": 7,
                "name": "Dr. Rao",
                "specialization": "Child Psychiatry",
                "bio": "ADHD and attention disorders",
                "languages": ["English", "Hindi"],
                "availability": "Offline",
                "fee": "650",
                "rating": 4.6
            }"#,
        )
        .expect("record parses");

        assert_eq!(record.doctor_id.as_deref(), Some("7"));
        assert_eq!(record.fee, Some(650.0));

        let profile = DoctorProfile::try_from(&record).expect("valid doctor");
        assert_eq!(profile.specializations, vec!["Child Psychiatry".to_string()]);
        assert!(profile.offers(ConsultationMode::Offline));
        assert!(!profile.offers(ConsultationMode::Online));
        assert!(profile.speaks(" english "));
    }

    #[test]
    fn patient_record_rejects_negative_budget() {
        let record = PatientRecord {
            primary_issue: Some("Anxiety".to_string()),
            severity: Some("low".to_string()),
            preferred_language: Some("English".to_string()),
            consultation_mode: Some("online".to_string()),
            budget: Some(-1.0),
        };

        assert_eq!(
            PatientProfile::try_from(record),
            Err(ProfileError::NegativeAmount {
                field: "budget",
                value: -1.0
            })
        );
    }

    #[test]
    fn doctor_record_reports_first_missing_field() {
        let record = DoctorRecord {
            name: Some("Dr. Gupta".to_string()),
            ..DoctorRecord::default()
        };

        assert_eq!(
            DoctorProfile::try_from(&record),
            Err(ProfileError::MissingField("specializations"))
        );
        assert_eq!(record.label(), "Dr. Gupta");
    }

    #[test]
    fn malformed_record_is_rejected_with_its_reason() {
        let record = DoctorRecord::malformed(
            Some("D9".to_string()),
            None,
            "'n/a' is not a number",
        );

        assert_eq!(record.label(), "D9");
        assert_eq!(
            DoctorProfile::try_from(&record),
            Err(ProfileError::Malformed("'n/a' is not a number".to_string()))
        );
    }

    #[test]
    fn rating_is_checked_against_the_scale() {
        let record = DoctorRecord {
            name: Some("Dr. Iyer".to_string()),
            specializations: Some(vec!["Anxiety".to_string()]),
            languages: Some(vec!["Tamil".to_string()]),
            consultation_modes: Some(vec!["online".to_string()]),
            fee: Some(500.0),
            rating: Some(7.5),
            ..DoctorRecord::default()
        };
        let profile = DoctorProfile::try_from(&record).expect("structurally valid");

        assert!(profile.validate(10.0).is_ok());
        assert_eq!(
            profile.validate(5.0),
            Err(ProfileError::RatingOutOfRange {
                rating: 7.5,
                scale: 5.0
            })
        );
    }
}

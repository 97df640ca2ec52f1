mod parser;

use std::io::Read;
use std::path::{Path, PathBuf};

use super::domain::{DoctorRecord, PatientRecord};

/// Source of doctor records. The ranking core only ever needs the full list.
pub trait DoctorDirectory: Send + Sync {
    fn doctors(&self) -> Result<Vec<DoctorRecord>, DirectoryError>;
}

/// Failures reading a record source (doctor directory or patient file).
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON record data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV record data: {0}")]
    Csv(#[from] csv::Error),
    #[error("record source is empty: {0}")]
    Empty(String),
    /// A remote roster store (key-value or HTTP backed) could not be reached.
    #[error("doctor directory unavailable: {0}")]
    Unavailable(String),
}

/// Fixed in-memory roster.
#[derive(Debug, Clone, Default)]
pub struct StaticDoctorDirectory {
    records: Vec<DoctorRecord>,
}

impl StaticDoctorDirectory {
    pub fn new(records: Vec<DoctorRecord>) -> Self {
        Self { records }
    }
}

impl DoctorDirectory for StaticDoctorDirectory {
    fn doctors(&self) -> Result<Vec<DoctorRecord>, DirectoryError> {
        Ok(self.records.clone())
    }
}

/// JSON array of doctor objects, re-read on every call.
#[derive(Debug, Clone)]
pub struct JsonDoctorDirectory {
    path: PathBuf,
}

impl JsonDoctorDirectory {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_str(content: &str) -> Result<Vec<DoctorRecord>, DirectoryError> {
        let content = strip_bom(content);
        if content.trim().is_empty() {
            return Err(DirectoryError::Empty("doctor JSON".to_string()));
        }
        let values: Vec<serde_json::Value> = serde_json::from_str(content)?;
        Ok(values.into_iter().map(decode_json_record).collect())
    }
}

impl DoctorDirectory for JsonDoctorDirectory {
    fn doctors(&self) -> Result<Vec<DoctorRecord>, DirectoryError> {
        let content = read_source(&self.path)?;
        Self::parse_str(&content).map_err(|error| match error {
            DirectoryError::Empty(_) => DirectoryError::Empty(self.path.display().to_string()),
            other => other,
        })
    }
}

/// CSV export with a header row; list columns are `;` separated.
#[derive(Debug, Clone)]
pub struct CsvDoctorDirectory {
    path: PathBuf,
}

impl CsvDoctorDirectory {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<DoctorRecord>, DirectoryError> {
        Ok(parser::parse_doctor_rows(reader)?)
    }
}

impl DoctorDirectory for CsvDoctorDirectory {
    fn doctors(&self) -> Result<Vec<DoctorRecord>, DirectoryError> {
        let content = read_source(&self.path)?;
        if content.trim().is_empty() {
            return Err(DirectoryError::Empty(self.path.display().to_string()));
        }
        Self::from_reader(strip_bom(&content).as_bytes())
    }
}

/// Reads a single patient JSON object.
pub fn load_patient_record<P: AsRef<Path>>(path: P) -> Result<PatientRecord, DirectoryError> {
    let path = path.as_ref();
    let content = read_source(path)?;
    let content = strip_bom(&content);
    if content.trim().is_empty() {
        return Err(DirectoryError::Empty(path.display().to_string()));
    }
    Ok(serde_json::from_str(content)?)
}

fn read_source(path: &Path) -> Result<String, DirectoryError> {
    std::fs::read_to_string(path).map_err(|source| DirectoryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A shape error in one element becomes a malformed record rather than failing the roster.
fn decode_json_record(value: serde_json::Value) -> DoctorRecord {
    let doctor_id = match value.get("doctor_id") {
        Some(serde_json::Value::String(id)) => Some(id.clone()),
        Some(serde_json::Value::Number(id)) => Some(id.to_string()),
        _ => None,
    };
    let name = value
        .get("name")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);

    serde_json::from_value(value)
        .unwrap_or_else(|error| DoctorRecord::malformed(doctor_id, name, error.to_string()))
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

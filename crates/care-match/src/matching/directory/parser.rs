use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::super::domain::DoctorRecord;

pub(crate) fn parse_doctor_rows<R: Read>(reader: R) -> Result<Vec<DoctorRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(error) if matches!(error.kind(), csv::ErrorKind::UnequalLengths { .. }) => {
                records.push(DoctorRecord::malformed(None, None, error.to_string()));
                continue;
            }
            Err(error) => return Err(error),
        };

        match row.deserialize::<DoctorRow>(Some(&headers)) {
            Ok(parsed) => records.push(parsed.into_record()),
            Err(error) => records.push(DoctorRecord::malformed(
                cell(&headers, &row, "doctor_id"),
                cell(&headers, &row, "name"),
                error.to_string(),
            )),
        }
    }

    Ok(records)
}

fn cell(headers: &csv::StringRecord, row: &csv::StringRecord, column: &str) -> Option<String> {
    headers
        .iter()
        .position(|header| header == column)
        .and_then(|index| row.get(index))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize)]
struct DoctorRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    doctor_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(
        default,
        alias = "specialization",
        deserialize_with = "empty_string_as_none"
    )]
    specializations: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bio: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    languages: Option<String>,
    #[serde(
        default,
        alias = "availability",
        deserialize_with = "empty_string_as_none"
    )]
    consultation_modes: Option<String>,
    #[serde(default)]
    fee: Option<f64>,
    #[serde(default)]
    rating: Option<f64>,
}

impl DoctorRow {
    fn into_record(self) -> DoctorRecord {
        DoctorRecord {
            doctor_id: self.doctor_id,
            name: self.name,
            specializations: self.specializations.map(split_list),
            bio: self.bio,
            languages: self.languages.map(split_list),
            consultation_modes: self.consultation_modes.map(split_list),
            fee: self.fee,
            rating: self.rating,
            malformed: None,
        }
    }
}

fn split_list(raw: String) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.trim().is_empty()))
}

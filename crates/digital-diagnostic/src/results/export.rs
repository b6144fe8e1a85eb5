use std::io::{Read, Write};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{normalize_timestamp, StoredResult};
use crate::diagnostic::AnswerSet;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const CSV_FILE_NAME: &str = "resultats-diagnostic.csv";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("answers column is not valid JSON: {0}")]
    Answers(#[from] serde_json::Error),
    #[error("failed to flush csv output: {0}")]
    Io(#[from] std::io::Error),
    #[error("unrecognised date '{0}'")]
    InvalidDate(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct ExportRow {
    #[serde(rename = "Nom")]
    name: String,
    #[serde(rename = "Email")]
    email: String,
    #[serde(rename = "Score")]
    score: f64,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Réponses")]
    answers: String,
}

/// A row read back from an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedResult {
    pub name: String,
    pub email: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub answers: AnswerSet,
}

/// Writes one row per result under the `Nom,Email,Score,Date,Réponses` header.
pub fn write_results_csv<W: Write>(writer: W, results: &[StoredResult]) -> Result<W, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for result in results {
        csv_writer.serialize(ExportRow {
            name: result.display_name().to_string(),
            email: result.display_email().to_string(),
            score: result.score,
            date: result.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            answers: serde_json::to_string(&result.answers)?,
        })?;
    }

    if results.is_empty() {
        csv_writer.write_record(["Nom", "Email", "Score", "Date", "Réponses"])?;
    }

    csv_writer
        .into_inner()
        .map_err(|error| ExportError::Io(error.into_error()))
}

pub fn results_to_csv(results: &[StoredResult]) -> Result<Vec<u8>, ExportError> {
    write_results_csv(Vec::new(), results)
}

pub fn parse_results_csv<R: Read>(reader: R) -> Result<Vec<ExportedResult>, ExportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<ExportRow>() {
        let row = record?;
        let created_at =
            normalize_timestamp(&row.date).ok_or_else(|| ExportError::InvalidDate(row.date.clone()))?;
        rows.push(ExportedResult {
            name: row.name,
            email: row.email,
            score: row.score,
            created_at,
            answers: serde_json::from_str(&row.answers)?,
        });
    }

    Ok(rows)
}

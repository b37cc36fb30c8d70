//! Predictions CSV reader/writer.
//!
//! Row order follows pair enumeration order, not canonical sort; callers
//! that need the canonical `(drug_a, drug_b)` pair for a join (as
//! [`crate::synergies::KnownSynergies`] does) sort the two names themselves.

use std::io::Write as _;
use std::path::Path;

use netsyn_core::PredictionRecord;
use serde::{Deserialize, Serialize};

use crate::TabularProviderError;

/// One row of a predictions CSV, serializable independently of
/// [`PredictionRecord`] so the core library stays free of a CSV dependency.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PredictionRow {
    pub disease: String,
    pub drug_a: String,
    pub drug_b: String,
    pub tqab: f64,
    pub pqab: f64,
    pub cqab: f64,
    pub prediction_score: f64,
    pub topology_class: String,
    pub pqa: f64,
    pub pqb: f64,
    pub cqa: f64,
    pub cqb: f64,
}

impl From<&PredictionRecord> for PredictionRow {
    fn from(record: &PredictionRecord) -> Self {
        Self {
            disease: record.disease.clone(),
            drug_a: record.drug_a.clone(),
            drug_b: record.drug_b.clone(),
            tqab: record.tqab,
            pqab: record.pqab,
            cqab: record.cqab,
            prediction_score: record.prediction_score,
            topology_class: record.topology_class.as_str().to_owned(),
            pqa: record.pqa,
            pqb: record.pqb,
            cqa: record.cqa,
            cqb: record.cqb,
        }
    }
}

/// Writes `records` to `path` as a predictions CSV. If `cancelled` is
/// `true`, a trailing `# cancelled` comment row is appended after the data
/// rows, marking the output as a partial run.
///
/// # Errors
///
/// Returns [`TabularProviderError::Write`] if the file cannot be created or
/// a row cannot be serialized.
pub fn write_predictions(
    path: &Path,
    records: &[PredictionRecord],
    cancelled: bool,
) -> Result<(), TabularProviderError> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| TabularProviderError::Write {
        path: path.display().to_string(),
        source,
    })?;
    for record in records {
        writer
            .serialize(PredictionRow::from(record))
            .map_err(|source| TabularProviderError::Write {
                path: path.display().to_string(),
                source,
            })?;
    }
    writer.flush().map_err(|source| TabularProviderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    if cancelled {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|source| TabularProviderError::Io {
                path: path.display().to_string(),
                source,
            })?;
        writeln!(file, "# cancelled").map_err(|source| TabularProviderError::Io {
            path: path.display().to_string(),
            source,
        })?;
    }
    Ok(())
}

/// Reads a predictions CSV previously written by [`write_predictions`],
/// skipping any trailing `# cancelled` marker row.
///
/// # Errors
///
/// Returns [`TabularProviderError::Io`] if the file cannot be opened, and
/// [`TabularProviderError::Csv`] if a row cannot be parsed.
pub fn read_predictions(path: &Path) -> Result<Vec<PredictionRow>, TabularProviderError> {
    let file = std::fs::File::open(path).map_err(|source| TabularProviderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .from_reader(file);
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: PredictionRow = record.map_err(|source| TabularProviderError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

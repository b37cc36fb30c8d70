//! Disease transcriptional-signature TSV reader.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::TabularProviderError;

#[derive(Debug, Deserialize, Serialize)]
struct SignatureRow {
    disease: String,
    gene: String,
    log_fc: f64,
}

/// Reads a disease-signatures TSV (`disease`, `gene`, `log_fc` columns) into
/// a map from disease name to its per-gene signature.
///
/// # Errors
///
/// Returns [`TabularProviderError::Io`] if the file cannot be opened, and
/// [`TabularProviderError::Csv`] if a row cannot be parsed.
pub fn read_disease_signatures(
    path: &Path,
) -> Result<HashMap<String, HashMap<String, f64>>, TabularProviderError> {
    let file = std::fs::File::open(path).map_err(|source| TabularProviderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::Fields)
        .from_reader(file);

    let mut signatures: HashMap<String, HashMap<String, f64>> = HashMap::new();
    for record in reader.deserialize() {
        let row: SignatureRow = record.map_err(|source| TabularProviderError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        signatures
            .entry(row.disease)
            .or_default()
            .insert(row.gene, row.log_fc);
    }
    Ok(signatures)
}

/// Writes `signatures` (disease name to per-gene log fold-change) to a
/// disease-signatures TSV at `path`.
///
/// # Errors
///
/// Returns [`TabularProviderError::Write`] if the file cannot be created or
/// a row cannot be serialized.
pub fn write_disease_signatures(
    path: &Path,
    signatures: &HashMap<String, HashMap<String, f64>>,
) -> Result<(), TabularProviderError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .map_err(|source| TabularProviderError::Write {
            path: path.display().to_string(),
            source,
        })?;
    let mut diseases: Vec<&String> = signatures.keys().collect();
    diseases.sort_unstable();
    for disease in diseases {
        let mut genes: Vec<(&String, &f64)> = signatures[disease].iter().collect();
        genes.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (gene, log_fc) in genes {
            writer
                .serialize(SignatureRow { disease: disease.clone(), gene: gene.clone(), log_fc: *log_fc })
                .map_err(|source| TabularProviderError::Write {
                    path: path.display().to_string(),
                    source,
                })?;
        }
    }
    writer.flush().map_err(|source| TabularProviderError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn groups_signature_rows_by_disease() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "disease\tgene\tlog_fc").expect("header");
        writeln!(file, "lung_cancer\tTP53\t-1.5").expect("row");
        writeln!(file, "lung_cancer\tEGFR\t2.25").expect("row");
        let signatures = read_disease_signatures(file.path()).expect("parse");
        let lung = &signatures["lung_cancer"];
        assert!((lung["TP53"] - -1.5).abs() < f64::EPSILON);
        assert!((lung["EGFR"] - 2.25).abs() < f64::EPSILON);
    }

    #[test]
    fn signatures_round_trip_through_tsv() {
        let mut genes = HashMap::new();
        genes.insert("TP53".to_owned(), -1.5);
        let mut signatures = HashMap::new();
        signatures.insert("lung_cancer".to_owned(), genes);

        let file = tempfile::NamedTempFile::new().expect("tempfile");
        write_disease_signatures(file.path(), &signatures).expect("write");
        let read_back = read_disease_signatures(file.path()).expect("read");
        assert!((read_back["lung_cancer"]["TP53"] - -1.5).abs() < f64::EPSILON);
    }
}

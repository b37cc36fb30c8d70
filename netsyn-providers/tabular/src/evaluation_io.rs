//! Evaluation-summary CSV writer and the predictions/known-synergies join
//! that feeds `netsyn_core::evaluation`.

use std::path::Path;

use netsyn_core::EvaluationSummary;
use serde::Serialize;

use crate::predictions::PredictionRow;
use crate::synergies::KnownSynergies;
use crate::TabularProviderError;

/// Builds the `(label, prediction_score)` pairs `netsyn_core::evaluation`
/// needs for one disease, by joining `predictions` against `synergies`.
#[must_use]
pub fn label_predictions(
    predictions: &[PredictionRow],
    disease: &str,
    synergies: &KnownSynergies,
) -> Vec<(bool, f64)> {
    predictions
        .iter()
        .filter(|row| row.disease == disease)
        .map(|row| {
            (
                synergies.contains(disease, &row.drug_a, &row.drug_b),
                row.prediction_score,
            )
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct EvaluationRow {
    disease: String,
    auc_roc: Option<f64>,
    auc_pr: Option<f64>,
    n_predictions: usize,
    n_known_synergies: usize,
    n_true_positives: usize,
}

/// Writes one evaluation summary row per `(disease, summary)` pair to an
/// evaluation-summary CSV.
///
/// # Errors
///
/// Returns [`TabularProviderError::Write`] if the file cannot be created or
/// a row cannot be serialized.
pub fn write_evaluation_summary(
    path: &Path,
    summaries: &[(String, EvaluationSummary)],
) -> Result<(), TabularProviderError> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| TabularProviderError::Write {
        path: path.display().to_string(),
        source,
    })?;
    for (disease, summary) in summaries {
        writer
            .serialize(EvaluationRow {
                disease: disease.clone(),
                auc_roc: summary.auc_roc,
                auc_pr: summary.auc_pr,
                n_predictions: summary.n_predictions,
                n_known_synergies: summary.n_known_synergies,
                n_true_positives: summary.n_true_positives,
            })
            .map_err(|source| TabularProviderError::Write {
                path: path.display().to_string(),
                source,
            })?;
    }
    writer.flush().map_err(|source| TabularProviderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_labels_only_the_matching_disease() {
        let predictions = vec![
            PredictionRow {
                disease: "lung_cancer".into(),
                drug_a: "drugA".into(),
                drug_b: "drugB".into(),
                tqab: 0.0,
                pqab: 0.0,
                cqab: 0.0,
                prediction_score: 0.9,
                topology_class: "complementary".into(),
                pqa: 0.0,
                pqb: 0.0,
                cqa: 0.0,
                cqb: 0.0,
            },
            PredictionRow {
                disease: "breast_cancer".into(),
                drug_a: "drugC".into(),
                drug_b: "drugD".into(),
                tqab: 0.0,
                pqab: 0.0,
                cqab: 0.0,
                prediction_score: 0.1,
                topology_class: "redundant".into(),
                pqa: 0.0,
                pqb: 0.0,
                cqa: 0.0,
                cqb: 0.0,
            },
        ];
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        use std::io::Write as _;
        writeln!(file, "drug_a,drug_b,disease").expect("header");
        writeln!(file, "drugA,drugB,lung_cancer").expect("row");
        let synergies = KnownSynergies::read(file.path()).expect("parse");

        let labeled = label_predictions(&predictions, "lung_cancer", &synergies);
        assert_eq!(labeled, vec![(true, 0.9)]);
    }
}

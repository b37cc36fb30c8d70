//! Drug-module derivation from a raw differential-expression table.
//!
//! Some drug-perturbation sources (L1000-style screens) publish a wide
//! gene-by-drug fold-change matrix rather than an already-split up/down
//! gene list. This takes the top and bottom `top_pct` fraction of each
//! drug's column by fold-change as its up- and down-regulated sets,
//! matching the quantile convention `ScoringConfig::top_pct` documents.

use std::path::Path;

use crate::modules::RawDrugModule;
use crate::TabularProviderError;

/// Reads a tab-separated gene-by-drug fold-change matrix (first column the
/// gene symbol, remaining columns one per drug) and derives a
/// [`RawDrugModule`] per drug from its top/bottom `top_pct` fraction of
/// genes by value.
///
/// # Errors
///
/// Returns [`TabularProviderError::Io`] if the file cannot be opened,
/// [`TabularProviderError::Csv`] if a row is malformed, and
/// [`TabularProviderError::InvalidNumber`] if a fold-change cell is not a
/// valid float.
pub fn build_drug_modules_from_de_table(
    path: &Path,
    top_pct: f64,
) -> Result<Vec<(String, RawDrugModule)>, TabularProviderError> {
    let file = std::fs::File::open(path).map_err(|source| TabularProviderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .trim(csv::Trim::Fields)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| TabularProviderError::Csv {
            path: path.display().to_string(),
            source,
        })?
        .clone();
    let drugs: Vec<String> = headers.iter().skip(1).map(str::to_owned).collect();

    let mut columns: Vec<Vec<(String, f64)>> = vec![Vec::new(); drugs.len()];
    for record in reader.records() {
        let record = record.map_err(|source| TabularProviderError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        let Some(gene) = record.get(0) else { continue };
        for (column_index, drug) in drugs.iter().enumerate() {
            let Some(raw_value) = record.get(column_index + 1) else { continue };
            if raw_value.is_empty() {
                continue;
            }
            let value: f64 = raw_value
                .parse()
                .map_err(|_| TabularProviderError::InvalidNumber {
                    path: path.display().to_string(),
                    gene: gene.to_owned(),
                    column: drug.clone(),
                    value: raw_value.to_owned(),
                })?;
            columns[column_index].push((gene.to_owned(), value));
        }
    }

    let modules = drugs
        .into_iter()
        .zip(columns)
        .map(|(drug, values)| (drug, top_and_bottom(values, top_pct)))
        .collect();
    Ok(modules)
}

#[expect(
    clippy::float_arithmetic,
    reason = "quantile cutoff over a real-valued fold-change column"
)]
fn top_and_bottom(mut values: Vec<(String, f64)>, top_pct: f64) -> RawDrugModule {
    #[expect(clippy::cast_precision_loss, reason = "gene counts fit f64 exactly at this scale")]
    #[expect(clippy::cast_possible_truncation, reason = "truncating toward zero matches Python's int()")]
    #[expect(clippy::cast_sign_loss, reason = "top_pct is validated non-negative by ScoringConfig")]
    let n = (values.len() as f64 * top_pct) as usize;

    values.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let up = values.iter().take(n).map(|(gene, _)| gene.clone()).collect();

    values.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let down = values.into_iter().take(n).map(|(gene, _)| gene).collect();

    RawDrugModule { up, down }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn splits_top_and_bottom_fraction_per_drug() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "gene\tdrugA").expect("header");
        for (gene, value) in [
            ("G1", 5.0),
            ("G2", 4.0),
            ("G3", 0.0),
            ("G4", -4.0),
            ("G5", -5.0),
        ] {
            writeln!(file, "{gene}\t{value}").expect("row");
        }
        let modules = build_drug_modules_from_de_table(file.path(), 0.2).expect("parse");
        assert_eq!(modules.len(), 1);
        let (drug, module) = &modules[0];
        assert_eq!(drug, "drugA");
        assert_eq!(module.up, vec!["G1"]);
        assert_eq!(module.down, vec!["G5"]);
    }
}

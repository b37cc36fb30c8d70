//! Known-synergy reference set, used only by the `evaluate` path.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::TabularProviderError;

#[derive(Debug, Deserialize)]
struct SynergyRow {
    drug_a: String,
    drug_b: String,
    #[serde(default)]
    disease: Option<String>,
}

/// A reference set of known synergistic drug pairs, optionally scoped to a
/// disease. Pairs with no `disease` column apply across every evaluated
/// disease.
#[derive(Clone, Debug, Default)]
pub struct KnownSynergies {
    global: HashSet<(String, String)>,
    per_disease: HashMap<String, HashSet<(String, String)>>,
}

impl KnownSynergies {
    /// Reads a known-synergies CSV (`drug_a`, `drug_b`, optional `disease`).
    ///
    /// # Errors
    ///
    /// Returns [`TabularProviderError::Io`] if the file cannot be opened, and
    /// [`TabularProviderError::Csv`] if a row cannot be parsed.
    pub fn read(path: &Path) -> Result<Self, TabularProviderError> {
        let file = std::fs::File::open(path).map_err(|source| TabularProviderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Fields)
            .from_reader(file);

        let mut synergies = Self::default();
        for record in reader.deserialize() {
            let row: SynergyRow = record.map_err(|source| TabularProviderError::Csv {
                path: path.display().to_string(),
                source,
            })?;
            let pair = canonical_pair(&row.drug_a, &row.drug_b);
            match row.disease {
                Some(disease) => {
                    synergies.per_disease.entry(disease).or_default().insert(pair);
                }
                None => {
                    synergies.global.insert(pair);
                }
            }
        }
        Ok(synergies)
    }

    /// Returns `true` if `(drug_a, drug_b)` is a known synergy for `disease`,
    /// matching either a disease-scoped or a global entry.
    #[must_use]
    pub fn contains(&self, disease: &str, drug_a: &str, drug_b: &str) -> bool {
        let pair = canonical_pair(drug_a, drug_b);
        self.global.contains(&pair)
            || self
                .per_disease
                .get(disease)
                .is_some_and(|set| set.contains(&pair))
    }

    /// Returns the number of known synergies in scope for `disease`:
    /// the global set plus any disease-scoped entries.
    #[must_use]
    pub fn count_for(&self, disease: &str) -> usize {
        self.global.len() + self.per_disease.get(disease).map_or(0, HashSet::len)
    }
}

fn canonical_pair(drug_a: &str, drug_b: &str) -> (String, String) {
    if drug_a <= drug_b {
        (drug_a.to_owned(), drug_b.to_owned())
    } else {
        (drug_b.to_owned(), drug_a.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn membership_is_order_independent() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "drug_a,drug_b,disease").expect("header");
        writeln!(file, "drugA,drugB,lung_cancer").expect("row");
        let synergies = KnownSynergies::read(file.path()).expect("parse");
        assert!(synergies.contains("lung_cancer", "drugB", "drugA"));
        assert!(!synergies.contains("breast_cancer", "drugA", "drugB"));
    }

    #[test]
    fn global_entries_apply_to_every_disease() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "drug_a,drug_b,disease").expect("header");
        writeln!(file, "drugA,drugB,").expect("row");
        let synergies = KnownSynergies::read(file.path()).expect("parse");
        assert!(synergies.contains("lung_cancer", "drugA", "drugB"));
        assert!(synergies.contains("breast_cancer", "drugA", "drugB"));
        assert_eq!(synergies.count_for("lung_cancer"), 1);
    }
}

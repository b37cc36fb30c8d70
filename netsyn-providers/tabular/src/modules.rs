//! Disease- and drug-module CSV readers.
//!
//! Both formats are long: one row per `(group, gene)` pair, grouped here
//! into the per-group gene lists [`crate::DiseaseModule`]/[`crate::DrugModule`]
//! binding expects.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::TabularProviderError;

#[derive(Debug, Deserialize, Serialize)]
struct DiseaseRow {
    module: String,
    gene: String,
}

/// Reads a disease-modules CSV (`module`, `gene` columns) into a map from
/// module name to its member genes.
///
/// # Errors
///
/// Returns [`TabularProviderError::Io`] if the file cannot be opened, and
/// [`TabularProviderError::Csv`] if a row cannot be parsed.
pub fn read_disease_modules(
    path: &Path,
) -> Result<HashMap<String, Vec<String>>, TabularProviderError> {
    let mut reader = open_csv(path)?;
    let mut modules: HashMap<String, Vec<String>> = HashMap::new();
    for record in reader.deserialize() {
        let row: DiseaseRow = record.map_err(|source| TabularProviderError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        modules.entry(row.module).or_default().push(row.gene);
    }
    Ok(modules)
}

/// Writes `modules` (module name to member genes) to a disease-modules CSV
/// at `path`, one row per `(module, gene)` pair. Used by the `build`
/// command to persist the genes retained after graph binding.
///
/// # Errors
///
/// Returns [`TabularProviderError::Write`] if the file cannot be created or
/// a row cannot be serialized.
pub fn write_disease_modules(
    path: &Path,
    modules: &HashMap<String, Vec<String>>,
) -> Result<(), TabularProviderError> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| TabularProviderError::Write {
        path: path.display().to_string(),
        source,
    })?;
    let mut names: Vec<&String> = modules.keys().collect();
    names.sort_unstable();
    for name in names {
        for gene in &modules[name] {
            writer
                .serialize(DiseaseRow { module: name.clone(), gene: gene.clone() })
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

#[derive(Debug, Deserialize, Serialize)]
struct DrugRow {
    drug: String,
    gene: String,
    direction: String,
}

/// A drug's raw up- and down-regulated gene symbols, prior to graph binding.
#[derive(Clone, Debug, Default)]
pub struct RawDrugModule {
    pub up: Vec<String>,
    pub down: Vec<String>,
}

/// Reads a drug-modules CSV (`drug`, `gene`, `direction` columns, `direction`
/// one of `up`/`down`) into a map from drug name to its up/down gene sets.
///
/// # Errors
///
/// Returns [`TabularProviderError::Io`] if the file cannot be opened,
/// [`TabularProviderError::Csv`] if a row cannot be parsed, and
/// [`TabularProviderError::InvalidDirection`] if `direction` is neither
/// `up` nor `down`.
pub fn read_drug_modules(
    path: &Path,
) -> Result<HashMap<String, RawDrugModule>, TabularProviderError> {
    let mut reader = open_csv(path)?;
    let mut modules: HashMap<String, RawDrugModule> = HashMap::new();
    for record in reader.deserialize() {
        let row: DrugRow = record.map_err(|source| TabularProviderError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        let entry = modules.entry(row.drug).or_default();
        match row.direction.as_str() {
            "up" => entry.up.push(row.gene),
            "down" => entry.down.push(row.gene),
            other => {
                return Err(TabularProviderError::InvalidDirection {
                    path: path.display().to_string(),
                    value: other.to_owned(),
                });
            }
        }
    }
    Ok(modules)
}

/// Writes `modules` (drug name to its up/down genes) to a drug-modules CSV
/// at `path`, one row per `(drug, gene, direction)` triple.
///
/// # Errors
///
/// Returns [`TabularProviderError::Write`] if the file cannot be created or
/// a row cannot be serialized.
pub fn write_drug_modules(
    path: &Path,
    modules: &HashMap<String, RawDrugModule>,
) -> Result<(), TabularProviderError> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| TabularProviderError::Write {
        path: path.display().to_string(),
        source,
    })?;
    let mut names: Vec<&String> = modules.keys().collect();
    names.sort_unstable();
    for name in names {
        let module = &modules[name];
        for gene in &module.up {
            writer
                .serialize(DrugRow { drug: name.clone(), gene: gene.clone(), direction: "up".into() })
                .map_err(|source| TabularProviderError::Write {
                    path: path.display().to_string(),
                    source,
                })?;
        }
        for gene in &module.down {
            writer
                .serialize(DrugRow { drug: name.clone(), gene: gene.clone(), direction: "down".into() })
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

fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>, TabularProviderError> {
    let file = std::fs::File::open(path).map_err(|source| TabularProviderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::Fields)
        .from_reader(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn groups_disease_rows_by_module() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "module,gene").expect("header");
        writeln!(file, "lung_cancer,TP53").expect("row");
        writeln!(file, "lung_cancer,EGFR").expect("row");
        let modules = read_disease_modules(file.path()).expect("parse");
        assert_eq!(modules["lung_cancer"], vec!["TP53", "EGFR"]);
    }

    #[test]
    fn groups_drug_rows_into_up_and_down() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "drug,gene,direction").expect("header");
        writeln!(file, "drugA,TP53,up").expect("row");
        writeln!(file, "drugA,EGFR,down").expect("row");
        let modules = read_drug_modules(file.path()).expect("parse");
        assert_eq!(modules["drugA"].up, vec!["TP53"]);
        assert_eq!(modules["drugA"].down, vec!["EGFR"]);
    }

    #[test]
    fn invalid_direction_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "drug,gene,direction").expect("header");
        writeln!(file, "drugA,TP53,sideways").expect("row");
        let err = read_drug_modules(file.path()).expect_err("invalid direction must fail");
        assert!(matches!(err, TabularProviderError::InvalidDirection { .. }));
    }

    #[test]
    fn disease_modules_round_trip_through_csv() {
        let mut modules = HashMap::new();
        modules.insert("lung_cancer".to_owned(), vec!["TP53".to_owned(), "EGFR".to_owned()]);
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        write_disease_modules(file.path(), &modules).expect("write");
        let read_back = read_disease_modules(file.path()).expect("read");
        assert_eq!(read_back, modules);
    }

    #[test]
    fn drug_modules_round_trip_through_csv() {
        let mut modules = HashMap::new();
        modules.insert(
            "drugA".to_owned(),
            RawDrugModule { up: vec!["TP53".to_owned()], down: vec!["EGFR".to_owned()] },
        );
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        write_drug_modules(file.path(), &modules).expect("write");
        let read_back = read_drug_modules(file.path()).expect("read");
        assert_eq!(read_back["drugA"].up, vec!["TP53"]);
        assert_eq!(read_back["drugA"].down, vec!["EGFR"]);
    }
}

//! Tabular ingestion and output: CSV/TSV readers for disease modules, drug
//! modules, disease signatures, and known synergies, plus the predictions
//! and evaluation-summary CSV writers consumed by `netsyn-cli`.

mod derive;
mod errors;
mod evaluation_io;
mod modules;
mod predictions;
mod signatures;
mod synergies;

pub use crate::derive::build_drug_modules_from_de_table;
pub use crate::errors::TabularProviderError;
pub use crate::evaluation_io::{label_predictions, write_evaluation_summary};
pub use crate::modules::{
    read_disease_modules, read_drug_modules, write_disease_modules, write_drug_modules,
    RawDrugModule,
};
pub use crate::predictions::{read_predictions, write_predictions, PredictionRow};
pub use crate::signatures::{read_disease_signatures, write_disease_signatures};
pub use crate::synergies::KnownSynergies;

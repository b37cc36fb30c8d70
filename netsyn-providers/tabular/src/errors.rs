//! Error type for the tabular provider crate.

use thiserror::Error;

/// Errors produced while reading or writing a tabular input/output file.
#[derive(Debug, Error)]
pub enum TabularProviderError {
    /// The file could not be opened or read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The CSV/TSV table was malformed.
    #[error("malformed tabular input `{path}`: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    /// A drug-module row's `direction` column held something other than
    /// `up` or `down`.
    #[error("`{path}` has invalid direction `{value}` (expected `up` or `down`)")]
    InvalidDirection { path: String, value: String },
    /// A differential-expression value could not be parsed as a float.
    #[error("`{path}` has a non-numeric value `{value}` for gene `{gene}`, column `{column}`")]
    InvalidNumber {
        path: String,
        gene: String,
        column: String,
        value: String,
    },
    /// Writing an output table failed.
    #[error("failed to write `{path}`: {source}")]
    Write {
        path: String,
        #[source]
        source: csv::Error,
    },
}

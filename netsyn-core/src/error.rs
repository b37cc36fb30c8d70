//! Error types for the netsyn core library.
//!
//! Fatal input errors abort the run; per-pair conditions that can be
//! locally recovered from are represented separately in [`crate::diagnostics`]
//! rather than as `Err` variants here.

use core::fmt;

use thiserror::Error;

/// Stable codes describing [`NetsynError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum NetsynErrorCode {
    /// An input file could not be parsed.
    MalformedFile,
    /// A module referenced a gene identifier unknown to the harmonized namespace.
    UnknownGeneIdentifier,
    /// A module contained no genes.
    EmptyModule,
    /// A tabular input was missing a required column.
    MissingColumn,
    /// The graph contained no vertices after loading.
    EmptyGraph,
    /// A run was cancelled before completion.
    Cancelled,
}

impl NetsynErrorCode {
    /// Return the stable machine-readable representation of this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedFile => "NETSYN_MALFORMED_FILE",
            Self::UnknownGeneIdentifier => "NETSYN_UNKNOWN_GENE_IDENTIFIER",
            Self::EmptyModule => "NETSYN_EMPTY_MODULE",
            Self::MissingColumn => "NETSYN_MISSING_COLUMN",
            Self::EmptyGraph => "NETSYN_EMPTY_GRAPH",
            Self::Cancelled => "NETSYN_CANCELLED",
        }
    }
}

impl fmt::Display for NetsynErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal error produced while loading inputs or running the orchestrator.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NetsynError {
    /// An input file could not be parsed.
    #[error("malformed input `{source_path}`: {reason}")]
    MalformedFile { source_path: String, reason: String },
    /// A module referenced a gene identifier unknown to the harmonized namespace.
    #[error("unknown gene identifier `{gene}` in module `{module}`")]
    UnknownGeneIdentifier { module: String, gene: String },
    /// A module contained no genes.
    #[error("module `{module}` has no members")]
    EmptyModule { module: String },
    /// A tabular input was missing a required column.
    #[error("input `{source_path}` is missing required column `{column}`")]
    MissingColumn { source_path: String, column: String },
    /// The graph contained no vertices after loading.
    #[error("graph index contains no vertices after connected-component reduction")]
    EmptyGraph,
    /// A run was cancelled before completion.
    #[error("run cancelled after {completed} of {total} pairs")]
    Cancelled { completed: usize, total: usize },
}

impl NetsynError {
    /// Retrieve the stable [`NetsynErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> NetsynErrorCode {
        match self {
            Self::MalformedFile { .. } => NetsynErrorCode::MalformedFile,
            Self::UnknownGeneIdentifier { .. } => NetsynErrorCode::UnknownGeneIdentifier,
            Self::EmptyModule { .. } => NetsynErrorCode::EmptyModule,
            Self::MissingColumn { .. } => NetsynErrorCode::MissingColumn,
            Self::EmptyGraph => NetsynErrorCode::EmptyGraph,
            Self::Cancelled { .. } => NetsynErrorCode::Cancelled,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, NetsynError>;

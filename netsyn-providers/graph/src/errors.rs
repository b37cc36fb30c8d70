//! Error type for the graph provider crate.

use thiserror::Error;

/// Errors produced while reading a graph input file.
#[derive(Debug, Error)]
pub enum GraphProviderError {
    /// The file could not be opened or read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The CSV/TSV edge list was malformed.
    #[error("malformed edge list `{path}`: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    /// The GraphML document could not be parsed as XML.
    #[error("malformed GraphML `{path}` at byte {position}: {reason}")]
    Xml {
        path: String,
        position: usize,
        reason: String,
    },
    /// A GraphML edge element was missing a required `source` or `target`
    /// attribute.
    #[error("GraphML edge at byte {position} in `{path}` is missing its `{attribute}` attribute")]
    MissingEdgeEndpoint {
        path: String,
        position: usize,
        attribute: &'static str,
    },
}

//! Edge-list CSV reader.
//!
//! Expected columns: `gene_a`, `gene_b`, and `source_tag` (the provenance
//! tag recorded per edge for observability only).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{GraphProviderError, RawEdge};

#[derive(Debug, Deserialize, Serialize)]
struct Row {
    gene_a: String,
    gene_b: String,
    #[serde(default)]
    source_tag: String,
}

/// Reads an edge-list CSV file into a flat list of [`RawEdge`] values.
///
/// # Errors
///
/// Returns [`GraphProviderError::Io`] if the file cannot be opened, and
/// [`GraphProviderError::Csv`] if a row cannot be parsed against the
/// expected columns.
pub fn read_edge_list(path: &Path) -> Result<Vec<RawEdge>, GraphProviderError> {
    let file = std::fs::File::open(path).map_err(|source| GraphProviderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Fields)
        .from_reader(file);

    let mut edges = Vec::new();
    for record in reader.deserialize() {
        let row: Row = record.map_err(|source| GraphProviderError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        edges.push(RawEdge {
            gene_a: row.gene_a,
            gene_b: row.gene_b,
            source_tag: row.source_tag,
        });
    }
    Ok(edges)
}

/// Writes `edges` (as produced by `netsyn_core::GraphIndex::edges`) to an
/// edge-list CSV at `path`.
///
/// # Errors
///
/// Returns [`GraphProviderError::Csv`] if the file cannot be created or a
/// row cannot be serialized.
pub fn write_edge_list(
    path: &Path,
    edges: &[(String, String, String)],
) -> Result<(), GraphProviderError> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| GraphProviderError::Csv {
        path: path.display().to_string(),
        source,
    })?;
    for (gene_a, gene_b, source_tag) in edges {
        writer
            .serialize(Row {
                gene_a: gene_a.clone(),
                gene_b: gene_b.clone(),
                source_tag: source_tag.clone(),
            })
            .map_err(|source| GraphProviderError::Csv {
                path: path.display().to_string(),
                source,
            })?;
    }
    writer.flush().map_err(|source| GraphProviderError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn reads_edges_with_and_without_source_tag() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "gene_a,gene_b,source_tag").expect("write header");
        writeln!(file, "A,B,ppi").expect("write row");
        writeln!(file, "B,C,").expect("write row");
        let edges = read_edge_list(file.path()).expect("parse edges");
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].source_tag, "ppi");
        assert_eq!(edges[1].source_tag, "");
    }

    #[test]
    fn write_then_read_round_trips() {
        let file = tempfile::NamedTempFile::new().expect("tempfile");
        let written = vec![("A".to_owned(), "B".to_owned(), "ppi".to_owned())];
        write_edge_list(file.path(), &written).expect("write edges");
        let read = read_edge_list(file.path()).expect("parse edges");
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].gene_a, "A");
        assert_eq!(read[0].gene_b, "B");
        assert_eq!(read[0].source_tag, "ppi");
    }
}

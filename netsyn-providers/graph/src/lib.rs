//! Graph ingestion: GraphML and edge-list CSV readers that turn a raw
//! interaction network into a `Vec<(gene_a, gene_b, source_tag)>` triple
//! list consumable by `netsyn_core::GraphIndex::build`.

mod csv_edges;
mod errors;
mod graphml;

pub use crate::csv_edges::{read_edge_list, write_edge_list};
pub use crate::errors::GraphProviderError;
pub use crate::graphml::read_graphml;

/// One raw edge as read from an input file, owning its strings so it
/// outlives the reader.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEdge {
    pub gene_a: String,
    pub gene_b: String,
    pub source_tag: String,
}
